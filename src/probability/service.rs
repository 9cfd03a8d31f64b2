use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use super::calculator::{distribution, Distribution};
use crate::rotation::{
    home_front_row, mapper::adjusted_rotation_for, opponent_front_row, FrontRow, Lineup,
    LineupRepository,
};
use crate::stats::{Ledger, Mode, PlayerKey, Rotation};
use crate::store::{keys, KeyValueStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttackerShare {
    pub player: PlayerKey,
    pub share: u8,
}

/// Both front rows for one opponent rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RotationRow {
    pub rotation: Rotation,
    pub opponent: Vec<AttackerShare>,
    pub distribution: Distribution,
    pub home_rotation: Rotation,
    pub home: FrontRow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RotationReport {
    pub team: String,
    pub rows: Vec<RotationRow>,
}

pub fn build_row(lineup: &Lineup, ledger: &Ledger, rotation: Rotation) -> RotationRow {
    let opponent = opponent_front_row(lineup, rotation);
    let distribution = distribution(ledger, rotation, &opponent);
    let shares = opponent
        .iter()
        .zip(distribution.shares())
        .map(|(player, share)| AttackerShare {
            player: player.clone(),
            share,
        })
        .collect();

    RotationRow {
        rotation,
        opponent: shares,
        distribution,
        home_rotation: adjusted_rotation_for(lineup, rotation),
        home: home_front_row(lineup, rotation),
    }
}

pub fn build_report(lineup: &Lineup, ledger: &Ledger) -> RotationReport {
    RotationReport {
        team: lineup.team_name().to_string(),
        rows: Rotation::all()
            .map(|rotation| build_row(lineup, ledger, rotation))
            .collect(),
    }
}

/// Builds reports from the stored lineup and the stored scouting ledger.
///
/// Reads go to the store rather than live sessions, so a report can trail
/// the latest commits until their writes land.
pub struct ReportService {
    store: Arc<dyn KeyValueStore>,
    lineups: Arc<LineupRepository>,
}

impl ReportService {
    pub fn new(store: Arc<dyn KeyValueStore>, lineups: Arc<LineupRepository>) -> Self {
        Self { store, lineups }
    }

    #[instrument(skip(self))]
    pub async fn report(&self) -> RotationReport {
        let lineup = self.lineups.load().await;
        let ledger = self.scouting_ledger(lineup.team_name()).await;
        build_report(&lineup, &ledger)
    }

    #[instrument(skip(self))]
    pub async fn row(&self, rotation: Rotation) -> RotationRow {
        let lineup = self.lineups.load().await;
        let ledger = self.scouting_ledger(lineup.team_name()).await;
        build_row(&lineup, &ledger, rotation)
    }

    /// Distribution for the opponent front row in `rotation`
    pub async fn distribution(&self, rotation: Rotation) -> Distribution {
        self.row(rotation).await.distribution
    }

    async fn scouting_ledger(&self, team: &str) -> Ledger {
        let key = keys::ledger_key(Mode::Scouting, team);
        match self.store.get(&key).await {
            Ok(Some(raw)) => Ledger::from_json_lenient(&raw),
            Ok(None) => {
                debug!(key = %key, "No scouting data, using default shares");
                Ledger::new()
            }
            Err(err) => {
                error!(key = %key, error = %err, "Failed to load scouting data");
                Ledger::new()
            }
        }
    }
}
