use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::models::Lineup;
use crate::store::{keys, save_json, KeyValueStore, StoreError};

/// Loads and saves the shared lineup
pub struct LineupRepository {
    store: Arc<dyn KeyValueStore>,
}

impl LineupRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Prefers the editor's saved copy, then the primary key, then defaults
    #[instrument(skip(self))]
    pub async fn load(&self) -> Lineup {
        for key in [keys::SAVED_LINEUP_KEY, keys::LINEUP_KEY] {
            match self.store.get(key).await {
                Ok(Some(raw)) => match serde_json::from_str::<Lineup>(&raw) {
                    Ok(lineup) => {
                        debug!(key, "Lineup loaded");
                        return lineup.normalized();
                    }
                    Err(err) => warn!(key, error = %err, "Malformed lineup JSON"),
                },
                Ok(None) => debug!(key, "No stored lineup"),
                Err(err) => warn!(key, error = %err, "Failed to load lineup"),
            }
        }

        Lineup::default()
    }

    /// Writes the lineup under both lineup keys
    #[instrument(skip(self, lineup), fields(team = %lineup.team_name()))]
    pub async fn save(&self, lineup: Lineup) -> Result<Lineup, StoreError> {
        let lineup = lineup.normalized();
        save_json(self.store.as_ref(), keys::LINEUP_KEY, &lineup).await?;
        save_json(self.store.as_ref(), keys::SAVED_LINEUP_KEY, &lineup).await?;
        Ok(lineup)
    }
}
