use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::{btree_map::Entry, BTreeMap};
use tracing::{debug, warn};

use super::{
    models::{Outcome, PlayerKey, Rotation, StatLine},
    undo::{EntryOrigin, UndoEntry},
    StatsError,
};

/// Counters for one team and mode, keyed by rotation then player.
///
/// Serialized as `{"<rotation>": {"<player>": StatLine}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ledger {
    rotations: BTreeMap<Rotation, BTreeMap<PlayerKey, StatLine>>,
}

/// Raw keys are normalized on load; keys that normalize to the same
/// player have their counters added together.
impl<'de> Deserialize<'de> for Ledger {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<Rotation, BTreeMap<String, StatLine>>::deserialize(deserializer)?;
        let mut rotations = BTreeMap::new();

        for (rotation, players) in raw {
            let bucket: &mut BTreeMap<PlayerKey, StatLine> = rotations.entry(rotation).or_default();
            for (number, line) in players {
                match bucket.entry(PlayerKey::new(&number)) {
                    Entry::Vacant(slot) => {
                        slot.insert(line);
                    }
                    Entry::Occupied(mut slot) => {
                        debug!(
                            %rotation,
                            player = %slot.key(),
                            raw = %number,
                            "Merging duplicate player key"
                        );
                        slot.get_mut().merge(&line).map_err(de::Error::custom)?;
                    }
                }
            }
        }

        Ok(Self { rotations })
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a persisted ledger; anything unreadable yields an empty ledger
    pub fn from_json_lenient(raw: &str) -> Self {
        match serde_json::from_str::<Ledger>(raw) {
            Ok(ledger) => {
                if let Err(err) = ledger.check_invariants() {
                    warn!(error = %err, "Loaded ledger has inconsistent counters");
                }
                ledger
            }
            Err(err) => {
                warn!(error = %err, "Malformed ledger JSON, starting empty");
                Self::default()
            }
        }
    }

    /// Counts one outcome, creating the rotation bucket and stat line on first use.
    ///
    /// Nothing changes when a counter would overflow.
    pub fn commit(
        &mut self,
        rotation: Rotation,
        player: PlayerKey,
        outcome: Outcome,
    ) -> Result<UndoEntry, StatsError> {
        let existing = self.get(rotation, &player).copied();
        let mut line = existing.unwrap_or_default();
        line.record(&outcome)?;

        let origin = match (self.rotations.contains_key(&rotation), existing.is_some()) {
            (false, _) => EntryOrigin::NewRotation,
            (true, false) => EntryOrigin::NewLine,
            (true, true) => EntryOrigin::Existing,
        };
        self.rotations
            .entry(rotation)
            .or_default()
            .insert(player.clone(), line);

        Ok(UndoEntry {
            rotation,
            player,
            outcome,
            origin,
        })
    }

    /// Applies the inverse of a commit as a single update.
    ///
    /// Nothing changes when any counter would go below zero.
    pub fn revert(&mut self, entry: &UndoEntry) -> Result<(), StatsError> {
        let bucket = self.rotations.get_mut(&entry.rotation).ok_or_else(|| {
            StatsError::Inconsistent(format!("rotation {} has no stats", entry.rotation))
        })?;
        let line = bucket.get_mut(&entry.player).ok_or_else(|| {
            StatsError::Inconsistent(format!(
                "player {} has no stats in rotation {}",
                entry.player, entry.rotation
            ))
        })?;

        let mut restored = *line;
        restored.retract(&entry.outcome)?;
        *line = restored;

        if entry.origin != EntryOrigin::Existing && restored.is_blank() {
            bucket.remove(&entry.player);
            if entry.origin == EntryOrigin::NewRotation && bucket.is_empty() {
                self.rotations.remove(&entry.rotation);
            }
        }

        Ok(())
    }

    pub fn reset(&mut self) {
        self.rotations.clear();
    }

    pub fn get(&self, rotation: Rotation, player: &PlayerKey) -> Option<&StatLine> {
        self.rotations.get(&rotation)?.get(player)
    }

    /// kills + errors + attempts for a player, zero when nothing is recorded
    pub fn event_count(&self, rotation: Rotation, player: &PlayerKey) -> u64 {
        self.get(rotation, player)
            .map(StatLine::event_count)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = (Rotation, &PlayerKey, &StatLine)> {
        self.rotations.iter().flat_map(|(rotation, players)| {
            players
                .iter()
                .map(move |(player, line)| (*rotation, player, line))
        })
    }

    pub fn check_invariants(&self) -> Result<(), StatsError> {
        for (rotation, player, line) in self.lines() {
            if let Some(violation) = line.invariant_violation() {
                return Err(StatsError::Inconsistent(format!(
                    "rotation {rotation}, player {player}: {violation}"
                )));
            }
        }
        Ok(())
    }
}
