use serde::{Serialize, Serializer};
use tracing::debug;

use super::{
    ledger::Ledger,
    models::{ContactType, Detail, MainStat, Outcome, PlayerKey, Rotation},
    StatsError,
};

/// What a commit had to create before counting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOrigin {
    /// The stat line already existed
    Existing,
    /// The rotation existed but the player had no line yet
    NewLine,
    /// Neither the rotation nor the line existed
    NewRotation,
}

/// Record of one applied commit, enough to invert it exactly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoEntry {
    pub rotation: Rotation,
    pub player: PlayerKey,
    pub outcome: Outcome,
    pub origin: EntryOrigin,
}

impl UndoEntry {
    pub fn main_stat(&self) -> MainStat {
        self.outcome.main_stat()
    }

    pub fn contact(&self) -> ContactType {
        self.outcome.contact()
    }

    pub fn detail(&self) -> Detail {
        self.outcome.detail()
    }
}

#[derive(Serialize)]
struct EntryView<'a> {
    rotation: Rotation,
    player: &'a PlayerKey,
    main: MainStat,
    contact: ContactType,
    detail: Detail,
}

impl Serialize for UndoEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        EntryView {
            rotation: self.rotation,
            player: &self.player,
            main: self.main_stat(),
            contact: self.contact(),
            detail: self.detail(),
        }
        .serialize(serializer)
    }
}

/// LIFO log of commits
#[derive(Debug, Default, Clone)]
pub struct UndoLog {
    entries: Vec<UndoEntry>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: UndoEntry) {
        self.entries.push(entry);
    }

    /// Reverts the most recent commit. An empty log is a no-op returning `None`.
    ///
    /// An entry that no longer matches the ledger is discarded and reported.
    pub fn undo(&mut self, ledger: &mut Ledger) -> Result<Option<UndoEntry>, StatsError> {
        let Some(entry) = self.entries.pop() else {
            debug!("Undo requested with empty log");
            return Ok(None);
        };

        ledger.revert(&entry)?;
        Ok(Some(entry))
    }

    pub fn peek(&self) -> Option<&UndoEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
