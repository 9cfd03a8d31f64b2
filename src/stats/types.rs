use serde::{Deserialize, Serialize};

use super::{
    ContactType, Detail, Ledger, MainStat, Mode, PendingSelection, PlayerKey, Rotation, UndoEntry,
};

/// Request payload for recording one stat.
///
/// `main` and `contact` mirror the two toggles on the entry screen; leaving
/// either out makes the commit a no-op.
#[derive(Debug, Deserialize)]
pub struct CommitRequest {
    pub rotation: Rotation,
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    pub main: Option<MainStat>,
    #[serde(default)]
    pub contact: Option<ContactType>,
    pub detail: Detail,
}

impl CommitRequest {
    pub fn player_key(&self) -> PlayerKey {
        PlayerKey::from(self.player.as_deref())
    }

    pub fn selection(&self) -> PendingSelection {
        PendingSelection::new(self.main, self.contact)
    }
}

#[derive(Debug, Serialize)]
pub struct CommitResponse {
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<UndoEntry>,
}

#[derive(Debug, Serialize)]
pub struct UndoResponse {
    pub undone: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<UndoEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerResponse {
    pub team: String,
    pub mode: Mode,
    pub undo_depth: usize,
    pub ledger: Ledger,
}
