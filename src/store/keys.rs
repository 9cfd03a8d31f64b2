//! Storage keys shared with previously persisted data.

use crate::stats::Mode;

/// Primary lineup key.
pub const LINEUP_KEY: &str = "lineup";
/// Mirror of the lineup written by the lineup editor.
pub const SAVED_LINEUP_KEY: &str = "savedLineup";

/// `scout_<team>` or `live_<team>`
pub fn ledger_key(mode: Mode, team: &str) -> String {
    format!("{}_{}", mode.storage_prefix(), team)
}

/// `tendencies:scout:<team>` or `tendencies:live:<team>`
pub fn tendency_key(mode: Mode, team: &str) -> String {
    format!("tendencies:{}:{}", mode.storage_prefix(), team)
}
