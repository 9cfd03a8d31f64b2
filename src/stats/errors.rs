use thiserror::Error;

use super::models::{Detail, MainStat};

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Invalid rotation: {0} (expected 1-6)")]
    InvalidRotation(String),

    #[error("Invalid zone: {0} (expected 1-6)")]
    InvalidZone(String),

    #[error("Unknown detail: {0}")]
    UnknownDetail(String),

    #[error("Detail {detail} does not apply to {main}")]
    InvalidDetail { main: MainStat, detail: Detail },

    #[error("Ledger inconsistency: {0}")]
    Inconsistent(String),
}
