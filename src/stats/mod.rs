pub mod handlers;
pub mod ledger;
pub mod models;
pub mod selection;
pub mod service;
pub mod types;
pub mod undo;

mod errors;

pub use errors::StatsError;
pub use ledger::Ledger;
pub use models::*;
pub use selection::PendingSelection;
pub use service::{LedgerKey, LedgerSession, ScoutingService};
pub use undo::{EntryOrigin, UndoEntry, UndoLog};
