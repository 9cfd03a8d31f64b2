// Library crate for the volleyball scouting server
// This file exposes the public API for integration tests

pub mod config;
pub mod probability;
pub mod rotation;
pub mod routes;
pub mod shared;
pub mod stats;
pub mod store;
pub mod tendencies;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use probability::{Distribution, ReportService, RotationReport};
pub use rotation::{Lineup, LineupRepository};
pub use routes::app;
pub use shared::{AppError, AppState};
pub use stats::{Ledger, LedgerKey, Mode, PendingSelection, ScoutingService, StatsError};
pub use store::{InMemoryStore, KeyValueStore, PersistenceHandle, PostgresStore, StoreError};
pub use tendencies::TendencyRepository;
