pub mod actions;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use actions::{numbered_lineup, request_json, selection};
#[allow(unused_imports)]
pub use mocks::MockStore;
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder};
