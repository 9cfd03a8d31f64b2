pub mod calculator;
pub mod handlers;
pub mod service;

pub use calculator::{distribution, Distribution, DEFAULT_DISTRIBUTION};
pub use service::{build_report, build_row, AttackerShare, ReportService, RotationReport, RotationRow};
