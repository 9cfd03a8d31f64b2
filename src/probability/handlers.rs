use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::service::{RotationReport, RotationRow};
use crate::shared::AppState;
use crate::stats::Rotation;

/// GET /rotations
///
/// Front rows and attack shares for all six opponent rotations
#[instrument(name = "get_report", skip(state))]
pub async fn get_report(State(state): State<AppState>) -> Json<RotationReport> {
    let report = state.reports.report().await;
    info!(team = %report.team, "Rotation report built");
    Json(report)
}

/// GET /rotations/:rotation
#[instrument(name = "get_rotation", skip(state))]
pub async fn get_rotation(
    State(state): State<AppState>,
    Path(rotation): Path<Rotation>,
) -> Json<RotationRow> {
    Json(state.reports.row(rotation).await)
}
