use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::models::{Tendency, TendencyBook};
use crate::shared::{AppError, AppState};
use crate::stats::{Mode, Rotation};

/// GET /teams/:team/tendencies/:mode
#[instrument(name = "get_tendencies", skip(state))]
pub async fn get_tendencies(
    State(state): State<AppState>,
    Path((team, mode)): Path<(String, Mode)>,
) -> Json<TendencyBook> {
    Json(state.tendencies.load(&team, mode).await)
}

/// PUT /teams/:team/tendencies/:mode/:rotation
#[instrument(name = "put_tendency", skip(state))]
pub async fn put_tendency(
    State(state): State<AppState>,
    Path((team, mode, rotation)): Path<(String, Mode, Rotation)>,
    Json(tendency): Json<Tendency>,
) -> Result<Json<TendencyBook>, AppError> {
    let book = state
        .tendencies
        .set_rotation(&team, mode, rotation, tendency)
        .await?;
    info!(%team, %mode, %rotation, "Tendency updated");
    Ok(Json(book))
}

/// DELETE /teams/:team/tendencies/live
///
/// Scouting tendencies are only ever overwritten, never reset.
#[instrument(name = "reset_tendencies", skip(state))]
pub async fn reset_tendencies(
    State(state): State<AppState>,
    Path((team, mode)): Path<(String, Mode)>,
) -> Result<StatusCode, AppError> {
    if mode != Mode::Live {
        return Err(AppError::BadRequest(
            "Only live tendencies can be reset".to_string(),
        ));
    }
    state.tendencies.reset_live(&team).await?;
    Ok(StatusCode::NO_CONTENT)
}
