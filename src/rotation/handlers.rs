use axum::{extract::State, Json};
use strum::IntoEnumIterator;
use tracing::{info, instrument};

use super::models::Lineup;
use crate::shared::{AppError, AppState};
use crate::stats::{LedgerKey, Mode};

/// GET /lineup
#[instrument(name = "get_lineup", skip(state))]
pub async fn get_lineup(State(state): State<AppState>) -> Json<Lineup> {
    Json(state.lineups.load().await)
}

/// PUT /lineup
///
/// Missing fields fall back to their defaults; the stored lineup is echoed back.
/// Switching opponents drops the previous opponent's in-memory ledgers.
#[instrument(name = "put_lineup", skip(state, lineup))]
pub async fn put_lineup(
    State(state): State<AppState>,
    Json(lineup): Json<Lineup>,
) -> Result<Json<Lineup>, AppError> {
    let previous = state.lineups.load().await;
    let saved = state.lineups.save(lineup).await?;

    if previous.team_name() != saved.team_name() {
        for mode in Mode::iter() {
            let key = LedgerKey::new(previous.team_name(), mode);
            state.scouting.evict(&key).await;
        }
    }
    info!(
        team = %saved.team_name(),
        serving_first = %saved.serving_first,
        "Lineup saved"
    );
    Ok(Json(saved))
}
