use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::{
    types::{CommitRequest, CommitResponse, LedgerResponse, UndoResponse},
    LedgerKey, Mode,
};
use crate::shared::{AppError, AppState};

async fn ledger_response(state: &AppState, key: &LedgerKey) -> LedgerResponse {
    let (ledger, undo_depth) = state.scouting.view(key).await;
    LedgerResponse {
        team: key.team.clone(),
        mode: key.mode,
        undo_depth,
        ledger,
    }
}

/// GET /teams/:team/:mode/ledger
#[instrument(name = "get_ledger", skip(state))]
pub async fn get_ledger(
    State(state): State<AppState>,
    Path((team, mode)): Path<(String, Mode)>,
) -> Json<LedgerResponse> {
    let key = LedgerKey::new(team, mode);
    Json(ledger_response(&state, &key).await)
}

/// POST /teams/:team/:mode/commit
///
/// Applies one stat entry. Returns `applied: false` when the main stat or
/// contact toggle is missing.
#[instrument(name = "commit_stat", skip(state, request))]
pub async fn commit_stat(
    State(state): State<AppState>,
    Path((team, mode)): Path<(String, Mode)>,
    Json(request): Json<CommitRequest>,
) -> Result<Json<CommitResponse>, AppError> {
    let key = LedgerKey::new(team, mode);
    let entry = state
        .scouting
        .record(
            &key,
            request.rotation,
            request.player_key(),
            request.selection(),
            request.detail,
        )
        .await?;

    Ok(Json(CommitResponse {
        applied: entry.is_some(),
        entry,
    }))
}

/// POST /teams/:team/:mode/undo
#[instrument(name = "undo_stat", skip(state))]
pub async fn undo_stat(
    State(state): State<AppState>,
    Path((team, mode)): Path<(String, Mode)>,
) -> Result<Json<UndoResponse>, AppError> {
    let key = LedgerKey::new(team, mode);
    let entry = state.scouting.undo(&key).await?;

    Ok(Json(UndoResponse {
        undone: entry.is_some(),
        entry,
    }))
}

/// POST /teams/:team/:mode/new-match
#[instrument(name = "new_match", skip(state))]
pub async fn new_match(
    State(state): State<AppState>,
    Path((team, mode)): Path<(String, Mode)>,
) -> Json<LedgerResponse> {
    let key = LedgerKey::new(team, mode);
    state.scouting.new_match(&key).await;
    info!(team = %key.team, mode = %key.mode, "Ledger cleared for new match");

    Json(ledger_response(&state, &key).await)
}
