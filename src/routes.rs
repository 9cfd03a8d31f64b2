use axum::{
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::probability::handlers::{get_report, get_rotation};
use crate::rotation::handlers::{get_lineup, put_lineup};
use crate::shared::AppState;
use crate::stats::handlers::{commit_stat, get_ledger, new_match, undo_stat};
use crate::tendencies::handlers::{get_tendencies, put_tendency, reset_tendencies};

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the HTTP router over the given state
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/lineup", get(get_lineup).put(put_lineup))
        .route("/rotations", get(get_report))
        .route("/rotations/:rotation", get(get_rotation))
        .route("/teams/:team/:mode/ledger", get(get_ledger))
        .route("/teams/:team/:mode/commit", post(commit_stat))
        .route("/teams/:team/:mode/undo", post(undo_stat))
        .route("/teams/:team/:mode/new-match", post(new_match))
        .route(
            "/teams/:team/tendencies/:mode",
            get(get_tendencies).delete(reset_tendencies),
        )
        .route("/teams/:team/tendencies/:mode/:rotation", put(put_tendency))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
