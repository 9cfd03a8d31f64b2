use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::probability::ReportService;
use crate::rotation::LineupRepository;
use crate::stats::{ScoutingService, StatsError};
use crate::store::{KeyValueStore, PersistenceHandle, StoreError};
use crate::tendencies::TendencyRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub scouting: Arc<ScoutingService>,
    pub lineups: Arc<LineupRepository>,
    pub tendencies: Arc<TendencyRepository>,
    pub reports: Arc<ReportService>,
}

impl AppState {
    /// Wires every service to one store; must run inside a tokio runtime
    /// because it starts the persistence writer.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (persistence, _writer) = PersistenceHandle::spawn(store.clone());
        let lineups = Arc::new(LineupRepository::new(store.clone()));

        Self {
            scouting: Arc::new(ScoutingService::new(store.clone(), persistence)),
            reports: Arc::new(ReportService::new(store.clone(), lineups.clone())),
            tendencies: Arc::new(TendencyRepository::new(store)),
            lineups,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error")]
    Internal,
}

impl From<StatsError> for AppError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::Inconsistent(_) => {
                tracing::error!(error = %err, "Ledger inconsistency");
                AppError::Internal
            }
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Storage(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Storage error: {}", msg),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
