//! Error Types
//!
//! `SearchError` is what handlers return. Each variant maps to one HTTP status
//! and renders as `{"error": "<message>"}`.
//!
//! Read-path searches never produce a `SearchError` for engine or cache
//! trouble; only validation and the write path do.

use crate::engine::client::EngineError;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The request was rejected before any engine or store call.
    #[error("{0}")]
    Validation(String),

    /// The addressed document or record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A write could not be completed by the engine.
    #[error("engine error: {0}")]
    Engine(EngineError),
}

impl From<EngineError> for SearchError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotFound { index, id } => {
                SearchError::NotFound(format!("document {} not found in {}", id, index))
            }
            other => SearchError::Engine(other),
        }
    }
}

impl From<QueryRejection> for SearchError {
    fn from(rejection: QueryRejection) -> Self {
        SearchError::Validation(rejection.body_text())
    }
}

impl From<JsonRejection> for SearchError {
    fn from(rejection: JsonRejection) -> Self {
        SearchError::Validation(rejection.body_text())
    }
}

impl SearchError {
    pub fn validation(message: impl Into<String>) -> Self {
        SearchError::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            SearchError::Validation(_) => StatusCode::BAD_REQUEST,
            SearchError::NotFound(_) => StatusCode::NOT_FOUND,
            SearchError::Engine(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

pub type SearchResult<T> = Result<T, SearchError>;
