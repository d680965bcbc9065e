use crate::search::types::Document;

use async_trait::async_trait;
use serde_json::Value;

/// Failures reported by a search engine client.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("engine transport error: {0}")]
    Transport(String),

    /// The engine answered with a non-success status.
    #[error("engine returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The addressed document does not exist.
    #[error("document {id} not found in {index}")]
    NotFound { index: String, id: String },

    /// The engine answered but the body was not the expected JSON.
    #[error("engine response could not be decoded: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            EngineError::Decode(err.to_string())
        } else {
            EngineError::Transport(err.to_string())
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

/// The full-text search engine as seen by the gateway.
///
/// Index names are passed through verbatim; `search` also accepts wildcard
/// patterns such as `search_*`.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Runs a query document against an index or index pattern and returns the
    /// raw response document.
    async fn search(&self, index: &str, query: &Value) -> EngineResult<Value>;

    /// Creates or replaces a document.
    async fn index_document(&self, index: &str, id: &str, doc: &Document) -> EngineResult<()>;

    /// Merges `partial` into an existing document.
    async fn update_document(&self, index: &str, id: &str, partial: &Document)
    -> EngineResult<()>;

    async fn delete_document(&self, index: &str, id: &str) -> EngineResult<()>;

    /// Number of documents in an index.
    async fn count(&self, index: &str) -> EngineResult<i64>;

    /// Copies every document of `source` into `dest`.
    async fn reindex(&self, source: &str, dest: &str) -> EngineResult<()>;

    /// Liveness probe used by the health endpoint.
    async fn ping(&self) -> EngineResult<()>;
}
