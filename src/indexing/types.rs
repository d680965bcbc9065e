//! Index Write Data Types
//!
//! Request and response DTOs of the write path, plus the typed document
//! requests that are converted into opaque engine documents.

use crate::error::{SearchError, SearchResult};
use crate::search::types::Document;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Largest batch accepted by bulk index and batch delete.
pub const MAX_BATCH_SIZE: usize = 100;

/// Write of one opaque document into a named index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRequest {
    pub index: String,
    pub id: String,
    pub document: Document,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkIndexRequest {
    pub documents: Vec<IndexRequest>,
}

/// Outcome of a bulk write. Partial success is the normal case; each failure
/// is listed as `"<index>/<id>: <error>"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkIndexResponse {
    pub indexed: usize,
    pub failed: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDeleteRequest {
    pub index: String,
    pub ids: Vec<String>,
}

/// Outcome of a batch delete; failures are listed as `"<id>: <error>"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchDeleteResponse {
    pub deleted: usize,
    pub failed: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReindexRequest {
    pub index: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReindexResponse {
    pub message: String,
    pub index: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDocumentRequest {
    pub document: Document,
}

/// Acknowledgement of a single-document write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexAck {
    pub indexed: bool,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    pub index: String,
    pub count: i64,
}

// --- Typed document requests ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexUserRequest {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar_url: String,
    pub workspace_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexChannelRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub topic: String,
    #[serde(rename = "type", default)]
    pub channel_type: String,
    pub workspace_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexBookmarkRequest {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub user_id: String,
    pub workspace_id: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexTaskRequest {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub assignee_id: String,
    pub user_id: String,
    pub workspace_id: String,
    pub created_at: Option<String>,
}

fn require(field: &str, value: &str) -> SearchResult<()> {
    if value.trim().is_empty() {
        return Err(SearchError::validation(format!("'{}' is required", field)));
    }
    Ok(())
}

fn as_document(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

fn created_at_or_now(created_at: Option<String>) -> String {
    created_at
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| chrono::Utc::now().to_rfc3339())
}

/// A typed request that knows its document id and engine representation.
pub trait TypedDocument {
    fn validate(&self) -> SearchResult<()>;
    fn id(&self) -> &str;
    fn into_document(self) -> Document;
}

impl TypedDocument for IndexUserRequest {
    fn validate(&self) -> SearchResult<()> {
        require("id", &self.id)?;
        require("username", &self.username)?;
        require("workspace_id", &self.workspace_id)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn into_document(self) -> Document {
        as_document(json!({
            "username": self.username,
            "display_name": self.display_name,
            "email": self.email,
            "avatar_url": self.avatar_url,
            "workspace_id": self.workspace_id,
        }))
    }
}

impl TypedDocument for IndexChannelRequest {
    fn validate(&self) -> SearchResult<()> {
        require("id", &self.id)?;
        require("name", &self.name)?;
        require("workspace_id", &self.workspace_id)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn into_document(self) -> Document {
        as_document(json!({
            "name": self.name,
            "description": self.description,
            "topic": self.topic,
            "type": self.channel_type,
            "workspace_id": self.workspace_id,
        }))
    }
}

impl TypedDocument for IndexBookmarkRequest {
    fn validate(&self) -> SearchResult<()> {
        require("id", &self.id)?;
        require("title", &self.title)?;
        require("user_id", &self.user_id)?;
        require("workspace_id", &self.workspace_id)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn into_document(self) -> Document {
        as_document(json!({
            "title": self.title,
            "description": self.description,
            "url": self.url,
            "tags": self.tags,
            "user_id": self.user_id,
            "workspace_id": self.workspace_id,
            "created_at": created_at_or_now(self.created_at),
        }))
    }
}

impl TypedDocument for IndexTaskRequest {
    fn validate(&self) -> SearchResult<()> {
        require("id", &self.id)?;
        require("title", &self.title)?;
        require("user_id", &self.user_id)?;
        require("workspace_id", &self.workspace_id)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn into_document(self) -> Document {
        as_document(json!({
            "title": self.title,
            "description": self.description,
            "status": self.status,
            "priority": self.priority,
            "assignee_id": self.assignee_id,
            "user_id": self.user_id,
            "workspace_id": self.workspace_id,
            "created_at": created_at_or_now(self.created_at),
        }))
    }
}

/// Pulls the mandatory string `id` out of a raw document.
pub fn document_id(doc: &Document) -> SearchResult<String> {
    doc.get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SearchError::validation("Document must have an 'id' field"))
}

/// Rejects empty batches and batches over [`MAX_BATCH_SIZE`].
pub fn check_batch_size(what: &str, len: usize) -> SearchResult<()> {
    if len == 0 {
        return Err(SearchError::validation(format!("{} must not be empty", what)));
    }
    if len > MAX_BATCH_SIZE {
        return Err(SearchError::validation(format!(
            "{} accepts at most {} items, got {}",
            what, MAX_BATCH_SIZE, len
        )));
    }
    Ok(())
}
