//! Engine Wire Protocol
//!
//! Endpoint paths and response DTOs of the Elasticsearch-compatible HTTP API
//! the gateway talks to. Only the handful of document-level APIs the gateway
//! needs are described here; cluster administration stays out.

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Search endpoint, appended to an index name or pattern.
pub const ENDPOINT_SEARCH: &str = "_search";
/// Single-document endpoint (`PUT` to index, `DELETE` to remove).
pub const ENDPOINT_DOC: &str = "_doc";
/// Partial update endpoint.
pub const ENDPOINT_UPDATE: &str = "_update";
/// Document count endpoint.
pub const ENDPOINT_COUNT: &str = "_count";
/// Cluster-level reindex endpoint.
pub const ENDPOINT_REINDEX: &str = "_reindex";

/// Suffix appended to an index name to form the reindex destination.
pub const REINDEX_SUFFIX: &str = "_reindexed";

// --- Data Transfer Objects ---

/// Response of the `_count` endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: i64,
}

/// Response of a single-document write (`_doc`, `_update`).
///
/// `result` is `"created"`, `"updated"`, `"deleted"`, `"noop"` or
/// `"not_found"`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocWriteResponse {
    #[serde(rename = "_index", default)]
    pub index: String,
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub result: String,
}
