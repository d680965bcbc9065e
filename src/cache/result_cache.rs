use crate::search::types::{EntityType, SearchParams, SearchResponse};
use crate::storage::store::KeyValueStore;

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Namespace every result-cache key lives under.
pub const CACHE_NAMESPACE: &str = "search";
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(250);

/// The request fields a cached page depends on, in a fixed order.
#[derive(Serialize)]
struct Fingerprint<'a> {
    query: &'a str,
    workspace_id: &'a str,
    page: i64,
    per_page: i64,
    sort: &'a str,
    channel_id: Option<&'a str>,
    user_id: Option<&'a str>,
    file_type: Option<&'a str>,
    date_from: Option<&'a str>,
    date_to: Option<&'a str>,
}

/// Key prefix shared by every cached page of one entity type.
pub fn cache_prefix(entity: EntityType) -> String {
    format!("{}:{}:", CACHE_NAMESPACE, entity.cache_tag())
}

/// Deterministic cache key: `search:<tag>:<sha256 of the request fingerprint>`.
///
/// Hashing the serialized fingerprint keeps free-text queries containing the
/// separator from colliding with each other.
pub fn cache_key(entity: EntityType, params: &SearchParams) -> String {
    let fingerprint = Fingerprint {
        query: &params.query,
        workspace_id: &params.workspace_id,
        page: params.page,
        per_page: params.per_page,
        sort: params.sort.as_str(),
        channel_id: params.channel_id.as_deref(),
        user_id: params.user_id.as_deref(),
        file_type: params.file_type.as_deref(),
        date_from: params.date_from.as_deref(),
        date_to: params.date_to.as_deref(),
    };

    let mut hasher = Sha256::new();
    // Serializing plain strings and integers cannot fail.
    hasher.update(serde_json::to_vec(&fingerprint).unwrap_or_default());
    format!("{}{}", cache_prefix(entity), hex::encode(hasher.finalize()))
}

/// Best-effort memo of search pages, keyed by request fingerprint.
///
/// Every store failure, timeout or undecodable entry is a miss on read and a
/// no-op on write.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
    timeout: Duration,
}

impl ResultCache {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration, timeout: Duration) -> Self {
        Self {
            store,
            ttl,
            timeout,
        }
    }

    pub fn with_defaults(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(store, DEFAULT_CACHE_TTL, DEFAULT_STORE_TIMEOUT)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Runs one store call under the configured timeout, folding timeouts and
    /// store errors into `None`.
    async fn bounded<T, F>(&self, op: &str, call: F) -> Option<T>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                tracing::warn!("Cache {} failed: {}", op, e);
                None
            }
            Err(_) => {
                tracing::warn!("Cache {} timed out after {:?}", op, self.timeout);
                None
            }
        }
    }

    pub async fn get(&self, key: &str) -> Option<SearchResponse> {
        let bytes = self.bounded("get", self.store.get(key)).await??;

        match serde_json::from_slice(&bytes) {
            Ok(response) => {
                tracing::debug!("Cache hit: {}", key);
                Some(response)
            }
            Err(e) => {
                tracing::debug!("Discarding undecodable cache entry {}: {}", key, e);
                None
            }
        }
    }

    pub async fn set(&self, key: &str, response: &SearchResponse) {
        let bytes = match serde_json::to_vec(response) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to serialize response for cache: {}", e);
                return;
            }
        };

        self.bounded("set", self.store.set(key, bytes, Some(self.ttl)))
            .await;
    }

    /// Drops every cached page of `entity`. Returns how many entries went away.
    pub async fn invalidate(&self, entity: EntityType) -> usize {
        let prefix = cache_prefix(entity);

        let Some(keys) = self.bounded("scan", self.store.scan_prefix(&prefix)).await else {
            return 0;
        };
        if keys.is_empty() {
            return 0;
        }

        let removed = self
            .bounded("del", self.store.del(&keys))
            .await
            .unwrap_or(0);
        tracing::debug!("Invalidated {} cached {} pages", removed, entity);
        removed
    }

    pub async fn ping(&self) -> bool {
        self.bounded("ping", self.store.ping()).await.is_some()
    }
}
