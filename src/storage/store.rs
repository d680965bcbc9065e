use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Narrow key-value interface shared by the result cache and any record
/// services built on top of the store.
///
/// Implementations must be safe for concurrent use; every handle in the
/// service is an `Arc<dyn KeyValueStore>`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored bytes, or `None` when the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value. A `ttl` of
    /// `None` keeps the entry until it is deleted.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    /// Deletes the given keys and returns how many were present.
    async fn del(&self, keys: &[String]) -> Result<usize>;

    /// Lists every live key starting with `prefix`.
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>>;

    /// Liveness probe used by the health endpoint.
    async fn ping(&self) -> Result<()>;
}
