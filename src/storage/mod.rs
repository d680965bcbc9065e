//! Key-Value Storage Module
//!
//! The store that backs the result cache.
//!
//! ## Core Concepts
//! - **Interface**: `KeyValueStore` is the narrow get/set/del/scan contract every
//!   consumer depends on; handles are injected as `Arc<dyn KeyValueStore>`.
//! - **Expiry**: Entries carry an optional TTL. Expired entries are invisible to
//!   reads and scans and are purged by a background sweeper.
//! - **Prefix scan**: Keys are namespaced (`search:<tag>:...`) so that a whole
//!   namespace can be listed and deleted in one pass.

pub mod memory;
pub mod store;
