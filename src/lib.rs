//! Search Gateway Library
//!
//! This library crate defines the modules of the search gateway, a stateless
//! HTTP service in front of an Elasticsearch-compatible engine. It serves as
//! the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! - **`search`**: The read path. Query construction, response normalization,
//!   the per-entity orchestrator and the global fan-out.
//! - **`indexing`**: The write path. Document writes followed by scoped cache
//!   invalidation.
//! - **`cache`**: Best-effort memo of search pages keyed by request fingerprint.
//! - **`engine`**: The `SearchEngine` abstraction and its HTTP client.
//! - **`storage`**: The `KeyValueStore` abstraction and its in-memory TTL store.
//! - **`app`**: The axum router.
//! - **`config`**, **`error`**: Environment configuration and the HTTP error type.

pub mod app;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod indexing;
pub mod search;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;
