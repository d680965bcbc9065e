//! Search Engine Client Module
//!
//! The gateway's only view of the full-text engine.
//!
//! ## Submodules
//! - **`client`**: The `SearchEngine` trait and its `EngineError` type. Everything
//!   above this module depends on the trait, never on a concrete client.
//! - **`elastic`**: `ElasticClient`, a `reqwest` implementation for
//!   Elasticsearch-compatible HTTP APIs.
//! - **`protocol`**: Endpoint names and the small response DTOs the client decodes.

pub mod client;
pub mod elastic;
pub mod protocol;
