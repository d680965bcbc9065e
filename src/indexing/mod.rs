//! Index Write Path Module
//!
//! Document writes against the engine, each followed by invalidation of the
//! cached search pages of the written entity type.
//!
//! ## Submodules
//! - `types`: Write requests, typed document requests and batch outcomes.
//! - `writer`: `IndexWriter`, the only component that mutates engine indices.
//! - `handlers`: Axum handlers for the `/api/v1/index` routes.
//!
//! Writes propagate engine errors to the caller. Batch operations never
//! fail as a whole once validated; they report per-item outcomes instead.

pub mod handlers;
pub mod types;
pub mod writer;
