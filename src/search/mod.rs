//! Search Service Module
//!
//! The read path of the gateway: turns a client request into an engine query
//! document, runs it, and returns a stable, paginated response.
//!
//! ## Pipeline
//! Every entity search goes through the same steps:
//! 1. **Normalize**: clamp pagination into range.
//! 2. **Cache lookup**: a hit short-circuits everything below.
//! 3. **Build**: entity-specific match clauses plus shared filters, highlight,
//!    sort and pagination.
//! 4. **Execute**: one engine call. Any failure degrades to an empty page.
//! 5. **Normalize response**: flatten hits, merge highlights, compute pages.
//! 6. **Cache write**: best effort, fixed TTL.
//!
//! ## Submodules
//! - **`types`**: Entity types, index naming, request and response DTOs.
//! - **`query`**: Pure construction of engine query documents.
//! - **`response`**: Defensive parsing of raw engine responses.
//! - **`service`**: `SearchService`, the per-entity orchestrator and the global fan-out.
//! - **`handlers`**: Axum handlers for the `/api/v1/search` routes.

pub mod handlers;
pub mod query;
pub mod response;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;
