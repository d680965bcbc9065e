//! Result Cache Module
//!
//! Memoizes normalized search pages in the key-value store.
//!
//! ## Lifecycle
//! - **Read**: Every search looks up its fingerprint key before touching the engine.
//! - **Write**: Every successful engine search stores its page with a fixed TTL.
//! - **Invalidate**: Every successful document write drops all pages of the written
//!   entity type with one prefix scan (`search:<tag>:*`).
//!
//! The cache is an optimization only. Store failures are logged and otherwise
//! ignored.

pub mod result_cache;
