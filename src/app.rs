//! HTTP Router
//!
//! Wires every handler to its route. Shared services reach handlers through
//! `Extension` layers.

use crate::indexing::handlers::*;
use crate::indexing::writer::IndexWriter;
use crate::search::handlers::*;
use crate::search::service::SearchService;

use axum::routing::{get, post, put};
use axum::{Extension, Router};
use std::sync::Arc;

pub fn build_router(service: Arc<SearchService>, writer: Arc<IndexWriter>) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        // Read path:
        .route("/api/v1/search", get(handle_global_search))
        .route("/api/v1/search/messages", get(handle_search_messages))
        .route("/api/v1/search/files", get(handle_search_files))
        .route("/api/v1/search/users", get(handle_search_users))
        .route("/api/v1/search/channels", get(handle_search_channels))
        .route("/api/v1/search/bookmarks", get(handle_search_bookmarks))
        .route("/api/v1/search/tasks", get(handle_search_tasks))
        .route("/api/v1/search/emoji", get(handle_search_emoji))
        .route("/api/v1/search/suggest", get(handle_suggest))
        // Write path:
        .route("/api/v1/index", post(handle_index_document))
        .route("/api/v1/index/message", post(handle_index_message))
        .route("/api/v1/index/file", post(handle_index_file))
        .route("/api/v1/index/user", post(handle_index_user))
        .route("/api/v1/index/channel", post(handle_index_channel))
        .route("/api/v1/index/bookmark", post(handle_index_bookmark))
        .route("/api/v1/index/task", post(handle_index_task))
        .route("/api/v1/index/bulk", post(handle_bulk_index))
        .route("/api/v1/index/batch-delete", post(handle_batch_delete))
        .route("/api/v1/index/reindex", post(handle_reindex))
        .route(
            "/api/v1/index/:index/:id",
            put(handle_update_document).delete(handle_delete_document),
        )
        .route("/api/v1/indices/:index/count", get(handle_count))
        .layer(Extension(service))
        .layer(Extension(writer))
}
