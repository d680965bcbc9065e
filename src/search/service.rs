//! Search Orchestrator
//!
//! One operation per entity type, all running the same pipeline:
//! normalize -> cache lookup -> clauses -> query -> engine -> normalize -> cache.
//! Engine failures degrade to an empty page; they never reach the caller.

use super::query::{SUGGEST_FIELDS, SUGGEST_LIMIT, build_query, build_suggest_query, clauses_for};
use super::response::{extract_suggestions, normalize_response};
use super::types::*;
use crate::cache::result_cache::{ResultCache, cache_key};
use crate::engine::client::SearchEngine;

use std::sync::Arc;

/// Page size of the emoji picker search.
pub const EMOJI_PER_PAGE: i64 = 50;
/// Per-type page size floor of a global search.
pub const GLOBAL_MIN_PER_TYPE: i64 = 5;

/// Per-type page size of a global search: a quarter of the request, but never
/// fewer than five when the request itself is small.
pub fn global_per_type(per_page: i64) -> i64 {
    if per_page > GLOBAL_MIN_PER_TYPE {
        per_page / 4
    } else {
        GLOBAL_MIN_PER_TYPE
    }
}

pub struct SearchService {
    engine: Arc<dyn SearchEngine>,
    cache: ResultCache,
    indices: IndexNames,
}

impl SearchService {
    pub fn new(engine: Arc<dyn SearchEngine>, cache: ResultCache, indices: IndexNames) -> Self {
        Self {
            engine,
            cache,
            indices,
        }
    }

    /// Runs the search pipeline for one entity type.
    pub async fn search(&self, entity: EntityType, params: SearchParams) -> SearchResponse {
        let params = params.normalized();

        let key = cache_key(entity, &params);
        if let Some(cached) = self.cache.get(&key).await {
            return cached;
        }

        let query = build_query(clauses_for(entity, &params), &params);
        let index = self.indices.index_for(entity);

        let raw = match self.engine.search(&index, &query).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Search on {} degraded to empty result: {}", index, e);
                return SearchResponse::empty(params.page, params.per_page);
            }
        };

        let response = normalize_response(&raw, params.page, params.per_page);
        tracing::debug!(
            "Search {} q={:?} -> {} hits (total {})",
            index,
            params.query,
            response.results.len(),
            response.total
        );

        self.cache.set(&key, &response).await;
        response
    }

    pub async fn search_messages(&self, params: SearchParams) -> SearchResponse {
        self.search(EntityType::Messages, params).await
    }

    pub async fn search_files(&self, params: SearchParams) -> SearchResponse {
        self.search(EntityType::Files, params).await
    }

    pub async fn search_users(&self, params: SearchParams) -> SearchResponse {
        self.search(EntityType::Users, params).await
    }

    pub async fn search_channels(&self, params: SearchParams) -> SearchResponse {
        self.search(EntityType::Channels, params).await
    }

    pub async fn search_bookmarks(&self, params: SearchParams) -> SearchResponse {
        self.search(EntityType::Bookmarks, params).await
    }

    pub async fn search_tasks(&self, params: SearchParams) -> SearchResponse {
        self.search(EntityType::Tasks, params).await
    }

    /// Emoji picker search: always the first page of fifty.
    pub async fn search_emoji(&self, query: &str, workspace_id: &str) -> SearchResponse {
        let params = SearchParams {
            per_page: EMOJI_PER_PAGE,
            ..SearchParams::new(query, workspace_id)
        };
        self.search(EntityType::Emoji, params).await
    }

    /// Searches messages, files, users and channels concurrently with a shared
    /// result budget. The response is assembled once all four have finished.
    pub async fn global_search(&self, params: SearchParams) -> GlobalSearchResponse {
        let params = params.normalized();
        let per_type = SearchParams {
            per_page: global_per_type(params.per_page),
            ..params
        };

        let (messages, files, users, channels) = tokio::join!(
            self.search(EntityType::Messages, per_type.clone()),
            self.search(EntityType::Files, per_type.clone()),
            self.search(EntityType::Users, per_type.clone()),
            self.search(EntityType::Channels, per_type),
        );

        GlobalSearchResponse {
            messages,
            files,
            users,
            channels,
        }
    }

    /// Autocomplete across every entity index.
    pub async fn suggest(&self, query: &str, workspace_id: &str) -> SuggestionResponse {
        if query.is_empty() {
            return SuggestionResponse {
                suggestions: Vec::new(),
            };
        }

        let pattern = self.indices.all_pattern();
        let body = build_suggest_query(query, workspace_id);

        let suggestions = match self.engine.search(&pattern, &body).await {
            Ok(raw) => extract_suggestions(&raw, &SUGGEST_FIELDS, SUGGEST_LIMIT),
            Err(e) => {
                tracing::warn!("Suggest on {} degraded to empty result: {}", pattern, e);
                Vec::new()
            }
        };

        SuggestionResponse { suggestions }
    }

    /// Connectivity of the engine and the cache store.
    pub async fn health(&self) -> HealthReport {
        let engine = match self.engine.ping().await {
            Ok(()) => "connected",
            Err(e) => {
                tracing::warn!("Engine health check failed: {}", e);
                "disconnected"
            }
        };
        let cache = if self.cache.ping().await {
            "connected"
        } else {
            "disconnected"
        };

        HealthReport {
            service: SERVICE_NAME.to_string(),
            status: "healthy".to_string(),
            engine: engine.to_string(),
            cache: cache.to_string(),
        }
    }
}

pub const SERVICE_NAME: &str = "search-gateway";
