use super::service::SearchService;
use super::types::*;
use crate::error::{SearchError, SearchResult};

use axum::extract::Query;
use axum::extract::rejection::QueryRejection;
use axum::{Extension, Json};
use std::sync::Arc;

type QueryParams<T> = Result<Query<T>, QueryRejection>;

fn require_query(q: &str) -> SearchResult<()> {
    if q.trim().is_empty() {
        return Err(SearchError::validation("Query parameter 'q' is required"));
    }
    Ok(())
}

async fn search_entity(
    service: &SearchService,
    entity: EntityType,
    params: QueryParams<SearchParams>,
) -> SearchResult<Json<SearchResponse>> {
    let Query(params) = params?;
    require_query(&params.query)?;
    Ok(Json(service.search(entity, params).await))
}

pub async fn handle_search_messages(
    Extension(service): Extension<Arc<SearchService>>,
    params: QueryParams<SearchParams>,
) -> SearchResult<Json<SearchResponse>> {
    search_entity(&service, EntityType::Messages, params).await
}

pub async fn handle_search_files(
    Extension(service): Extension<Arc<SearchService>>,
    params: QueryParams<SearchParams>,
) -> SearchResult<Json<SearchResponse>> {
    search_entity(&service, EntityType::Files, params).await
}

pub async fn handle_search_users(
    Extension(service): Extension<Arc<SearchService>>,
    params: QueryParams<SearchParams>,
) -> SearchResult<Json<SearchResponse>> {
    search_entity(&service, EntityType::Users, params).await
}

pub async fn handle_search_channels(
    Extension(service): Extension<Arc<SearchService>>,
    params: QueryParams<SearchParams>,
) -> SearchResult<Json<SearchResponse>> {
    search_entity(&service, EntityType::Channels, params).await
}

pub async fn handle_search_bookmarks(
    Extension(service): Extension<Arc<SearchService>>,
    params: QueryParams<SearchParams>,
) -> SearchResult<Json<SearchResponse>> {
    search_entity(&service, EntityType::Bookmarks, params).await
}

pub async fn handle_search_tasks(
    Extension(service): Extension<Arc<SearchService>>,
    params: QueryParams<SearchParams>,
) -> SearchResult<Json<SearchResponse>> {
    search_entity(&service, EntityType::Tasks, params).await
}

pub async fn handle_search_emoji(
    Extension(service): Extension<Arc<SearchService>>,
    params: QueryParams<QueryScope>,
) -> SearchResult<Json<SearchResponse>> {
    let Query(scope) = params?;
    require_query(&scope.q)?;
    Ok(Json(service.search_emoji(&scope.q, &scope.workspace_id).await))
}

pub async fn handle_global_search(
    Extension(service): Extension<Arc<SearchService>>,
    params: QueryParams<SearchParams>,
) -> SearchResult<Json<GlobalSearchResponse>> {
    let Query(params) = params?;
    require_query(&params.query)?;
    Ok(Json(service.global_search(params).await))
}

/// An empty prefix yields no suggestions rather than an error.
pub async fn handle_suggest(
    Extension(service): Extension<Arc<SearchService>>,
    params: QueryParams<QueryScope>,
) -> SearchResult<Json<SuggestionResponse>> {
    let Query(scope) = params?;
    Ok(Json(service.suggest(scope.q.trim(), &scope.workspace_id).await))
}

pub async fn handle_health(
    Extension(service): Extension<Arc<SearchService>>,
) -> Json<HealthReport> {
    Json(service.health().await)
}
