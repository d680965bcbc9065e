use super::types::*;
use super::writer::IndexWriter;
use crate::error::SearchResult;
use crate::search::types::{Document, EntityType};

use axum::extract::Path;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::{Extension, Json};
use std::sync::Arc;

type JsonBody<T> = Result<Json<T>, JsonRejection>;

pub async fn handle_index_document(
    Extension(writer): Extension<Arc<IndexWriter>>,
    payload: JsonBody<IndexRequest>,
) -> SearchResult<(StatusCode, Json<IndexAck>)> {
    let Json(req) = payload?;
    let index = writer.indices().resolve(&req.index);
    writer.index_document(&index, &req.id, &req.document).await?;
    Ok((
        StatusCode::CREATED,
        Json(IndexAck {
            indexed: true,
            id: req.id,
        }),
    ))
}

/// Raw documents carry their own `id` field.
async fn index_raw(
    writer: &IndexWriter,
    entity: EntityType,
    doc: Document,
) -> SearchResult<(StatusCode, Json<IndexAck>)> {
    let id = document_id(&doc)?;
    let index = writer.indices().index_for(entity);
    writer.index_document(&index, &id, &doc).await?;
    Ok((StatusCode::CREATED, Json(IndexAck { indexed: true, id })))
}

pub async fn handle_index_message(
    Extension(writer): Extension<Arc<IndexWriter>>,
    payload: JsonBody<Document>,
) -> SearchResult<(StatusCode, Json<IndexAck>)> {
    let Json(doc) = payload?;
    index_raw(&writer, EntityType::Messages, doc).await
}

pub async fn handle_index_file(
    Extension(writer): Extension<Arc<IndexWriter>>,
    payload: JsonBody<Document>,
) -> SearchResult<(StatusCode, Json<IndexAck>)> {
    let Json(doc) = payload?;
    index_raw(&writer, EntityType::Files, doc).await
}

pub async fn handle_index_user(
    Extension(writer): Extension<Arc<IndexWriter>>,
    payload: JsonBody<IndexUserRequest>,
) -> SearchResult<(StatusCode, Json<IndexAck>)> {
    let Json(req) = payload?;
    let ack = writer.index_typed(EntityType::Users, req).await?;
    Ok((StatusCode::CREATED, Json(ack)))
}

pub async fn handle_index_channel(
    Extension(writer): Extension<Arc<IndexWriter>>,
    payload: JsonBody<IndexChannelRequest>,
) -> SearchResult<(StatusCode, Json<IndexAck>)> {
    let Json(req) = payload?;
    let ack = writer.index_typed(EntityType::Channels, req).await?;
    Ok((StatusCode::CREATED, Json(ack)))
}

pub async fn handle_index_bookmark(
    Extension(writer): Extension<Arc<IndexWriter>>,
    payload: JsonBody<IndexBookmarkRequest>,
) -> SearchResult<(StatusCode, Json<IndexAck>)> {
    let Json(req) = payload?;
    let ack = writer.index_typed(EntityType::Bookmarks, req).await?;
    Ok((StatusCode::CREATED, Json(ack)))
}

pub async fn handle_index_task(
    Extension(writer): Extension<Arc<IndexWriter>>,
    payload: JsonBody<IndexTaskRequest>,
) -> SearchResult<(StatusCode, Json<IndexAck>)> {
    let Json(req) = payload?;
    let ack = writer.index_typed(EntityType::Tasks, req).await?;
    Ok((StatusCode::CREATED, Json(ack)))
}

pub async fn handle_bulk_index(
    Extension(writer): Extension<Arc<IndexWriter>>,
    payload: JsonBody<BulkIndexRequest>,
) -> SearchResult<Json<BulkIndexResponse>> {
    let Json(mut req) = payload?;
    for item in req.documents.iter_mut() {
        item.index = writer.indices().resolve(&item.index);
    }
    let response = writer.bulk_index(&req.documents).await?;
    Ok(Json(response))
}

pub async fn handle_batch_delete(
    Extension(writer): Extension<Arc<IndexWriter>>,
    payload: JsonBody<BatchDeleteRequest>,
) -> SearchResult<Json<BatchDeleteResponse>> {
    let Json(req) = payload?;
    let index = writer.indices().resolve(&req.index);
    let response = writer.batch_delete(&index, &req.ids).await?;
    Ok(Json(response))
}

pub async fn handle_reindex(
    Extension(writer): Extension<Arc<IndexWriter>>,
    payload: JsonBody<ReindexRequest>,
) -> SearchResult<Json<ReindexResponse>> {
    let Json(req) = payload?;
    let index = writer.indices().resolve(&req.index);
    let response = writer.reindex(&index).await?;
    Ok(Json(response))
}

pub async fn handle_update_document(
    Path((index, id)): Path<(String, String)>,
    Extension(writer): Extension<Arc<IndexWriter>>,
    payload: JsonBody<UpdateDocumentRequest>,
) -> SearchResult<Json<IndexAck>> {
    let Json(req) = payload?;
    let index = writer.indices().resolve(&index);
    writer.update_document(&index, &id, &req.document).await?;
    Ok(Json(IndexAck { indexed: true, id }))
}

pub async fn handle_delete_document(
    Path((index, id)): Path<(String, String)>,
    Extension(writer): Extension<Arc<IndexWriter>>,
) -> SearchResult<StatusCode> {
    let index = writer.indices().resolve(&index);
    writer.delete_document(&index, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn handle_count(
    Path(index): Path<String>,
    Extension(writer): Extension<Arc<IndexWriter>>,
) -> SearchResult<Json<CountResponse>> {
    let index = writer.indices().resolve(&index);
    let response = writer.count(&index).await?;
    Ok(Json(response))
}
