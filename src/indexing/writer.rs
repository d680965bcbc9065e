use super::types::*;
use crate::cache::result_cache::ResultCache;
use crate::engine::client::SearchEngine;
use crate::engine::protocol::REINDEX_SUFFIX;
use crate::error::{SearchError, SearchResult};
use crate::search::types::{Document, EntityType, IndexNames};

use std::sync::Arc;

/// Writes documents to the engine and keeps the result cache honest.
///
/// Every successful write drops the cached pages of the entity type the
/// target index belongs to. Writes to indices outside the known entity set
/// are passed through without invalidation.
pub struct IndexWriter {
    engine: Arc<dyn SearchEngine>,
    cache: ResultCache,
    indices: IndexNames,
}

impl IndexWriter {
    pub fn new(engine: Arc<dyn SearchEngine>, cache: ResultCache, indices: IndexNames) -> Self {
        Self {
            engine,
            cache,
            indices,
        }
    }

    pub fn indices(&self) -> &IndexNames {
        &self.indices
    }

    async fn invalidate_for(&self, index: &str) {
        match self.indices.entity_of(index) {
            Some(entity) => {
                self.cache.invalidate(entity).await;
            }
            None => tracing::debug!("No cached entity type for index {}", index),
        }
    }

    pub async fn index_document(&self, index: &str, id: &str, doc: &Document) -> SearchResult<()> {
        if id.is_empty() {
            return Err(SearchError::validation("Document id is required"));
        }

        if let Err(e) = self.engine.index_document(index, id, doc).await {
            tracing::error!("Failed to index {}/{}: {}", index, id, e);
            return Err(e.into());
        }

        tracing::debug!("Indexed {}/{}", index, id);
        self.invalidate_for(index).await;
        Ok(())
    }

    /// Indexes a typed request into the index of `entity`.
    pub async fn index_typed<T: TypedDocument>(
        &self,
        entity: EntityType,
        request: T,
    ) -> SearchResult<IndexAck> {
        request.validate()?;
        let id = request.id().to_string();
        let index = self.indices.index_for(entity);
        self.index_document(&index, &id, &request.into_document())
            .await?;
        Ok(IndexAck { indexed: true, id })
    }

    pub async fn update_document(
        &self,
        index: &str,
        id: &str,
        partial: &Document,
    ) -> SearchResult<()> {
        if partial.is_empty() {
            return Err(SearchError::validation("Update document must not be empty"));
        }

        if let Err(e) = self.engine.update_document(index, id, partial).await {
            tracing::error!("Failed to update {}/{}: {}", index, id, e);
            return Err(e.into());
        }

        self.invalidate_for(index).await;
        Ok(())
    }

    pub async fn delete_document(&self, index: &str, id: &str) -> SearchResult<()> {
        if let Err(e) = self.engine.delete_document(index, id).await {
            tracing::error!("Failed to delete {}/{}: {}", index, id, e);
            return Err(e.into());
        }

        tracing::debug!("Deleted {}/{}", index, id);
        self.invalidate_for(index).await;
        Ok(())
    }

    /// Indexes each document independently. One failure never stops the
    /// batch; it is counted and described in `errors`.
    pub async fn bulk_index(&self, documents: &[IndexRequest]) -> SearchResult<BulkIndexResponse> {
        check_batch_size("Bulk index", documents.len())?;

        let mut response = BulkIndexResponse::default();
        let mut touched: Vec<&str> = Vec::new();

        for item in documents {
            let result = if item.id.is_empty() {
                Err("document id is required".to_string())
            } else {
                self.engine
                    .index_document(&item.index, &item.id, &item.document)
                    .await
                    .map_err(|e| e.to_string())
            };

            match result {
                Ok(()) => {
                    response.indexed += 1;
                    if !touched.contains(&item.index.as_str()) {
                        touched.push(&item.index);
                    }
                }
                Err(e) => {
                    response.failed += 1;
                    response.errors.push(format!("{}/{}: {}", item.index, item.id, e));
                }
            }
        }

        for index in touched {
            self.invalidate_for(index).await;
        }

        if response.failed > 0 {
            tracing::warn!(
                "Bulk index finished with {} indexed, {} failed",
                response.indexed,
                response.failed
            );
        } else {
            tracing::info!("Bulk indexed {} documents", response.indexed);
        }
        Ok(response)
    }

    /// Deletes each id independently; missing documents count as failures.
    pub async fn batch_delete(&self, index: &str, ids: &[String]) -> SearchResult<BatchDeleteResponse> {
        check_batch_size("Batch delete", ids.len())?;

        let mut response = BatchDeleteResponse::default();
        for id in ids {
            match self.engine.delete_document(index, id).await {
                Ok(()) => response.deleted += 1,
                Err(e) => {
                    response.failed += 1;
                    response.errors.push(format!("{}: {}", id, e));
                }
            }
        }

        if response.deleted > 0 {
            self.invalidate_for(index).await;
        }

        tracing::info!(
            "Batch delete on {}: {} deleted, {} failed",
            index,
            response.deleted,
            response.failed
        );
        Ok(response)
    }

    /// Copies `index` into `<index>_reindexed`.
    pub async fn reindex(&self, index: &str) -> SearchResult<ReindexResponse> {
        if index.is_empty() {
            return Err(SearchError::validation("'index' is required"));
        }

        let dest = format!("{}{}", index, REINDEX_SUFFIX);
        if let Err(e) = self.engine.reindex(index, &dest).await {
            tracing::error!("Failed to reindex {} into {}: {}", index, dest, e);
            return Err(e.into());
        }

        tracing::info!("Reindexed {} into {}", index, dest);
        self.invalidate_for(index).await;
        Ok(ReindexResponse {
            message: "Reindex completed".to_string(),
            index: index.to_string(),
        })
    }

    pub async fn count(&self, index: &str) -> SearchResult<CountResponse> {
        let count = self.engine.count(index).await?;
        Ok(CountResponse {
            index: index.to_string(),
            count,
        })
    }
}
