use super::client::{EngineError, EngineResult, SearchEngine};
use super::protocol::*;
use crate::search::types::Document;

use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

/// HTTP client for an Elasticsearch-compatible engine.
pub struct ElasticClient {
    base_url: String,
    base: reqwest::Url,
    http_client: reqwest::Client,
}

impl ElasticClient {
    /// Builds a client for `base_url` (e.g. `http://localhost:9200`). Every
    /// request is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let base = reqwest::Url::parse(&base_url)?;
        if base.cannot_be_a_base() {
            anyhow::bail!("engine URL {} cannot carry a path", base_url);
        }
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            base,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends `segments` to the base URL, percent-encoding each one so that
    /// ids containing `/`, `?` or `#` stay a single path segment.
    fn url(&self, segments: &[&str]) -> EngineResult<reqwest::Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| EngineError::Transport(format!("invalid engine URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Turns a non-success response into an `EngineError::Status`.
    async fn check(response: reqwest::Response) -> EngineResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(EngineError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl SearchEngine for ElasticClient {
    async fn search(&self, index: &str, query: &Value) -> EngineResult<Value> {
        let url = self.url(&[index, ENDPOINT_SEARCH])?;
        tracing::debug!("POST {}", url);

        let response = self.http_client.post(url).json(query).send().await?;
        let response = Self::check(response).await?;
        let body: Value = response.json().await?;
        Ok(body)
    }

    async fn index_document(&self, index: &str, id: &str, doc: &Document) -> EngineResult<()> {
        let url = self.url(&[index, ENDPOINT_DOC, id])?;
        tracing::debug!("PUT {}", url);

        let response = self.http_client.put(url).json(doc).send().await?;
        let response = Self::check(response).await?;
        let ack: DocWriteResponse = response.json().await?;
        tracing::debug!("Indexed {}/{} -> {}", ack.index, ack.id, ack.result);
        Ok(())
    }

    async fn update_document(
        &self,
        index: &str,
        id: &str,
        partial: &Document,
    ) -> EngineResult<()> {
        let url = self.url(&[index, ENDPOINT_UPDATE, id])?;
        tracing::debug!("POST {}", url);

        let response = self
            .http_client
            .post(url)
            .json(&json!({ "doc": partial }))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(EngineError::NotFound {
                index: index.to_string(),
                id: id.to_string(),
            });
        }
        Self::check(response).await?;
        Ok(())
    }

    async fn delete_document(&self, index: &str, id: &str) -> EngineResult<()> {
        let url = self.url(&[index, ENDPOINT_DOC, id])?;
        tracing::debug!("DELETE {}", url);

        let response = self.http_client.delete(url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(EngineError::NotFound {
                index: index.to_string(),
                id: id.to_string(),
            });
        }
        Self::check(response).await?;
        Ok(())
    }

    async fn count(&self, index: &str) -> EngineResult<i64> {
        let url = self.url(&[index, ENDPOINT_COUNT])?;
        let response = self.http_client.get(url).send().await?;
        let response = Self::check(response).await?;
        let body: CountResponse = response.json().await?;
        Ok(body.count)
    }

    async fn reindex(&self, source: &str, dest: &str) -> EngineResult<()> {
        let url = self.url(&[ENDPOINT_REINDEX])?;
        tracing::debug!("POST {} ({} -> {})", url, source, dest);

        let body = json!({
            "source": { "index": source },
            "dest": { "index": dest },
        });
        let response = self.http_client.post(url).json(&body).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn ping(&self) -> EngineResult<()> {
        let response = self.http_client.get(&self.base_url).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}
