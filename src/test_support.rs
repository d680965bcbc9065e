//! Fakes shared by the module test suites.

use crate::cache::result_cache::ResultCache;
use crate::engine::client::{EngineError, EngineResult, SearchEngine};
use crate::search::types::{Document, IndexNames};
use crate::storage::memory::MemoryStore;
use crate::storage::store::KeyValueStore;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEST_PREFIX: &str = "search";

/// In-memory engine that records every search and can be told to fail.
#[derive(Default)]
pub struct FakeEngine {
    docs: DashMap<(String, String), Document>,
    responses: DashMap<String, Value>,
    searches: Mutex<Vec<(String, Value)>>,
    failing_indices: DashSet<String>,
    failing_ids: DashSet<String>,
    down: std::sync::atomic::AtomicBool,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Raw response returned by `search` on `index`.
    pub fn respond_with(&self, index: &str, raw: Value) {
        self.responses.insert(index.to_string(), raw);
    }

    /// Every call touching `index` fails with a 500.
    pub fn fail_index(&self, index: &str) {
        self.failing_indices.insert(index.to_string());
    }

    /// Writes of document `id` fail with a 400.
    pub fn fail_id(&self, id: &str) {
        self.failing_ids.insert(id.to_string());
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn searches(&self) -> Vec<(String, Value)> {
        self.searches.lock().unwrap().clone()
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }

    pub fn doc(&self, index: &str, id: &str) -> Option<Document> {
        self.docs
            .get(&(index.to_string(), id.to_string()))
            .map(|d| d.clone())
    }

    pub fn insert_doc(&self, index: &str, id: &str, doc: Document) {
        self.docs.insert((index.to_string(), id.to_string()), doc);
    }

    fn check_index(&self, index: &str) -> EngineResult<()> {
        if self.failing_indices.contains(index) {
            return Err(EngineError::Status {
                status: 500,
                body: format!("{} unavailable", index),
            });
        }
        Ok(())
    }

    fn check_id(&self, id: &str) -> EngineResult<()> {
        if self.failing_ids.contains(id) {
            return Err(EngineError::Status {
                status: 400,
                body: "mapper_parsing_exception".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SearchEngine for FakeEngine {
    async fn search(&self, index: &str, query: &Value) -> EngineResult<Value> {
        self.searches
            .lock()
            .unwrap()
            .push((index.to_string(), query.clone()));
        self.check_index(index)?;

        Ok(self
            .responses
            .get(index)
            .map(|r| r.clone())
            .unwrap_or_else(|| json!({ "hits": { "total": { "value": 0 }, "hits": [] } })))
    }

    async fn index_document(&self, index: &str, id: &str, doc: &Document) -> EngineResult<()> {
        self.check_index(index)?;
        self.check_id(id)?;
        self.insert_doc(index, id, doc.clone());
        Ok(())
    }

    async fn update_document(&self, index: &str, id: &str, partial: &Document) -> EngineResult<()> {
        self.check_index(index)?;
        let key = (index.to_string(), id.to_string());
        let Some(mut doc) = self.docs.get_mut(&key) else {
            return Err(EngineError::NotFound {
                index: index.to_string(),
                id: id.to_string(),
            });
        };
        for (field, value) in partial {
            doc.insert(field.clone(), value.clone());
        }
        Ok(())
    }

    async fn delete_document(&self, index: &str, id: &str) -> EngineResult<()> {
        self.check_index(index)?;
        match self.docs.remove(&(index.to_string(), id.to_string())) {
            Some(_) => Ok(()),
            None => Err(EngineError::NotFound {
                index: index.to_string(),
                id: id.to_string(),
            }),
        }
    }

    async fn count(&self, index: &str) -> EngineResult<i64> {
        self.check_index(index)?;
        Ok(self.docs.iter().filter(|e| e.key().0 == index).count() as i64)
    }

    async fn reindex(&self, source: &str, dest: &str) -> EngineResult<()> {
        self.check_index(source)?;
        let copies: Vec<(String, Document)> = self
            .docs
            .iter()
            .filter(|e| e.key().0 == source)
            .map(|e| (e.key().1.clone(), e.value().clone()))
            .collect();
        for (id, doc) in copies {
            self.insert_doc(dest, &id, doc);
        }
        Ok(())
    }

    async fn ping(&self) -> EngineResult<()> {
        if self.down.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(EngineError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

/// Store whose every call fails.
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Err(anyhow!("store unavailable"))
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Option<Duration>) -> Result<()> {
        Err(anyhow!("store unavailable"))
    }

    async fn del(&self, _keys: &[String]) -> Result<usize> {
        Err(anyhow!("store unavailable"))
    }

    async fn scan_prefix(&self, _prefix: &str) -> Result<Vec<String>> {
        Err(anyhow!("store unavailable"))
    }

    async fn ping(&self) -> Result<()> {
        Err(anyhow!("store unavailable"))
    }
}

/// Store that answers correctly but only after `delay`.
pub struct SlowStore {
    pub inner: MemoryStore,
    pub delay: Duration,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryStore::new(),
            delay,
        }
    }
}

#[async_trait]
impl KeyValueStore for SlowStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.set(key, value, ttl).await
    }

    async fn del(&self, keys: &[String]) -> Result<usize> {
        tokio::time::sleep(self.delay).await;
        self.inner.del(keys).await
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        tokio::time::sleep(self.delay).await;
        self.inner.scan_prefix(prefix).await
    }

    async fn ping(&self) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

pub fn test_indices() -> IndexNames {
    IndexNames::new(TEST_PREFIX)
}

/// A result cache over a fresh memory store, plus the store for inspection.
pub fn memory_cache() -> (ResultCache, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let cache = ResultCache::with_defaults(store.clone());
    (cache, store)
}

/// A raw engine response with the given total and `(id, score, source)` hits.
pub fn raw_hits(index: &str, total: i64, hits: &[(&str, f64, Value)]) -> Value {
    let hits: Vec<Value> = hits
        .iter()
        .map(|(id, score, source)| {
            json!({
                "_index": index,
                "_id": id,
                "_score": score,
                "_source": source,
            })
        })
        .collect();
    json!({ "hits": { "total": { "value": total, "relation": "eq" }, "hits": hits } })
}
