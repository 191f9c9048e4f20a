// Document store boundary

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::query::SearchSpec;

/// A transport or execution failure reported by the store.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    /// Human-readable cause.
    pub message: String,
}

impl StoreError {
    /// Wrap a cause message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One raw hit returned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreHit {
    /// Index the hit came from.
    pub index: String,

    /// Composite score the store computed for the hit.
    pub score: f64,

    /// Raw stored document.
    pub source: Map<String, Value>,
}

/// The store's answer to a search, hits already in requested sort order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreResponse {
    /// Time the store spent executing, in milliseconds.
    pub took_ms: u64,

    /// Total matching documents, which may exceed the returned hits.
    pub total_hits: u64,

    /// Number of shards/partitions that failed during execution.
    pub failed_shards: u32,

    /// Returned hits, capped at the requested size.
    pub hits: Vec<StoreHit>,
}

/// Capability interface of the term-indexed document store.
///
/// Execution is asynchronous; completion may occur on any thread of the
/// store's choosing. Implementations must be shareable across concurrent
/// requests.
#[async_trait]
pub trait SuggestStore: Send + Sync {
    /// Execute a search and return the raw hit envelope.
    async fn search(&self, spec: SearchSpec) -> Result<StoreResponse, StoreError>;
}
