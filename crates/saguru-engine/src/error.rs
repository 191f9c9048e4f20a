//! Engine error taxonomy.

use crate::store::StoreError;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to suggest callers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request failed local validation; raised synchronously before any
    /// store interaction.
    #[error("invalid suggest request: {0}")]
    InvalidRequest(String),

    /// The store reported partial failure executing the query.
    #[error("search failure: {failed} shard(s) failed")]
    ShardFailure {
        /// Number of failed shards.
        failed: u32,
    },

    /// The store or its transport failed outright.
    #[error("search failure")]
    Store(#[from] StoreError),

    /// The pending result was dropped before a resolution arrived.
    #[error("suggest request dropped before completion")]
    Abandoned,
}
