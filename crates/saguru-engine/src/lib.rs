//! saguru-engine - Suggest Request Engine
//!
//! Turns a raw query plus filter/ranking options into a structured
//! multi-clause search, executes it against a term-indexed document store
//! and transforms the raw hits into a ranked, deduplicated response.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Single-resolution result handoff.
pub mod deferred;
/// Engine error taxonomy.
pub mod error;
/// Popular-words request and response transformation.
pub mod popular;
/// Store-boundary query model.
pub mod query;
/// Suggest request and its builder surface.
pub mod request;
/// Response envelopes.
pub mod response;
/// Reference composite-score evaluation.
pub mod score;
/// Document store capability boundary.
pub mod store;
/// The suggest engine.
pub mod suggest;

pub use deferred::{Deferred, ResponseFuture};
pub use error::{Error, Result};
pub use popular::PopularWordsRequest;
pub use query::{BoolClause, FunctionScoreQuery, QueryClause, ScoreFunction, SearchSpec};
pub use request::SuggestRequest;
pub use response::{PopularWordsResponse, SuggestResponse};
pub use store::{StoreError, StoreHit, StoreResponse, SuggestStore};
pub use suggest::{Suggester, SuggesterBuilder};

/// Engine library initialization
pub fn init() {
    let _ = tracing::subscriber::set_default(tracing::subscriber::NoSubscriber::default());
}
