// Shared test harness: an in-memory document store.
//
// Interprets the engine's query model over stored suggestion documents and
// ranks hits with the reference composite-score evaluator, standing in for
// any term-query-capable backend.

use async_trait::async_trait;
use serde_json::{Map, Value};

use saguru_core::{fields, Kind, SuggestItem};
use saguru_engine::query::{BoolClause, QueryClause, SearchSpec};
use saguru_engine::score;
use saguru_engine::store::{StoreError, StoreHit, StoreResponse, SuggestStore};

/// In-memory store over suggestion documents.
pub struct MemoryStore {
    index: String,
    docs: Vec<Map<String, Value>>,
    failed_shards: u32,
    transport_error: Option<String>,
}

impl MemoryStore {
    /// A store holding the given items under the given index name.
    pub fn new(index: &str, items: &[SuggestItem]) -> Self {
        Self {
            index: index.to_string(),
            docs: items.iter().map(SuggestItem::to_source).collect(),
            failed_shards: 0,
            transport_error: None,
        }
    }

    /// A store that reports the given number of failed shards.
    pub fn with_failed_shards(mut self, failed_shards: u32) -> Self {
        self.failed_shards = failed_shards;
        self
    }

    /// A store whose transport always fails.
    pub fn failing(message: &str) -> Self {
        Self {
            index: String::new(),
            docs: Vec::new(),
            failed_shards: 0,
            transport_error: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl SuggestStore for MemoryStore {
    async fn search(&self, spec: SearchSpec) -> Result<StoreResponse, StoreError> {
        if let Some(message) = &self.transport_error {
            return Err(StoreError::new(message.clone()));
        }

        let mut scored: Vec<(f64, &Map<String, Value>)> = self
            .docs
            .iter()
            .filter(|doc| matches(&spec.query, doc))
            .map(|doc| (score_of(&spec.query, doc), doc))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let total_hits = scored.len() as u64;
        let hits = scored
            .into_iter()
            .take(spec.size)
            .map(|(hit_score, doc)| StoreHit {
                index: self.index.clone(),
                score: hit_score,
                source: doc.clone(),
            })
            .collect();

        Ok(StoreResponse {
            took_ms: 1,
            total_hits,
            failed_shards: self.failed_shards,
            hits,
        })
    }
}

fn matches(clause: &QueryClause, source: &Map<String, Value>) -> bool {
    match clause {
        QueryClause::MatchAll => true,
        QueryClause::Term { field, value } => {
            field_strings(source, field).iter().any(|v| v == value)
        }
        QueryClause::Prefix { field, value } => field_strings(source, field)
            .iter()
            .any(|v| v.starts_with(value.as_str())),
        QueryClause::Bool(clause) => bool_matches(clause, source),
        QueryClause::FunctionScore(fsq) => matches(&fsq.query, source),
    }
}

fn bool_matches(clause: &BoolClause, source: &Map<String, Value>) -> bool {
    if !clause.must.iter().all(|c| matches(c, source)) {
        return false;
    }
    if !clause.filter.iter().all(|c| matches(c, source)) {
        return false;
    }
    if clause.should.is_empty() {
        return true;
    }
    let required = if clause.minimum_should_match == 0 {
        // Pure should-queries need at least one match.
        usize::from(clause.must.is_empty() && clause.filter.is_empty())
    } else {
        clause.minimum_should_match as usize
    };
    clause
        .should
        .iter()
        .filter(|c| matches(c, source))
        .count()
        >= required
}

fn score_of(clause: &QueryClause, source: &Map<String, Value>) -> f64 {
    match clause {
        QueryClause::FunctionScore(fsq) => score::evaluate(fsq, 1.0, source),
        QueryClause::Bool(bool_clause) => bool_clause
            .must
            .iter()
            .map(|c| score_of(c, source))
            .product(),
        _ => 1.0,
    }
}

fn field_strings(source: &Map<String, Value>, field: &str) -> Vec<String> {
    match source.get(field) {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// An item whose readings equal its tokens, carrying the default role.
pub fn plain_item(text: &str, kind: Kind, frequency: u64) -> SuggestItem {
    item_with_readings(
        text,
        &text.split(' ').map(|t| vec![t]).collect::<Vec<_>>(),
        kind,
        frequency,
    )
}

/// An item with explicit per-position reading candidates.
pub fn item_with_readings(
    text: &str,
    readings: &[Vec<&str>],
    kind: Kind,
    frequency: u64,
) -> SuggestItem {
    SuggestItem::new(
        text.split(' ').map(str::to_string).collect(),
        readings
            .iter()
            .map(|candidates| candidates.iter().map(|c| c.to_string()).collect())
            .collect(),
        vec!["content".to_string()],
        frequency,
        1.0,
        Vec::new(),
        vec![fields::DEFAULT_ROLE.to_string()],
        vec!["en".to_string()],
        kind,
    )
    .unwrap()
}
