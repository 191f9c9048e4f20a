// Popular-words request
//
// Frequency-ranked word list without query text: the match-everything
// counterpart of the suggest request, scored by query frequency and user
// boost alone.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use saguru_core::fields;

use crate::deferred::ResponseFuture;
use crate::error::{Error, Result};
use crate::query::{
    BoolClause, BoostMode, FunctionScoreQuery, Modifier, QueryClause, ScoreFunction, ScoreMode,
    SearchSpec, Sort,
};
use crate::request::push_unique;
use crate::response::PopularWordsResponse;
use crate::store::StoreResponse;
use crate::suggest::Suggester;

/// A single-use popular-words request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularWordsRequest {
    /// Target index.
    pub index: String,

    /// Desired number of words.
    pub size: usize,

    /// Raw hits fetched from the store to survive deduplication and
    /// exclusion; must be at least `size`.
    pub window_size: usize,

    /// Tag filter values.
    pub tags: Vec<String>,

    /// Role filter values; the default anonymous role is added implicitly.
    pub roles: Vec<String>,

    /// Source-field filter values.
    pub fields: Vec<String>,

    /// Language filter values.
    pub languages: Vec<String>,

    /// Words never returned, compared after space-stripping.
    pub exclude_words: Vec<String>,
}

impl PopularWordsRequest {
    /// A request against the given index with defaults.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            size: 10,
            window_size: 100,
            tags: Vec::new(),
            roles: Vec::new(),
            fields: Vec::new(),
            languages: Vec::new(),
            exclude_words: Vec::new(),
        }
    }

    /// Set the desired result size.
    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Set the raw fetch window.
    pub fn window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Add a tag filter value.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        push_unique(&mut self.tags, tag.into());
        self
    }

    /// Add a role filter value.
    pub fn role(mut self, role: impl Into<String>) -> Self {
        push_unique(&mut self.roles, role.into());
        self
    }

    /// Add a source-field filter value.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        push_unique(&mut self.fields, field.into());
        self
    }

    /// Add a language filter value.
    pub fn language(mut self, lang: impl Into<String>) -> Self {
        push_unique(&mut self.languages, lang.into());
        self
    }

    /// Add a word to exclude from the result.
    pub fn exclude_word(mut self, word: impl Into<String>) -> Self {
        push_unique(&mut self.exclude_words, word.into());
        self
    }

    pub(crate) fn validation_error(&self) -> Option<String> {
        if self.index.trim().is_empty() {
            return Some("index must not be empty".to_string());
        }
        if self.size == 0 {
            return Some("size must be greater than zero".to_string());
        }
        if self.window_size < self.size {
            return Some(format!(
                "window_size {} must not be smaller than size {}",
                self.window_size, self.size
            ));
        }
        None
    }
}

impl Suggester {
    /// Validate, build and submit a popular-words request.
    ///
    /// Same lifecycle as [`Suggester::suggest`]: synchronous validation,
    /// asynchronous submission, exactly one resolution.
    pub fn popular_words(
        &self,
        request: PopularWordsRequest,
    ) -> Result<ResponseFuture<PopularWordsResponse>> {
        if let Some(message) = request.validation_error() {
            return Err(Error::InvalidRequest(message));
        }
        let spec = build_popular_spec(&request);
        Ok(self.submit(spec, move |raw| build_popular_response(&request, raw)))
    }
}

fn build_popular_spec(request: &PopularWordsRequest) -> SearchSpec {
    let scored = QueryClause::FunctionScore(Box::new(FunctionScoreQuery {
        query: QueryClause::MatchAll,
        functions: vec![
            ScoreFunction::FieldFactor {
                field: fields::QUERY_FREQ.to_string(),
                missing: 0.1,
                modifier: Modifier::Log2p,
                weight: 1.0,
            },
            ScoreFunction::FieldFactor {
                field: fields::USER_BOOST.to_string(),
                missing: 1.0,
                modifier: Modifier::None,
                weight: 1.0,
            },
        ],
        boost_mode: BoostMode::Replace,
        score_mode: ScoreMode::Multiply,
    }));

    let mut filters = Vec::new();
    if !request.tags.is_empty() {
        filters.push(or_terms(fields::TAGS, request.tags.iter().cloned()));
    }
    let mut roles = request.roles.clone();
    push_unique(&mut roles, fields::DEFAULT_ROLE.to_string());
    filters.push(or_terms(fields::ROLES, roles.into_iter()));
    if !request.fields.is_empty() {
        filters.push(or_terms(fields::FIELDS, request.fields.iter().cloned()));
    }
    if !request.languages.is_empty() {
        filters.push(or_terms(fields::LANGUAGES, request.languages.iter().cloned()));
    }

    let mut root = BoolClause::new().must(scored);
    root.filter = filters;

    SearchSpec {
        index: request.index.clone(),
        category: None,
        query: QueryClause::Bool(root),
        size: request.window_size,
        sort: Sort::ScoreDesc,
    }
}

fn or_terms(field: &str, values: impl Iterator<Item = String>) -> QueryClause {
    let mut group = BoolClause::with_minimum_should_match(1);
    for value in values {
        group.should.push(QueryClause::Term {
            field: field.to_string(),
            value,
        });
    }
    QueryClause::Bool(group)
}

fn build_popular_response(
    request: &PopularWordsRequest,
    raw: StoreResponse,
) -> PopularWordsResponse {
    let index = raw
        .hits
        .first()
        .map(|hit| hit.index.clone())
        .unwrap_or_else(|| fields::EMPTY_INDEX.to_string());

    let excluded: Vec<String> = request
        .exclude_words
        .iter()
        .map(|word| word.replace(' ', ""))
        .collect();

    let mut words: Vec<String> = Vec::new();
    for hit in &raw.hits {
        if words.len() >= request.size {
            break;
        }
        let Some(text) = hit.source.get(fields::TEXT).and_then(Value::as_str) else {
            debug!("hit without text field, skipping");
            continue;
        };
        let stripped = text.replace(' ', "");
        if excluded.contains(&stripped) {
            continue;
        }
        if words.iter().any(|word| word.replace(' ', "") == stripped) {
            continue;
        }
        words.push(text.to_string());
    }

    PopularWordsResponse::new(index, raw.took_ms, words, raw.total_hits)
}
