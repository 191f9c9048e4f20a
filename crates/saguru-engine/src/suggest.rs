// Suggest engine
//
// Owns the request lifecycle: validation, query construction, composite
// scoring, asynchronous submission and transformation of raw hits into a
// ranked, deduplicated response.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use saguru_core::{fields, SuggestItem};
use saguru_reading::script::{is_hiragana, is_hiragana_only};
use saguru_reading::{Normalizer, ReadingConverter};

use crate::deferred::{Deferred, ResponseFuture};
use crate::error::{Error, Result};
use crate::query::{
    BoolClause, BoostMode, FunctionScoreQuery, Modifier, QueryClause, ScoreFunction, ScoreMode,
    SearchSpec, Sort,
};
use crate::request::{push_unique, SuggestRequest};
use crate::response::SuggestResponse;
use crate::store::{StoreResponse, SuggestStore};

/// The suggest request engine.
///
/// Holds the store connection and the configured linguistic collaborators;
/// all of them are read-only and shared across concurrent requests.
pub struct Suggester {
    store: Arc<dyn SuggestStore>,
    normalizer: Option<Arc<dyn Normalizer>>,
    converter: Option<Arc<dyn ReadingConverter>>,
}

/// Configures and builds a [`Suggester`].
pub struct SuggesterBuilder {
    store: Arc<dyn SuggestStore>,
    normalizer: Option<Arc<dyn Normalizer>>,
    converter: Option<Arc<dyn ReadingConverter>>,
}

impl SuggesterBuilder {
    /// Use a surface-form normalizer; without one, tokens pass through
    /// unchanged.
    pub fn normalizer(mut self, normalizer: Arc<dyn Normalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Use a reading converter; without one, the normalized token itself is
    /// the sole reading.
    pub fn reading_converter(mut self, converter: Arc<dyn ReadingConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Build the engine.
    pub fn build(self) -> Suggester {
        Suggester {
            store: self.store,
            normalizer: self.normalizer,
            converter: self.converter,
        }
    }
}

impl Suggester {
    /// An engine with no normalizer and no reading converter.
    pub fn new(store: Arc<dyn SuggestStore>) -> Self {
        Self::builder(store).build()
    }

    /// Start configuring an engine.
    pub fn builder(store: Arc<dyn SuggestStore>) -> SuggesterBuilder {
        SuggesterBuilder {
            store,
            normalizer: None,
            converter: None,
        }
    }

    /// Validate, build and submit a suggest request.
    ///
    /// Validation failures surface synchronously, before any store
    /// interaction. The returned future resolves exactly once with the
    /// ranked response or a search failure; dropping it abandons the
    /// request without cancelling anything at the store.
    pub fn suggest(&self, request: SuggestRequest) -> Result<ResponseFuture<SuggestResponse>> {
        if let Some(message) = request.validation_error() {
            return Err(Error::InvalidRequest(message));
        }
        let spec = self.build_spec(&request);
        Ok(self.submit(spec, move |raw| build_response(&request, raw)))
    }

    /// Submit a built search and hand the raw response to `transform` on
    /// whatever task the store completion runs on.
    pub(crate) fn submit<T, F>(&self, spec: SearchSpec, transform: F) -> ResponseFuture<T>
    where
        T: Send + 'static,
        F: FnOnce(StoreResponse) -> T + Send + 'static,
    {
        let (mut deferred, future) = Deferred::new();
        let store = Arc::clone(&self.store);
        debug!(index = %spec.index, size = spec.size, "submitting search");
        tokio::spawn(async move {
            match store.search(spec).await {
                Ok(raw) if raw.failed_shards > 0 => deferred.reject(Error::ShardFailure {
                    failed: raw.failed_shards,
                }),
                Ok(raw) => deferred.resolve(transform(raw)),
                Err(error) => deferred.reject(Error::Store(error)),
            }
        });
        future
    }

    /// Assemble the complete search: scored base query, filter clauses and
    /// fetch size.
    fn build_spec(&self, request: &SuggestRequest) -> SearchSpec {
        // Leave room for discarded duplicates; a fixed heuristic, not a
        // guarantee under high duplicate density.
        let fetch_size = if request.skip_duplicate_words {
            request.size * 2
        } else {
            request.size
        };

        let base = self.build_query(request);
        let scored = QueryClause::FunctionScore(Box::new(self.build_function_score(request, base)));

        let mut filters = Vec::new();
        if !request.tags.is_empty() {
            filters.push(filter_clause(fields::TAGS, request.tags.iter().cloned()));
        }
        let mut roles = request.roles.clone();
        push_unique(&mut roles, fields::DEFAULT_ROLE.to_string());
        filters.push(filter_clause(fields::ROLES, roles.into_iter()));
        if !request.fields.is_empty() {
            filters.push(filter_clause(fields::FIELDS, request.fields.iter().cloned()));
        }
        if !request.kinds.is_empty() {
            filters.push(filter_clause(
                fields::KINDS,
                request.kinds.iter().map(|kind| kind.as_str().to_string()),
            ));
        }

        let query = if filters.is_empty() {
            scored
        } else {
            let mut root = BoolClause::new().must(scored);
            root.filter = filters;
            QueryClause::Bool(root)
        };

        SearchSpec {
            index: request.index.clone(),
            category: request.category.clone(),
            query,
            size: fetch_size,
            sort: Sort::ScoreDesc,
        }
    }

    /// Build the positional reading query for the raw query text.
    ///
    /// Tokens are matched exactly per position; only the final token is
    /// prefix-matched, and only when the raw query does not end in
    /// whitespace. A position whose reading conversion degrades to zero
    /// candidates contributes no clause at all.
    fn build_query(&self, request: &SuggestRequest) -> QueryClause {
        let raw = request.query.as_str();
        let folded = raw.replace('　', " ");
        let tokens: Vec<&str> = folded.split(' ').filter(|t| !t.is_empty()).collect();
        if tokens.is_empty() {
            return QueryClause::MatchAll;
        }

        let prefix_query = !raw.ends_with(' ') && !raw.ends_with('　');
        let last_position = tokens.len() - 1;

        let mut root = BoolClause::new();
        for (position, token) in tokens.iter().enumerate() {
            let field = fields::reading_field(position);
            let normalized = match &self.normalizer {
                Some(normalizer) => normalizer.normalize(token, &request.languages),
                None => (*token).to_string(),
            };
            let readings = match &self.converter {
                Some(converter) => converter.convert(&normalized, &request.languages),
                None => vec![normalized],
            };
            if readings.is_empty() {
                debug!(position, "no reading candidates, dropping position clause");
                continue;
            }

            let mut group = BoolClause::with_minimum_should_match(1);
            for reading in readings {
                let clause = if position == last_position && prefix_query {
                    QueryClause::Prefix {
                        field: field.clone(),
                        value: reading,
                    }
                } else {
                    QueryClause::Term {
                        field: field.clone(),
                        value: reading,
                    }
                };
                group.should.push(clause);
            }
            root.must.push(QueryClause::Bool(group));
        }

        if root.must.is_empty() {
            QueryClause::MatchAll
        } else {
            QueryClause::Bool(root)
        }
    }

    /// Wrap the base query in the composite-score function list. The
    /// product replaces the store's native relevance score.
    fn build_function_score(
        &self,
        request: &SuggestRequest,
        base: QueryClause,
    ) -> FunctionScoreQuery {
        let mut functions = Vec::with_capacity(4);
        if is_single_token(&request.query) && !is_hiragana_only(&request.query) {
            functions.push(ScoreFunction::WeightedPrefix {
                field: fields::TEXT.to_string(),
                value: request.query.clone(),
                weight: request.prefix_match_weight,
            });
        }
        functions.push(log2p_factor(fields::DOC_FREQ));
        functions.push(log2p_factor(fields::QUERY_FREQ));
        functions.push(ScoreFunction::FieldFactor {
            field: fields::USER_BOOST.to_string(),
            missing: 1.0,
            modifier: Modifier::None,
            weight: 1.0,
        });

        FunctionScoreQuery {
            query: base,
            functions,
            boost_mode: BoostMode::Replace,
            score_mode: ScoreMode::Multiply,
        }
    }
}

/// OR-group over a filter value set.
fn filter_clause(field: &str, values: impl Iterator<Item = String>) -> QueryClause {
    let mut group = BoolClause::with_minimum_should_match(1);
    for value in values {
        group.should.push(QueryClause::Term {
            field: field.to_string(),
            value,
        });
    }
    QueryClause::Bool(group)
}

fn log2p_factor(field: &str) -> ScoreFunction {
    ScoreFunction::FieldFactor {
        field: field.to_string(),
        missing: 0.1,
        modifier: Modifier::Log2p,
        weight: 1.0,
    }
}

/// Whether the raw query is one token with no embedded whitespace.
fn is_single_token(query: &str) -> bool {
    !query.is_empty() && !query.contains(' ') && !query.contains('　')
}

/// Rank, deduplicate and cap the raw hits into the response.
fn build_response(request: &SuggestRequest, raw: StoreResponse) -> SuggestResponse {
    let index = raw
        .hits
        .first()
        .map(|hit| hit.index.clone())
        .unwrap_or_else(|| fields::EMPTY_INDEX.to_string());

    let single_token = is_single_token(&request.query);
    let hiragana_query = is_hiragana_only(&request.query);

    let mut accepted: Vec<String> = Vec::new();
    let mut priority_words = Vec::new();
    let mut secondary_words = Vec::new();
    let mut priority_items = Vec::new();
    let mut secondary_items = Vec::new();

    for hit in &raw.hits {
        if accepted.len() >= request.size {
            break;
        }
        let Some(text) = hit.source.get(fields::TEXT).and_then(Value::as_str) else {
            continue;
        };

        if request.skip_duplicate_words {
            let stripped = text.replace(' ', "");
            if accepted.iter().any(|word| word.replace(' ', "") == stripped) {
                continue;
            }
        }
        accepted.push(text.to_string());

        let prioritized = is_priority(request, single_token, hiragana_query, text);
        if prioritized {
            priority_words.push(text.to_string());
        } else {
            secondary_words.push(text.to_string());
        }

        if request.suggest_detail {
            match SuggestItem::from_source(&hit.source) {
                Some(item) if prioritized => priority_items.push(item),
                Some(item) => secondary_items.push(item),
                None => debug!("hit without readable source, no detail item"),
            }
        }
    }

    priority_words.extend(secondary_words);
    priority_items.extend(secondary_items);
    SuggestResponse::new(
        index,
        raw.took_ms,
        priority_words,
        raw.total_hits,
        priority_items,
    )
}

/// Whether a hit belongs in the priority bucket: the raw query literally
/// appears in the suggestion text, under single-token, non-Hiragana
/// conditions. A one-character query additionally requires the character
/// itself to lie outside the Hiragana block.
fn is_priority(
    request: &SuggestRequest,
    single_token: bool,
    hiragana_query: bool,
    text: &str,
) -> bool {
    if !request.match_word_first || hiragana_query || !single_token {
        return false;
    }
    if !text.contains(&request.query) {
        return false;
    }
    let mut chars = request.query.chars();
    match (chars.next(), chars.next()) {
        (Some(only), None) => !is_hiragana(only),
        _ => true,
    }
}
