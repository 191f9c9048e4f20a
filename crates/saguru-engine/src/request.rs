// Suggest request

use serde::{Deserialize, Serialize};

use saguru_core::Kind;

/// A single-use suggest request: query text, filters and ranking toggles.
///
/// Built fluently and handed to [`crate::Suggester::suggest`]; the engine
/// reads it but never mutates it. Filter sets stay free of duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestRequest {
    /// Target index.
    pub index: String,

    /// Optional type/category restriction within the index.
    pub category: Option<String>,

    /// Raw query text.
    pub query: String,

    /// Desired number of suggestions.
    pub size: usize,

    /// Tag filter values.
    pub tags: Vec<String>,

    /// Role filter values; a default anonymous role is added implicitly at
    /// query-construction time.
    pub roles: Vec<String>,

    /// Source-field filter values.
    pub fields: Vec<String>,

    /// Provenance kind filter values.
    pub kinds: Vec<Kind>,

    /// Language hints, passed to normalization and reading conversion.
    pub languages: Vec<String>,

    /// Whether to populate detailed items alongside the text list.
    pub suggest_detail: bool,

    /// Boost applied when a single-token query prefixes the suggestion
    /// text.
    pub prefix_match_weight: f32,

    /// Whether suggestions containing the query literally are promoted
    /// ahead of the rest.
    pub match_word_first: bool,

    /// Whether texts equal after space-stripping are collapsed to the
    /// highest-ranked one.
    pub skip_duplicate_words: bool,
}

impl SuggestRequest {
    /// A request against the given index with the documented defaults.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            category: None,
            query: String::new(),
            size: 10,
            tags: Vec::new(),
            roles: Vec::new(),
            fields: Vec::new(),
            kinds: Vec::new(),
            languages: Vec::new(),
            suggest_detail: true,
            prefix_match_weight: 2.0,
            match_word_first: true,
            skip_duplicate_words: true,
        }
    }

    /// Set the raw query text.
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Set the type/category restriction.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the desired result size.
    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
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

    /// Add a provenance kind filter value.
    pub fn kind(mut self, kind: Kind) -> Self {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
        self
    }

    /// Add a language hint.
    pub fn language(mut self, lang: impl Into<String>) -> Self {
        push_unique(&mut self.languages, lang.into());
        self
    }

    /// Toggle detailed items in the response.
    pub fn suggest_detail(mut self, enabled: bool) -> Self {
        self.suggest_detail = enabled;
        self
    }

    /// Set the single-token prefix-match boost.
    pub fn prefix_match_weight(mut self, weight: f32) -> Self {
        self.prefix_match_weight = weight;
        self
    }

    /// Toggle promotion of literally matching suggestions.
    pub fn match_word_first(mut self, enabled: bool) -> Self {
        self.match_word_first = enabled;
        self
    }

    /// Toggle space-stripped duplicate collapsing.
    pub fn skip_duplicate_words(mut self, enabled: bool) -> Self {
        self.skip_duplicate_words = enabled;
        self
    }

    /// Validation predicate; `Some` message means the request must be
    /// rejected before any store interaction.
    pub(crate) fn validation_error(&self) -> Option<String> {
        if self.index.trim().is_empty() {
            return Some("index must not be empty".to_string());
        }
        if self.size == 0 {
            return Some("size must be greater than zero".to_string());
        }
        None
    }
}

pub(crate) fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}
