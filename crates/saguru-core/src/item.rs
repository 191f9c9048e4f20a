// Suggestion entity

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fields;

/// Result type for item construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while constructing a suggestion item.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The readings array does not line up with the token positions.
    #[error("readings do not match token positions: {tokens} token(s), {readings} reading set(s)")]
    ReadingMismatch {
        /// Number of surface tokens.
        tokens: usize,
        /// Number of per-position reading sets.
        readings: usize,
    },
}

/// Provenance of a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Derived from an indexed document.
    Document,

    /// Derived from a previously executed query.
    Query,

    /// Submitted directly by a user.
    User,
}

impl Kind {
    /// Stable string form stored in the `kinds` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Document => "document",
            Kind::Query => "query",
            Kind::User => "user",
        }
    }

    /// Parse a stored kind string. Unknown values fall back to `Document`.
    pub fn parse(value: &str) -> Kind {
        match value {
            "user" => Kind::User,
            "query" => Kind::Query,
            _ => Kind::Document,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate suggestion.
///
/// Immutable after construction. `tokens` and `readings` are parallel
/// arrays: position `i` of `readings` holds the candidate phonetic readings
/// of token `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestItem {
    /// Surface-text tokens, split on whitespace. Order is significant.
    pub tokens: Vec<String>,

    /// Candidate phonetic readings per token position.
    pub readings: Vec<Vec<String>>,

    /// Source fields the suggestion was derived from.
    pub fields: Vec<String>,

    /// Tag classification values.
    pub tags: Vec<String>,

    /// Roles allowed to see this suggestion.
    pub roles: Vec<String>,

    /// Languages the suggestion belongs to.
    pub languages: Vec<String>,

    /// Provenance of the suggestion.
    pub kind: Kind,

    /// Occurrence count. Document count for `Document`, query count for
    /// `Query`, always 0 for `User`.
    pub frequency: u64,

    /// Manually assigned weight, independent of frequency.
    pub user_boost: f32,
}

impl SuggestItem {
    /// Build a suggestion item, enforcing the entity invariants.
    ///
    /// Classification sets are deduplicated preserving insertion order. A
    /// `User` item always carries frequency 0, whatever was passed in.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tokens: Vec<String>,
        readings: Vec<Vec<String>>,
        fields: Vec<String>,
        frequency: u64,
        user_boost: f32,
        tags: Vec<String>,
        roles: Vec<String>,
        languages: Vec<String>,
        kind: Kind,
    ) -> Result<Self> {
        if tokens.len() != readings.len() {
            return Err(Error::ReadingMismatch {
                tokens: tokens.len(),
                readings: readings.len(),
            });
        }

        let frequency = match kind {
            Kind::User => 0,
            _ => frequency,
        };

        Ok(Self {
            tokens,
            readings: readings.into_iter().map(dedup).collect(),
            fields: dedup(fields),
            tags: dedup(tags),
            roles: dedup(roles),
            languages: dedup(languages),
            kind,
            frequency,
            user_boost,
        })
    }

    /// The suggestion text: tokens joined with a single space.
    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }

    /// Emit the stored-document map for this item, using the fixed store
    /// field names. The frequency lands in `docFreq` or `queryFreq`
    /// depending on the kind; the other count is omitted so the store's
    /// missing-value default applies.
    pub fn to_source(&self) -> Map<String, Value> {
        let mut source = Map::new();
        source.insert(fields::TEXT.to_string(), Value::String(self.text()));
        for (position, candidates) in self.readings.iter().enumerate() {
            source.insert(fields::reading_field(position), string_array(candidates));
        }
        match self.kind {
            Kind::Document => {
                source.insert(fields::DOC_FREQ.to_string(), Value::from(self.frequency));
            }
            Kind::Query => {
                source.insert(fields::QUERY_FREQ.to_string(), Value::from(self.frequency));
            }
            Kind::User => {}
        }
        source.insert(fields::USER_BOOST.to_string(), Value::from(self.user_boost));
        source.insert(
            fields::KINDS.to_string(),
            Value::Array(vec![Value::String(self.kind.as_str().to_string())]),
        );
        source.insert(fields::TAGS.to_string(), string_array(&self.tags));
        source.insert(fields::ROLES.to_string(), string_array(&self.roles));
        source.insert(fields::FIELDS.to_string(), string_array(&self.fields));
        source.insert(fields::LANGUAGES.to_string(), string_array(&self.languages));
        source
    }

    /// Rebuild an item from a stored-document map.
    ///
    /// Tokens come from splitting the text field on spaces; readings are
    /// scanned position by position until a missing `reading_<n>` field
    /// terminates the scan, then padded or truncated to the token count so
    /// the parallel-array invariant holds even for malformed documents.
    /// The frequency is taken from `queryFreq` for `Query` items, `docFreq`
    /// for `Document` items, and forced to 0 for `User` items.
    pub fn from_source(source: &Map<String, Value>) -> Option<Self> {
        let text = source.get(fields::TEXT)?.as_str()?;
        let tokens: Vec<String> = text.split(' ').map(str::to_string).collect();

        let mut readings = Vec::new();
        let mut position = 0;
        while let Some(value) = source.get(&fields::reading_field(position)) {
            readings.push(string_list(value));
            position += 1;
        }
        readings.resize(tokens.len(), Vec::new());

        let kind = string_list(source.get(fields::KINDS).unwrap_or(&Value::Null))
            .first()
            .map(|k| Kind::parse(k))
            .unwrap_or(Kind::Document);
        let frequency = match kind {
            Kind::User => 0,
            Kind::Query => numeric_field(source, fields::QUERY_FREQ),
            Kind::Document => numeric_field(source, fields::DOC_FREQ),
        };
        let user_boost = source
            .get(fields::USER_BOOST)
            .and_then(Value::as_f64)
            .unwrap_or(1.0) as f32;

        Some(Self {
            tokens,
            readings,
            fields: list_field(source, fields::FIELDS),
            tags: list_field(source, fields::TAGS),
            roles: list_field(source, fields::ROLES),
            languages: list_field(source, fields::LANGUAGES),
            kind,
            frequency,
            user_boost,
        })
    }
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(values.len());
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

fn string_array(values: &[String]) -> Value {
    Value::Array(values.iter().cloned().map(Value::String).collect())
}

/// A stored set field may hold a single string or an array of strings.
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn list_field(source: &Map<String, Value>, field: &str) -> Vec<String> {
    source.get(field).map(string_list).unwrap_or_default()
}

fn numeric_field(source: &Map<String, Value>, field: &str) -> u64 {
    source.get(field).and_then(Value::as_u64).unwrap_or(0)
}
