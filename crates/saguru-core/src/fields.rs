//! Field names used at the store boundary.
//!
//! These names are part of the stored-document contract and must not change;
//! any term-query-capable backend holding previously indexed suggestions
//! relies on them.

/// Document id field reserved by the store.
pub const ID: &str = "_id";

/// Suggestion text field.
pub const TEXT: &str = "text";

/// Prefix of the per-token-position reading fields (`reading_0`,
/// `reading_1`, ...).
pub const READING_PREFIX: &str = "reading_";

/// Relevance score field reserved by the store.
pub const SCORE: &str = "score";

/// Query occurrence count field.
pub const QUERY_FREQ: &str = "queryFreq";

/// Document occurrence count field.
pub const DOC_FREQ: &str = "docFreq";

/// Manually assigned boost multiplier field.
pub const USER_BOOST: &str = "userBoost";

/// Provenance kind list field.
pub const KINDS: &str = "kinds";

/// Indexing timestamp field.
pub const TIMESTAMP: &str = "@timestamp";

/// Tag classification field.
pub const TAGS: &str = "tags";

/// Role classification field.
pub const ROLES: &str = "roles";

/// Source-field classification field.
pub const FIELDS: &str = "fields";

/// Language classification field.
pub const LANGUAGES: &str = "languages";

/// Role implicitly granted to every request.
pub const DEFAULT_ROLE: &str = "_anonymous";

/// Index name reported by a response that carries no hits.
pub const EMPTY_INDEX: &str = "";

/// Name of the reading field for a 0-based token position.
pub fn reading_field(position: usize) -> String {
    format!("{READING_PREFIX}{position}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_field_name() {
        assert_eq!(reading_field(0), "reading_0");
        assert_eq!(reading_field(12), "reading_12");
    }
}
