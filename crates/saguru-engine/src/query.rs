// Store-boundary query model
//
// A structured, backend-neutral rendition of the term/prefix/bool and
// function-score primitives the engine consumes from the document store.

use serde::{Deserialize, Serialize};

/// A boolean-composable query clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryClause {
    /// Matches every document.
    MatchAll,

    /// Exact term match on a named field.
    Term {
        /// Target field.
        field: String,
        /// Term value.
        value: String,
    },

    /// Prefix match on a named field.
    Prefix {
        /// Target field.
        field: String,
        /// Value prefix.
        value: String,
    },

    /// Boolean combination of clauses.
    Bool(BoolClause),

    /// A clause whose relevance score is replaced or combined by scoring
    /// functions.
    FunctionScore(Box<FunctionScoreQuery>),
}

/// Boolean combination: all `must` and `filter` clauses are required,
/// `filter` does not contribute to scoring, and at least
/// `minimum_should_match` of the `should` clauses must match when any are
/// present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoolClause {
    /// Required, scoring clauses.
    pub must: Vec<QueryClause>,

    /// Optional clauses, constrained by `minimum_should_match`.
    pub should: Vec<QueryClause>,

    /// Required, non-scoring clauses.
    pub filter: Vec<QueryClause>,

    /// Minimum number of `should` clauses that must match; 0 means the
    /// `should` clauses are purely optional.
    pub minimum_should_match: u32,
}

impl BoolClause {
    /// An empty boolean clause.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty boolean clause requiring at least `n` should-matches.
    pub fn with_minimum_should_match(n: u32) -> Self {
        Self {
            minimum_should_match: n,
            ..Self::default()
        }
    }

    /// Add a required clause.
    pub fn must(mut self, clause: QueryClause) -> Self {
        self.must.push(clause);
        self
    }

    /// Add an optional clause.
    pub fn should(mut self, clause: QueryClause) -> Self {
        self.should.push(clause);
        self
    }

    /// Add a non-scoring required clause.
    pub fn filter(mut self, clause: QueryClause) -> Self {
        self.filter.push(clause);
        self
    }
}

/// Numeric modifier applied to a field-factor value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modifier {
    /// Use the value as-is.
    None,

    /// `log2(1 + value)`.
    Log2p,
}

/// A single scoring function within a function-score query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScoreFunction {
    /// Contributes `weight` when the document's field value starts with the
    /// given prefix; contributes nothing (is omitted from combination)
    /// otherwise.
    WeightedPrefix {
        /// Target field.
        field: String,
        /// Required prefix.
        value: String,
        /// Weight contributed on match.
        weight: f32,
    },

    /// Contributes `weight * modifier(field value)`, substituting `missing`
    /// when the document lacks the field.
    FieldFactor {
        /// Numeric source field.
        field: String,
        /// Value assumed when the field is absent.
        missing: f64,
        /// Modifier applied to the (possibly substituted) value.
        modifier: Modifier,
        /// Multiplicative weight.
        weight: f32,
    },
}

/// How the function-score result combines with the base relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoostMode {
    /// Discard the base score; the function result stands alone.
    Replace,

    /// Multiply the base score by the function result.
    Multiply,
}

/// How the individual function values combine with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreMode {
    /// Product of the applicable function values.
    Multiply,

    /// Sum of the applicable function values.
    Sum,
}

/// A query whose hits are rescored by a list of functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionScoreQuery {
    /// The wrapped query.
    pub query: QueryClause,

    /// Scoring functions, applied per hit.
    pub functions: Vec<ScoreFunction>,

    /// Combination with the base score.
    pub boost_mode: BoostMode,

    /// Combination across functions.
    pub score_mode: ScoreMode,
}

/// Hit ordering requested from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sort {
    /// Composite score, descending.
    #[default]
    ScoreDesc,
}

/// A complete search submitted to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSpec {
    /// Target index.
    pub index: String,

    /// Optional type/category restriction within the index.
    pub category: Option<String>,

    /// Root query clause.
    pub query: QueryClause,

    /// Number of raw hits requested.
    pub size: usize,

    /// Hit ordering.
    pub sort: Sort,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_clause_builder() {
        let clause = BoolClause::with_minimum_should_match(1)
            .should(QueryClause::Term {
                field: "reading_0".to_string(),
                value: "ケンサク".to_string(),
            })
            .should(QueryClause::Prefix {
                field: "reading_0".to_string(),
                value: "ケン".to_string(),
            });
        assert_eq!(clause.should.len(), 2);
        assert_eq!(clause.minimum_should_match, 1);
        assert!(clause.must.is_empty());
    }

    #[test]
    fn test_search_spec_serde_round_trip() {
        let spec = SearchSpec {
            index: "suggest".to_string(),
            category: None,
            query: QueryClause::FunctionScore(Box::new(FunctionScoreQuery {
                query: QueryClause::MatchAll,
                functions: vec![ScoreFunction::FieldFactor {
                    field: "docFreq".to_string(),
                    missing: 0.1,
                    modifier: Modifier::Log2p,
                    weight: 1.0,
                }],
                boost_mode: BoostMode::Replace,
                score_mode: ScoreMode::Multiply,
            })),
            size: 20,
            sort: Sort::ScoreDesc,
        };
        let json = serde_json::to_string(&spec).unwrap();
        let back: SearchSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }
}
