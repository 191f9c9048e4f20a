// Composite score evaluation
//
// Reference implementation of the function-score contract, so the ranking
// the engine asks for is reproducible against any term-query-capable
// backend. Stores with a native function-score primitive may use their own;
// the in-memory test store uses this one.

use serde_json::{Map, Value};

use crate::query::{BoostMode, FunctionScoreQuery, Modifier, ScoreFunction, ScoreMode};

/// Evaluate a function-score query against a document source, combining
/// with the given base relevance score per the query's boost mode.
///
/// A `WeightedPrefix` function whose prefix does not match is omitted from
/// the combination entirely; with multiplicative combination its factor is
/// effectively 1, not 0.
pub fn evaluate(query: &FunctionScoreQuery, base_score: f64, source: &Map<String, Value>) -> f64 {
    let mut combined: Option<f64> = None;
    for function in &query.functions {
        let Some(value) = apply(function, source) else {
            continue;
        };
        combined = Some(match (combined, query.score_mode) {
            (None, _) => value,
            (Some(acc), ScoreMode::Multiply) => acc * value,
            (Some(acc), ScoreMode::Sum) => acc + value,
        });
    }
    let functions_score = combined.unwrap_or(1.0);

    match query.boost_mode {
        BoostMode::Replace => functions_score,
        BoostMode::Multiply => base_score * functions_score,
    }
}

/// Value contributed by one function, or `None` when it does not apply.
fn apply(function: &ScoreFunction, source: &Map<String, Value>) -> Option<f64> {
    match function {
        ScoreFunction::WeightedPrefix {
            field,
            value,
            weight,
        } => {
            let text = source.get(field).and_then(Value::as_str).unwrap_or("");
            if text.starts_with(value.as_str()) {
                Some(f64::from(*weight))
            } else {
                None
            }
        }
        ScoreFunction::FieldFactor {
            field,
            missing,
            modifier,
            weight,
        } => {
            let value = source.get(field).and_then(Value::as_f64).unwrap_or(*missing);
            let modified = match modifier {
                Modifier::None => value,
                Modifier::Log2p => (1.0 + value).log2(),
            };
            Some(f64::from(*weight) * modified)
        }
    }
}
