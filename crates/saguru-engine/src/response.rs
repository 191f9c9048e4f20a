//! Engine response envelopes.

use serde::{Deserialize, Serialize};

use saguru_core::SuggestItem;

/// Ranked, deduplicated suggest result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestResponse {
    /// Index the hits came from; empty when there were none.
    pub index: String,

    /// Store-reported execution time in milliseconds.
    pub took_ms: u64,

    /// Ordered suggestion texts, capped at the requested size.
    pub words: Vec<String>,

    /// Number of returned suggestions.
    pub num: usize,

    /// Store-reported total match count; may exceed `num`.
    pub total: u64,

    /// Detailed items in the same order as `words`; empty when detail was
    /// not requested.
    pub items: Vec<SuggestItem>,
}

impl SuggestResponse {
    /// Assemble a response; `num` is derived from the word list.
    pub fn new(
        index: String,
        took_ms: u64,
        words: Vec<String>,
        total: u64,
        items: Vec<SuggestItem>,
    ) -> Self {
        let num = words.len();
        Self {
            index,
            took_ms,
            words,
            num,
            total,
            items,
        }
    }
}

/// Ranked popular-words result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularWordsResponse {
    /// Index the hits came from; empty when there were none.
    pub index: String,

    /// Store-reported execution time in milliseconds.
    pub took_ms: u64,

    /// Ordered words, capped at the requested size.
    pub words: Vec<String>,

    /// Number of returned words.
    pub num: usize,

    /// Store-reported total match count.
    pub total: u64,
}

impl PopularWordsResponse {
    /// Assemble a response; `num` is derived from the word list.
    pub fn new(index: String, took_ms: u64, words: Vec<String>, total: u64) -> Self {
        let num = words.len();
        Self {
            index,
            took_ms,
            words,
            num,
            total,
        }
    }
}
