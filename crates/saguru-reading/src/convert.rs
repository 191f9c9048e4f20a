// Reading conversion

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use crate::script::hiragana_to_katakana;
use crate::tokenize::{self, LexiconTokenizer, MorphologicalTokenizer};

/// Maps a normalized token to candidate phonetic readings.
///
/// Internal failures never surface to the caller: a token with no
/// derivable reading yields an empty candidate list, and the query builder
/// treats an empty list as "no clause". This fail-open choice favors
/// availability of suggestions over completeness.
pub trait ReadingConverter: Send + Sync {
    /// Convert a token to an ordered list of candidate readings, given the
    /// request's language hints. An empty list means no reading could be
    /// derived.
    fn convert(&self, token: &str, lang_hints: &[String]) -> Vec<String>;
}

/// Default reading converter.
///
/// Tokenizes the input with a morphological tokenizer, takes the reported
/// phonetic reading per sub-token when present, and falls back to Hiragana
/// to Katakana transliteration for sub-tokens and untokenized gaps lacking
/// one. Produces exactly one concatenated candidate; the trait allows
/// richer converters to emit several.
pub struct PhoneticReadingConverter {
    dictionary: Option<PathBuf>,
    tokenizer: OnceLock<Arc<dyn MorphologicalTokenizer>>,
}

impl PhoneticReadingConverter {
    /// Converter backed by the default tokenizer with an empty lexicon.
    pub fn new() -> Self {
        Self {
            dictionary: None,
            tokenizer: OnceLock::new(),
        }
    }

    /// Converter whose default tokenizer loads a user dictionary on first
    /// use. A dictionary that fails to load is logged and replaced with an
    /// empty lexicon rather than failing requests.
    pub fn with_dictionary(path: impl Into<PathBuf>) -> Self {
        Self {
            dictionary: Some(path.into()),
            tokenizer: OnceLock::new(),
        }
    }

    /// Converter backed by a caller-supplied tokenizer.
    pub fn with_tokenizer(tokenizer: Arc<dyn MorphologicalTokenizer>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(tokenizer);
        Self {
            dictionary: None,
            tokenizer: cell,
        }
    }

    /// The tokenizer, initialized at most once even under concurrent first
    /// use from multiple requests.
    fn tokenizer(&self) -> &Arc<dyn MorphologicalTokenizer> {
        self.tokenizer.get_or_init(|| match &self.dictionary {
            Some(path) => match LexiconTokenizer::from_path(path) {
                Ok(tokenizer) => Arc::new(tokenizer),
                Err(error) => {
                    warn!(path = %path.display(), %error, "failed to load user dictionary");
                    Arc::new(LexiconTokenizer::new())
                }
            },
            None => Arc::new(LexiconTokenizer::new()),
        })
    }

    /// Align the tokenizer output against the source text with a scan
    /// cursor and assemble the phonetic form.
    ///
    /// The tokenizer and the source text may disagree on boundaries: a
    /// sub-token not found at or after the cursor is treated as already
    /// consumed and skipped, and text between the cursor and the next match
    /// is transliterated literally.
    fn to_phonetic(&self, text: &str) -> tokenize::Result<String> {
        let morphemes = self.tokenizer().tokenize(text)?;

        let mut buffer = String::new();
        let mut cursor = 0;
        for morpheme in morphemes {
            match text[cursor..].find(&morpheme.surface) {
                Some(gap) if gap > 0 => {
                    buffer.push_str(&hiragana_to_katakana(&text[cursor..cursor + gap]));
                    cursor += gap;
                }
                Some(_) => {}
                None => continue,
            }

            match morpheme.reading.as_deref().filter(|r| !r.trim().is_empty()) {
                Some(reading) => buffer.push_str(reading),
                None => buffer.push_str(&hiragana_to_katakana(&morpheme.surface)),
            }
            cursor += morpheme.surface.len();
        }
        Ok(buffer)
    }
}

impl Default for PhoneticReadingConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingConverter for PhoneticReadingConverter {
    fn convert(&self, token: &str, _lang_hints: &[String]) -> Vec<String> {
        match self.to_phonetic(token) {
            Ok(reading) => vec![reading],
            Err(error) => {
                debug!(%error, "reading conversion degraded to no candidates");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::tokenize::{Error, Morpheme};

    /// Tokenizer stub emitting a fixed morpheme sequence.
    struct FixedTokenizer(Vec<Morpheme>);

    impl MorphologicalTokenizer for FixedTokenizer {
        fn tokenize(&self, _text: &str) -> tokenize::Result<Vec<Morpheme>> {
            Ok(self.0.clone())
        }
    }

    /// Tokenizer stub that always fails.
    struct BrokenTokenizer;

    impl MorphologicalTokenizer for BrokenTokenizer {
        fn tokenize(&self, _text: &str) -> tokenize::Result<Vec<Morpheme>> {
            Err(Error::Failed("broken".to_string()))
        }
    }

    fn fixed(morphemes: Vec<Morpheme>) -> PhoneticReadingConverter {
        PhoneticReadingConverter::with_tokenizer(Arc::new(FixedTokenizer(morphemes)))
    }

    #[test]
    fn test_empty_input_yields_single_empty_reading() {
        let converter = PhoneticReadingConverter::new();
        assert_eq!(converter.convert("", &[]), vec![String::new()]);
    }

    #[test]
    fn test_latin_passes_through() {
        let converter = PhoneticReadingConverter::new();
        assert_eq!(converter.convert("rust", &[]), vec!["rust".to_string()]);
    }

    #[test]
    fn test_hiragana_transliterated_without_lexicon() {
        let converter = PhoneticReadingConverter::new();
        assert_eq!(converter.convert("けんさく", &[]), vec!["ケンサク".to_string()]);
    }

    #[test]
    fn test_lexicon_reading_used_for_kanji() {
        let tokenizer = LexiconTokenizer::with_entries([("検索", "ケンサク")]);
        let converter = PhoneticReadingConverter::with_tokenizer(Arc::new(tokenizer));
        assert_eq!(
            converter.convert("検索けんさく", &[]),
            vec!["ケンサクケンサク".to_string()]
        );
    }

    #[test]
    fn test_blank_reading_falls_back_to_surface() {
        let converter = fixed(vec![
            Morpheme::with_reading("すし", "  "),
        ]);
        assert_eq!(converter.convert("すし", &[]), vec!["スシ".to_string()]);
    }

    #[test]
    fn test_untokenized_gap_is_transliterated() {
        // The tokenizer only reports the tail; the leading span is a gap.
        let converter = fixed(vec![Morpheme::with_reading("検索", "ケンサク")]);
        assert_eq!(
            converter.convert("あい検索", &[]),
            vec!["アイケンサク".to_string()]
        );
    }

    #[test]
    fn test_unmatched_morpheme_is_skipped() {
        // Second morpheme never occurs in the source text; the cursor must
        // not move and later morphemes still align.
        let converter = fixed(vec![
            Morpheme::with_reading("東", "トウ"),
            Morpheme::with_reading("幻", "ゲン"),
            Morpheme::with_reading("京", "キョウ"),
        ]);
        assert_eq!(converter.convert("東京", &[]), vec!["トウキョウ".to_string()]);
    }

    #[test]
    fn test_tokenizer_failure_degrades_to_empty() {
        let converter = PhoneticReadingConverter::with_tokenizer(Arc::new(BrokenTokenizer));
        assert!(converter.convert("検索", &[]).is_empty());
    }

    #[test]
    fn test_missing_dictionary_degrades_to_empty_lexicon() {
        let converter = PhoneticReadingConverter::with_dictionary("/nonexistent/dict.tsv");
        assert_eq!(converter.convert("rust", &[]), vec!["rust".to_string()]);
    }

    proptest! {
        #[test]
        fn convert_never_panics(token in "\\PC*") {
            let converter = PhoneticReadingConverter::new();
            let readings = converter.convert(&token, &[]);
            prop_assert!(readings.len() <= 1);
        }
    }
}
