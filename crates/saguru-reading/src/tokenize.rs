// Morphological tokenization

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::script::script_class;

/// Result type for tokenization operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by tokenizers and dictionary loading.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A dictionary file could not be read.
    #[error("failed to read dictionary: {0}")]
    Dictionary(#[from] std::io::Error),

    /// A dictionary line is not `surface<TAB>reading`.
    #[error("malformed dictionary entry at line {line}: {content}")]
    MalformedEntry {
        /// 1-based line number.
        line: usize,
        /// Offending line content.
        content: String,
    },

    /// A tokenizer implementation failed on the given input.
    #[error("tokenizer failure: {0}")]
    Failed(String),
}

/// A sub-token emitted by a morphological tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Morpheme {
    /// Surface form as it appears in the input.
    pub surface: String,

    /// Phonetic reading, when the tokenizer knows one.
    pub reading: Option<String>,
}

impl Morpheme {
    /// A morpheme with a known reading.
    pub fn with_reading(surface: impl Into<String>, reading: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            reading: Some(reading.into()),
        }
    }

    /// A morpheme without a reading.
    pub fn surface_only(surface: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            reading: None,
        }
    }
}

/// Splits text into an ordered sequence of morphemes, each optionally
/// carrying a phonetic reading.
///
/// Implementations hold no per-request state and must be safe for
/// concurrent use.
pub trait MorphologicalTokenizer: Send + Sync {
    /// Tokenize the given text.
    fn tokenize(&self, text: &str) -> Result<Vec<Morpheme>>;
}

/// Dictionary-driven tokenizer.
///
/// Performs longest-match segmentation against a surface-to-reading
/// lexicon; spans not covered by the lexicon degrade to runs of
/// same-script characters without a reading. An empty lexicon therefore
/// still produces a usable segmentation.
#[derive(Debug, Clone, Default)]
pub struct LexiconTokenizer {
    entries: HashMap<String, String>,
    max_surface_chars: usize,
}

impl LexiconTokenizer {
    /// Create a tokenizer with an empty lexicon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tokenizer seeded from `(surface, reading)` pairs.
    pub fn with_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut tokenizer = Self::new();
        for (surface, reading) in entries {
            tokenizer.insert(surface, reading);
        }
        tokenizer
    }

    /// Load a lexicon from a tab-separated `surface<TAB>reading` file.
    /// Blank lines and lines starting with `#` are skipped.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Load a lexicon from any buffered reader, same format as
    /// [`LexiconTokenizer::from_path`].
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut tokenizer = Self::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let (surface, reading) =
                trimmed.split_once('\t').ok_or_else(|| Error::MalformedEntry {
                    line: index + 1,
                    content: trimmed.to_string(),
                })?;
            tokenizer.insert(surface.trim(), reading.trim());
        }
        Ok(tokenizer)
    }

    /// Add a single lexicon entry.
    pub fn insert(&mut self, surface: impl Into<String>, reading: impl Into<String>) {
        let surface = surface.into();
        self.max_surface_chars = self.max_surface_chars.max(surface.chars().count());
        self.entries.insert(surface, reading.into());
    }

    /// Number of lexicon entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the lexicon is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Longest lexicon match starting at char position `start`, as
    /// `(matched_chars, reading)`.
    fn longest_match(&self, text: &str, offsets: &[usize], start: usize) -> Option<(usize, &str)> {
        let limit = self.max_surface_chars.min(offsets.len() - 1 - start);
        for length in (1..=limit).rev() {
            let candidate = &text[offsets[start]..offsets[start + length]];
            if let Some(reading) = self.entries.get(candidate) {
                return Some((length, reading));
            }
        }
        None
    }
}

impl MorphologicalTokenizer for LexiconTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Morpheme>> {
        // Byte offset of every char boundary, plus the end of the text.
        let mut offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        offsets.push(text.len());

        let chars: Vec<char> = text.chars().collect();
        let mut morphemes = Vec::new();
        let mut position = 0;
        while position < chars.len() {
            if let Some((length, reading)) = self.longest_match(text, &offsets, position) {
                morphemes.push(Morpheme::with_reading(
                    &text[offsets[position]..offsets[position + length]],
                    reading,
                ));
                position += length;
                continue;
            }

            // No lexicon coverage: consume a same-script run until the next
            // position where the lexicon takes over again.
            let class = script_class(chars[position]);
            let start = position;
            position += 1;
            while position < chars.len()
                && script_class(chars[position]) == class
                && self.longest_match(text, &offsets, position).is_none()
            {
                position += 1;
            }
            morphemes.push(Morpheme::surface_only(
                &text[offsets[start]..offsets[position]],
            ));
        }
        Ok(morphemes)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn surfaces(morphemes: &[Morpheme]) -> Vec<&str> {
        morphemes.iter().map(|m| m.surface.as_str()).collect()
    }

    #[test]
    fn test_empty_lexicon_segments_by_script() {
        let tokenizer = LexiconTokenizer::new();
        let morphemes = tokenizer.tokenize("rust検索エンジン").unwrap();
        assert_eq!(surfaces(&morphemes), vec!["rust", "検索", "エンジン"]);
        assert!(morphemes.iter().all(|m| m.reading.is_none()));
    }

    #[test]
    fn test_lexicon_match_carries_reading() {
        let tokenizer = LexiconTokenizer::with_entries([("検索", "ケンサク")]);
        let morphemes = tokenizer.tokenize("検索エンジン").unwrap();
        assert_eq!(
            morphemes[0],
            Morpheme::with_reading("検索", "ケンサク")
        );
        assert_eq!(morphemes[1], Morpheme::surface_only("エンジン"));
    }

    #[test]
    fn test_longest_match_wins() {
        let tokenizer =
            LexiconTokenizer::with_entries([("東京", "トウキョウ"), ("東京都", "トウキョウト")]);
        let morphemes = tokenizer.tokenize("東京都").unwrap();
        assert_eq!(morphemes, vec![Morpheme::with_reading("東京都", "トウキョウト")]);
    }

    #[test]
    fn test_fallback_run_stops_at_lexicon_entry() {
        let tokenizer = LexiconTokenizer::with_entries([("京", "キョウ")]);
        let morphemes = tokenizer.tokenize("東京").unwrap();
        assert_eq!(
            morphemes,
            vec![
                Morpheme::surface_only("東"),
                Morpheme::with_reading("京", "キョウ"),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        let tokenizer = LexiconTokenizer::new();
        assert!(tokenizer.tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_dictionary_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# user dictionary").unwrap();
        writeln!(file, "検索\tケンサク").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "東京\tトウキョウ").unwrap();

        let tokenizer = LexiconTokenizer::from_path(file.path()).unwrap();
        assert_eq!(tokenizer.len(), 2);
        let morphemes = tokenizer.tokenize("東京検索").unwrap();
        assert_eq!(
            morphemes,
            vec![
                Morpheme::with_reading("東京", "トウキョウ"),
                Morpheme::with_reading("検索", "ケンサク"),
            ]
        );
    }

    #[test]
    fn test_malformed_dictionary_line() {
        let data = "検索 ケンサク\n";
        let result = LexiconTokenizer::from_reader(data.as_bytes());
        assert!(matches!(result, Err(Error::MalformedEntry { line: 1, .. })));
    }
}
