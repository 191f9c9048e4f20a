//! saguru-reading - Phonetic Reading Conversion
//!
//! Turns arbitrary surface text into searchable phonetic keys: surface
//! normalization, morphological tokenization and reading conversion with
//! script transliteration fallback.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Reading conversion: surface text to phonetic key candidates.
pub mod convert;
/// Surface-form normalization.
pub mod normalize;
/// Script classification and kana transliteration.
pub mod script;
/// Morphological tokenization.
pub mod tokenize;

pub use convert::{PhoneticReadingConverter, ReadingConverter};
pub use normalize::{FoldingNormalizer, Normalizer};
pub use tokenize::{LexiconTokenizer, Morpheme, MorphologicalTokenizer};
