// Surface-form normalization

use unicode_normalization::UnicodeNormalization;

/// Maps a token to its normalized surface form before reading conversion.
///
/// Implementations must be safe for concurrent reads; the engine shares a
/// single instance across requests.
pub trait Normalizer: Send + Sync {
    /// Normalize a token, given the request's language hints.
    fn normalize(&self, token: &str, lang_hints: &[String]) -> String;
}

/// Default normalizer: NFKC compatibility folding plus lowercasing.
///
/// NFKC collapses width variants (fullwidth Latin, halfwidth Katakana) into
/// their canonical forms, which is what the stored reading fields expect.
#[derive(Debug, Clone, Copy, Default)]
pub struct FoldingNormalizer;

impl FoldingNormalizer {
    /// Create a new folding normalizer.
    pub fn new() -> Self {
        Self
    }
}

impl Normalizer for FoldingNormalizer {
    fn normalize(&self, token: &str, _lang_hints: &[String]) -> String {
        token.nfkc().collect::<String>().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_ascii() {
        let normalizer = FoldingNormalizer::new();
        assert_eq!(normalizer.normalize("Rust", &[]), "rust");
    }

    #[test]
    fn test_folds_fullwidth_latin() {
        let normalizer = FoldingNormalizer::new();
        assert_eq!(normalizer.normalize("ＲＵＳＴ", &[]), "rust");
    }

    #[test]
    fn test_folds_halfwidth_katakana() {
        let normalizer = FoldingNormalizer::new();
        assert_eq!(normalizer.normalize("ｶﾞｷﾞ", &[]), "ガギ");
    }

    #[test]
    fn test_kana_left_alone() {
        let normalizer = FoldingNormalizer::new();
        assert_eq!(normalizer.normalize("けんさく", &[]), "けんさく");
    }
}
