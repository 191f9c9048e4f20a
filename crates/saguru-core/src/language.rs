// Language support tables and analyzer name resolution
//
// Process-wide read-only configuration: initialized once, never mutated.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Languages with dedicated per-language analyzers at the store.
pub static SUPPORTED_LANGUAGES: [&str; 47] = [
    "ar", "bg", "bn", "ca", "cs", "da", "de", "el", "en", "es", "et", "fa", "fi", "fr", "gu", "he",
    "hi", "hr", "hu", "id", "it", "ja", "ko", "lt", "lv", "mk", "ml", "nl", "no", "pa", "pl", "pt",
    "ro", "ru", "si", "sq", "sv", "ta", "te", "th", "tl", "tr", "uk", "ur", "vi", "zh-cn", "zh-tw",
];

static LANGUAGE_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| SUPPORTED_LANGUAGES.iter().copied().collect());

/// Base name of the reading analyzer.
pub const READING_ANALYZER: &str = "reading_analyzer";

/// Base name of the reading term analyzer.
pub const READING_TERM_ANALYZER: &str = "reading_term_analyzer";

/// Base name of the normalize analyzer.
pub const NORMALIZE_ANALYZER: &str = "normalize_analyzer";

/// Base name of the contents analyzer.
pub const CONTENTS_ANALYZER: &str = "contents_analyzer";

/// Whether a language hint names a supported language.
pub fn is_supported_language(lang: &str) -> bool {
    !lang.trim().is_empty() && LANGUAGE_SET.contains(lang)
}

fn resolve(base: &str, lang: &str) -> String {
    if is_supported_language(lang) {
        format!("{base}_{lang}")
    } else {
        base.to_string()
    }
}

/// Reading analyzer name for a language hint.
pub fn reading_analyzer_name(lang: &str) -> String {
    resolve(READING_ANALYZER, lang)
}

/// Reading term analyzer name for a language hint.
pub fn reading_term_analyzer_name(lang: &str) -> String {
    resolve(READING_TERM_ANALYZER, lang)
}

/// Normalize analyzer name for a language hint.
pub fn normalize_analyzer_name(lang: &str) -> String {
    resolve(NORMALIZE_ANALYZER, lang)
}

/// Contents analyzer name for a language hint.
pub fn contents_analyzer_name(lang: &str) -> String {
    resolve(CONTENTS_ANALYZER, lang)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("ja", true)]
    #[case("en", true)]
    #[case("zh-cn", true)]
    #[case("tlh", false)]
    #[case("", false)]
    #[case("  ", false)]
    fn test_supported_language(#[case] lang: &str, #[case] expected: bool) {
        assert_eq!(is_supported_language(lang), expected);
    }

    #[test]
    fn test_supported_language_gets_suffixed_names() {
        assert_eq!(reading_analyzer_name("ja"), "reading_analyzer_ja");
        assert_eq!(reading_term_analyzer_name("ja"), "reading_term_analyzer_ja");
        assert_eq!(normalize_analyzer_name("en"), "normalize_analyzer_en");
        assert_eq!(contents_analyzer_name("en"), "contents_analyzer_en");
    }

    #[test]
    fn test_unsupported_language_falls_back_to_bare_names() {
        assert_eq!(reading_analyzer_name("xx"), "reading_analyzer");
        assert_eq!(contents_analyzer_name(""), "contents_analyzer");
    }
}
