//! Unicode script classification and kana transliteration.
//!
//! Hand-rolled codepoint tables; the conversion between Hiragana and
//! Katakana is a fixed offset within the kana blocks.

use once_cell::sync::Lazy;
use regex::Regex;

/// Offset between a Hiragana letter and its Katakana counterpart.
const KANA_OFFSET: u32 = 0x60;

/// Hiragana letters with a direct Katakana counterpart (ぁ..ゖ).
const HIRAGANA_LETTER_FIRST: u32 = 0x3041;
const HIRAGANA_LETTER_LAST: u32 = 0x3096;

/// Hiragana iteration marks (ゝゞ), mapped to the Katakana marks (ヽヾ).
const HIRAGANA_ITERATION_FIRST: u32 = 0x309D;
const HIRAGANA_ITERATION_LAST: u32 = 0x309E;

static HIRAGANA_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\u{3040}-\u{309F}]+$").expect("hiragana pattern"));

/// Character classes used for fallback segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptClass {
    /// ASCII letters and digits.
    Latin,
    /// Hiragana block.
    Hiragana,
    /// Katakana block, including halfwidth forms.
    Katakana,
    /// CJK unified ideographs.
    Han,
    /// Everything else.
    Other,
}

/// Classify a character for segmentation purposes.
pub fn script_class(c: char) -> ScriptClass {
    let code = c as u32;
    match code {
        0x3040..=0x309F => ScriptClass::Hiragana,
        0x30A0..=0x30FF | 0x31F0..=0x31FF | 0xFF66..=0xFF9D => ScriptClass::Katakana,
        0x3400..=0x4DBF | 0x4E00..=0x9FFF | 0xF900..=0xFAFF => ScriptClass::Han,
        _ if c.is_ascii_alphanumeric() => ScriptClass::Latin,
        _ => ScriptClass::Other,
    }
}

/// Whether a character lies in the Hiragana block.
pub fn is_hiragana(c: char) -> bool {
    matches!(c as u32, 0x3040..=0x309F)
}

/// Whether a non-empty string consists solely of Hiragana characters.
pub fn is_hiragana_only(text: &str) -> bool {
    HIRAGANA_ONLY.is_match(text)
}

/// Transliterate Hiragana characters to Katakana, leaving everything else
/// untouched.
pub fn hiragana_to_katakana(text: &str) -> String {
    text.chars().map(to_katakana_char).collect()
}

fn to_katakana_char(c: char) -> char {
    let code = c as u32;
    let shifted = match code {
        HIRAGANA_LETTER_FIRST..=HIRAGANA_LETTER_LAST => code + KANA_OFFSET,
        HIRAGANA_ITERATION_FIRST..=HIRAGANA_ITERATION_LAST => code + KANA_OFFSET,
        _ => return c,
    };
    char::from_u32(shifted).unwrap_or(c)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_hiragana_to_katakana_letters() {
        assert_eq!(hiragana_to_katakana("ひらがな"), "ヒラガナ");
        assert_eq!(hiragana_to_katakana("けんさく"), "ケンサク");
    }

    #[test]
    fn test_transliteration_keeps_other_scripts() {
        assert_eq!(hiragana_to_katakana("rust 検索 カナ"), "rust 検索 カナ");
    }

    #[test]
    fn test_transliteration_iteration_marks() {
        assert_eq!(hiragana_to_katakana("ゝゞ"), "ヽヾ");
    }

    #[rstest]
    #[case("すずき", true)]
    #[case("スズキ", false)]
    #[case("すずき1", false)]
    #[case("suzuki", false)]
    #[case("", false)]
    fn test_is_hiragana_only(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(is_hiragana_only(text), expected);
    }

    #[test]
    fn test_script_classes() {
        assert_eq!(script_class('a'), ScriptClass::Latin);
        assert_eq!(script_class('7'), ScriptClass::Latin);
        assert_eq!(script_class('あ'), ScriptClass::Hiragana);
        assert_eq!(script_class('ア'), ScriptClass::Katakana);
        assert_eq!(script_class('検'), ScriptClass::Han);
        assert_eq!(script_class('!'), ScriptClass::Other);
    }
}
