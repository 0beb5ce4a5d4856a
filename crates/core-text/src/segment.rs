//! Normalization adapter for inserted text.
//!
//! Typed characters and IME commits are composed to NFC before they enter a
//! field value so that caret arithmetic sees one cluster per visible glyph.
//! Does not log content; block titles are user data.

use unicode_normalization::UnicodeNormalization;

/// Normalize to NFC.
pub fn normalize(input: &str) -> String {
    input.nfc().collect()
}
