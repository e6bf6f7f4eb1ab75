//! Codepoint iteration over text bytes
//!
//! Glyphs are cached under a raw `u32` key. By default every byte of the
//! input is its own key (0-255), so multi-byte UTF-8 sequences resolve to one
//! glyph per byte. [`CodepointMode::Utf8`] decodes Unicode scalar values
//! instead and substitutes U+FFFD for malformed sequences.

use serde::{Deserialize, Serialize};

/// Unicode replacement character, emitted for malformed UTF-8
pub const REPLACEMENT_CHARACTER: u32 = 0xFFFD;

/// How text bytes are mapped to glyph cache keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodepointMode {
    /// One key per byte
    #[default]
    Bytes,
    /// One key per decoded Unicode scalar value
    Utf8,
}

/// Iterate the glyph keys of `text` in input order
pub fn codepoints(text: &[u8], mode: CodepointMode) -> Box<dyn Iterator<Item = u32> + '_> {
    match mode {
        CodepointMode::Bytes => Box::new(text.iter().map(|&b| u32::from(b))),
        CodepointMode::Utf8 => Box::new(text.utf8_chunks().flat_map(|chunk| {
            let replacement = (!chunk.invalid().is_empty()).then_some(REPLACEMENT_CHARACTER);
            chunk.valid().chars().map(u32::from).chain(replacement)
        })),
    }
}

/// Whether `text` is well-formed UTF-8
pub fn is_valid_utf8(text: &[u8]) -> bool {
    std::str::from_utf8(text).is_ok()
}

/// Number of characters in `text`, counting each malformed sequence as one
pub fn utf8_char_count(text: &[u8]) -> usize {
    codepoints(text, CodepointMode::Utf8).count()
}
