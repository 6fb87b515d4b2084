//! Word-preserving text chunking
//!
//! Sizes are counted in Unicode code points. A chunk never ends inside a
//! token: once the size limit is reached the boundary moves forward to the
//! next whitespace or punctuation code point (or to the end of the text).

use regex::Regex;
use std::sync::LazyLock;

/// Any Unicode whitespace or punctuation (general category P)
static BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\p{P}]").expect("boundary pattern is valid"));

/// Split `text` into trimmed, non-empty chunks of roughly `chunk_size` code points
///
/// A `chunk_size` of zero is treated as one.
pub fn chunk(text: &str, chunk_size: usize) -> Vec<String> {
    let size = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = match text[start..].char_indices().nth(size) {
            Some((offset, _)) => start + offset,
            None => text.len(),
        };

        if end < text.len() {
            end = next_boundary(text, end);
        }

        let piece = text[start..end].trim();
        if !piece.is_empty() {
            chunks.push(piece.to_string());
        }

        start = end;
    }

    chunks
}

/// Byte offset of the first boundary code point at or after `from`
fn next_boundary(text: &str, from: usize) -> usize {
    let rest = &text[from..];
    let found = BOUNDARY.find(rest).map(|m| m.start());
    from + found.unwrap_or(rest.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOREM: &str = include_str!("../tests/fixtures/lorem.txt");

    #[test]
    fn test_extends_to_end_of_word() {
        let chunks = chunk("Lorem ipsum dolor sit amet.", 10);
        assert_eq!(chunks[0], "Lorem ipsum");
        assert_eq!(chunks, vec!["Lorem ipsum", "dolor sit", "amet."]);
    }

    #[test]
    fn test_three_way_split() {
        let size = (LOREM.chars().count() as f64 / 3.0).round() as usize;
        assert_eq!(chunk(LOREM, size).len(), 3);
    }

    #[test]
    fn test_first_sentence_fits_exactly() {
        let chunks = chunk(LOREM, 56);
        assert_eq!(
            chunks[0],
            "Lorem ipsum dolor sit amet, consectetur adipiscing elit."
        );
    }

    #[test]
    fn test_short_text_is_single_trimmed_chunk() {
        assert_eq!(chunk("  hello world \n", 100), vec!["hello world"]);
    }

    #[test]
    fn test_no_separators_is_single_chunk() {
        let text = "abcdefghijklmnopqrstuvwxyz";
        assert_eq!(chunk(text, 3), vec![text]);
    }

    #[test]
    fn test_stops_at_punctuation() {
        let chunks = chunk("alpha,beta", 3);
        assert_eq!(chunks, vec!["alpha", ",beta"]);
    }

    #[test]
    fn test_whitespace_only_chunks_are_skipped() {
        let chunks = chunk("one          two", 4);
        assert_eq!(chunks, vec!["one", "two"]);
    }

    #[test]
    fn test_counts_code_points_not_bytes() {
        // Each of these is multi-byte in UTF-8
        let chunks = chunk("héllo wörld ünïcode", 5);
        assert_eq!(chunks, vec!["héllo", "wörld", "ünïcode"]);
    }

    #[test]
    fn test_unicode_punctuation_is_a_boundary() {
        let chunks = chunk("abc«def»ghi", 2);
        assert_eq!(chunks[0], "abc");
    }

    #[test]
    fn test_zero_size_behaves_like_one() {
        assert_eq!(chunk("a b", 0), chunk("a b", 1));
        assert_eq!(chunk("a b", 0), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(chunk("", 10).is_empty());
        assert!(chunk("   \n\t", 2).is_empty());
    }
}
