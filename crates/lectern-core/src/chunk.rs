//! Word-window text chunker.
//!
//! Splits document text into consecutive, non-overlapping windows of at most
//! `max_words` whitespace-delimited words. No normalization is applied: the
//! words of all chunks, in order, are exactly the words of the input.
//!
//! Each [`Chunk`] carries its document ID and its index within the document.

use crate::models::Chunk;

/// Default maximum words per chunk.
pub const DEFAULT_MAX_WORDS: usize = 500;

/// Split `text` into windows of at most `max_words` words, joined by single spaces.
///
/// Empty or whitespace-only input yields no chunks. A `max_words` of 0 is
/// treated as 1.
pub fn chunk_words(text: &str, max_words: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(max_words.max(1))
        .map(|window| window.join(" "))
        .collect()
}

/// Chunk a document's text, tagging each chunk with `document_id`.
/// Returns chunks with contiguous indices starting at 0.
pub fn chunk_document(document_id: &str, text: &str, max_words: usize) -> Vec<Chunk> {
    chunk_words(text, max_words)
        .into_iter()
        .enumerate()
        .map(|(index, text)| make_chunk(document_id, index, text))
        .collect()
}

fn make_chunk(document_id: &str, index: usize, text: String) -> Chunk {
    Chunk {
        document_id: document_id.to_string(),
        chunk_index: index,
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words_of(text: &str) -> Vec<&str> {
        text.split_whitespace().collect()
    }

    #[test]
    fn test_empty_text() {
        assert!(chunk_words("", 500).is_empty());
        assert!(chunk_words("  \n\t ", 500).is_empty());
        assert!(chunk_document("doc1", "", 500).is_empty());
    }

    #[test]
    fn test_small_text_single_chunk() {
        let chunks = chunk_document("doc1", "For God so loved the world", 500);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[0].document_id, "doc1");
        assert_eq!(chunks[0].text, "For God so loved the world");
    }

    #[test]
    fn test_exact_multiple_of_window() {
        let chunks = chunk_words("a b c d e f", 3);
        assert_eq!(chunks, vec!["a b c", "d e f"]);
    }

    #[test]
    fn test_remainder_goes_to_last_chunk() {
        let chunks = chunk_words("a b c d e f g", 3);
        assert_eq!(chunks, vec!["a b c", "d e f", "g"]);
    }

    #[test]
    fn test_zero_limit_treated_as_one() {
        let chunks = chunk_words("x y", 0);
        assert_eq!(chunks, vec!["x", "y"]);
    }

    #[test]
    fn test_no_normalization() {
        let chunks = chunk_words("The LORD is  my\nshepherd;  I shall not want.", 4);
        assert_eq!(chunks, vec!["The LORD is my", "shepherd; I shall not", "want."]);
    }

    #[test]
    fn test_lossless_and_bounded_across_limits() {
        let text = (0..1234)
            .map(|i| format!("w{}", i))
            .collect::<Vec<_>>()
            .join(" \n");
        for limit in [1, 2, 7, 100, 500, 1233, 1234, 5000] {
            let chunks = chunk_words(&text, limit);
            let rejoined: Vec<&str> = chunks.iter().flat_map(|c| words_of(c)).collect();
            assert_eq!(rejoined, words_of(&text), "lossless at limit {}", limit);
            for c in &chunks {
                assert!(words_of(c).len() <= limit, "chunk over limit {}", limit);
            }
        }
    }

    #[test]
    fn test_chunk_indices_contiguous() {
        let text = vec!["word"; 95].join(" ");
        let chunks = chunk_document("doc1", &text, 10);
        assert_eq!(chunks.len(), 10);
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.chunk_index, i, "Index mismatch at position {}", i);
            assert_eq!(c.document_id, "doc1");
        }
        assert_eq!(words_of(&chunks[9].text).len(), 5);
    }
}
