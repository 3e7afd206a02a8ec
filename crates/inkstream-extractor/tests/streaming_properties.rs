//! Property tests for extraction totality and chunk-boundary invariance

use inkstream_extractor::{extract, ExtractMode, StreamingSession};
use proptest::prelude::*;

/// Text biased towards the characters the grammars care about
fn grammar_soup() -> impl Strategy<Value = String> {
    let pieces = prop::sample::select(vec![
        "```json\n", "```\n", "{", "}", "[", "]", "\"", "\\", "\\u12", ",", ":", "\n",
        "title", "content", "keywords", "headings", "metaDescription", "# ", "## ",
        "- ", "null", " ", "제목", "é", "text",
    ]);
    prop::collection::vec(pieces, 0..40).prop_map(|parts| parts.concat())
}

fn split_at_char(text: &str, pick: usize) -> usize {
    let boundaries: Vec<usize> = (0..=text.len()).filter(|i| text.is_char_boundary(*i)).collect();
    boundaries[pick % boundaries.len()]
}

proptest! {
    /// Property: extraction returns for any input in either mode
    #[test]
    fn test_extract_is_total(text in any::<String>()) {
        let _ = extract(&text, ExtractMode::Partial);
        let _ = extract(&text, ExtractMode::Final);
    }

    /// Property: extraction returns for inputs dense in grammar tokens
    #[test]
    fn test_extract_is_total_on_grammar_soup(text in grammar_soup()) {
        let _ = extract(&text, ExtractMode::Partial);
        let _ = extract(&text, ExtractMode::Final);
    }

    /// Property: extraction is deterministic for a given text
    #[test]
    fn test_extract_is_deterministic(text in grammar_soup()) {
        prop_assert_eq!(
            extract(&text, ExtractMode::Partial),
            extract(&text, ExtractMode::Partial)
        );
    }

    /// Property: two chunks give the same result as one
    #[test]
    fn test_two_chunks_equal_one(text in grammar_soup(), pick in any::<usize>()) {
        let split = split_at_char(&text, pick);

        let mut session = StreamingSession::new();
        session.on_chunk(&text[..split]).unwrap();
        let chunked = session.on_chunk(&text[split..]).unwrap();

        prop_assert_eq!(chunked, extract(&text, ExtractMode::Partial));
        prop_assert_eq!(session.finalize().unwrap(), extract(&text, ExtractMode::Final));
    }

    /// Property: byte-level splits, even inside a character, do not matter
    #[test]
    fn test_byte_splits_equal_whole(text in grammar_soup(), pick in any::<usize>()) {
        let bytes = text.as_bytes();
        let split = pick % (bytes.len() + 1);

        let mut session = StreamingSession::new();
        session.on_bytes(&bytes[..split]).unwrap();
        let doc = session.on_bytes(&bytes[split..]).unwrap();

        prop_assert_eq!(session.buffer(), text.as_str());
        prop_assert_eq!(doc, extract(&text, ExtractMode::Partial));
    }
}
