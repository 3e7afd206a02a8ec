//! Streaming session: accumulates chunks of one generation and re-extracts
//! the whole buffer after each.

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::extractor::Extractor;
use crate::types::{ExtractMode, ExtractedDocument, Extraction, Grammar};
use tracing::{debug, info, warn};

/// Lifecycle of a [`StreamingSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No chunk received yet
    Empty,
    /// At least one chunk received, stream still open
    Accumulating,
    /// `finalize` has been called; terminal
    Finalized,
}

/// Accumulator for one in-flight generation
///
/// Owned by a single request and fed strictly in order. Each chunk is
/// appended to the buffer and the full buffer is re-extracted in partial
/// mode, so results depend only on the text received, never on where the
/// chunk boundaries fell.
///
/// # Examples
///
/// ```
/// use inkstream_extractor::{ExtractorError, StreamingSession};
///
/// let mut session = StreamingSession::new();
/// let partial = session.on_chunk("```json\n{\"title\": \"Stre").unwrap();
/// assert_eq!(partial.title.as_deref(), Some("Stre"));
///
/// session.on_chunk("aming\", \"keywords\": [\"rust\"]}\n```").unwrap();
/// let done = session.finalize().unwrap();
/// assert_eq!(done.title.as_deref(), Some("Streaming"));
/// assert_eq!(done.keywords, Some(vec!["rust".to_string()]));
///
/// assert_eq!(session.on_chunk("late"), Err(ExtractorError::AlreadyFinalized));
/// ```
#[derive(Debug, Clone)]
pub struct StreamingSession {
    extractor: Extractor,
    buffer: String,
    /// Trailing bytes of an incomplete UTF-8 sequence from `on_bytes`
    pending: Vec<u8>,
    state: SessionState,
    chunk_count: usize,
    latest: Extraction,
}

impl StreamingSession {
    /// Create a session using the default configuration
    pub fn new() -> Self {
        Self::with_extractor(Extractor::default())
    }

    /// Create a session with the given configuration
    pub fn with_config(config: ExtractorConfig) -> Self {
        Self::with_extractor(Extractor::new(config))
    }

    /// Create a session around an existing extractor
    pub fn with_extractor(extractor: Extractor) -> Self {
        Self {
            extractor,
            buffer: String::new(),
            pending: Vec::new(),
            state: SessionState::Empty,
            chunk_count: 0,
            latest: Extraction::default(),
        }
    }

    /// Append a text chunk and return the new partial document
    pub fn on_chunk(&mut self, chunk: &str) -> Result<ExtractedDocument, ExtractorError> {
        self.ensure_open("on_chunk")?;

        let mut text = String::new();
        if !self.pending.is_empty() {
            text.push_str(&String::from_utf8_lossy(&self.pending));
        }
        text.push_str(chunk);
        self.check_capacity(text.len())?;

        self.pending.clear();
        Ok(self.append(&text))
    }

    /// Append raw bytes and return the new partial document
    ///
    /// A multi-byte character split across calls is held back until its
    /// remaining bytes arrive. Invalid sequences decode to U+FFFD.
    pub fn on_bytes(&mut self, bytes: &[u8]) -> Result<ExtractedDocument, ExtractorError> {
        self.ensure_open("on_bytes")?;

        let mut data = self.pending.clone();
        data.extend_from_slice(bytes);
        let (text, carry) = decode_utf8(&data);
        self.check_capacity(text.len())?;

        self.pending = carry.to_vec();
        Ok(self.append(&text))
    }

    /// Close the stream and return the final document
    ///
    /// Must be called exactly once; later calls to any feeding method or to
    /// `finalize` fail with [`ExtractorError::AlreadyFinalized`].
    pub fn finalize(&mut self) -> Result<ExtractedDocument, ExtractorError> {
        self.ensure_open("finalize")?;

        if !self.pending.is_empty() {
            let tail = String::from_utf8_lossy(&self.pending).into_owned();
            self.buffer.push_str(&tail);
            self.pending.clear();
        }

        self.state = SessionState::Finalized;
        self.latest = self.extractor.extract_detailed(&self.buffer, ExtractMode::Final);

        info!(
            "Session finalized after {} chunk(s), {} bytes, grammar {:?}, fields {:?}",
            self.chunk_count,
            self.buffer.len(),
            self.latest.grammar,
            self.latest.document.populated_fields()
        );

        Ok(self.latest.document.clone())
    }

    /// The most recent document (partial, or final once finalized)
    pub fn latest(&self) -> &ExtractedDocument {
        &self.latest.document
    }

    /// Grammar used for the most recent document
    pub fn grammar(&self) -> Option<Grammar> {
        self.latest.grammar
    }

    /// All text received so far
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether `finalize` has been called
    pub fn is_finalized(&self) -> bool {
        self.state == SessionState::Finalized
    }

    /// Number of chunks accepted
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    fn append(&mut self, text: &str) -> ExtractedDocument {
        self.buffer.push_str(text);
        self.chunk_count += 1;
        self.state = SessionState::Accumulating;
        self.latest = self.extractor.extract_detailed(&self.buffer, ExtractMode::Partial);

        debug!(
            "Chunk {} (+{} bytes, {} total) parsed via {:?}",
            self.chunk_count,
            text.len(),
            self.buffer.len(),
            self.latest.grammar
        );

        self.latest.document.clone()
    }

    fn ensure_open(&self, operation: &str) -> Result<(), ExtractorError> {
        if self.is_finalized() {
            warn!("Rejected {} on a finalized session", operation);
            return Err(ExtractorError::AlreadyFinalized);
        }
        Ok(())
    }

    fn check_capacity(&self, additional: usize) -> Result<(), ExtractorError> {
        let max = self.extractor.config().max_text_length;
        let len = self.buffer.len() + additional;
        if len > max {
            warn!("Rejected chunk: buffer would reach {} bytes (max {})", len, max);
            return Err(ExtractorError::TextTooLong(len, max));
        }
        Ok(())
    }
}

impl Default for StreamingSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode as much of `bytes` as possible. Returns the text and the trailing
/// bytes of a sequence that may still be completed by later input.
fn decode_utf8(bytes: &[u8]) -> (String, &[u8]) {
    let mut out = String::new();
    let mut rest = bytes;

    loop {
        match std::str::from_utf8(rest) {
            Ok(s) => {
                out.push_str(s);
                return (out, &[][..]);
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                if let Ok(s) = std::str::from_utf8(valid) {
                    out.push_str(s);
                }
                match e.error_len() {
                    None => return (out, after),
                    Some(len) => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        rest = &after[len..];
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_machine() {
        let mut session = StreamingSession::new();
        assert_eq!(session.state(), SessionState::Empty);

        session.on_chunk("# Title").unwrap();
        assert_eq!(session.state(), SessionState::Accumulating);

        session.finalize().unwrap();
        assert_eq!(session.state(), SessionState::Finalized);
        assert!(session.is_finalized());
    }

    #[test]
    fn test_finalize_empty_session() {
        let mut session = StreamingSession::new();
        let doc = session.finalize().unwrap();
        assert!(doc.is_empty());
        assert_eq!(session.grammar(), None);
    }

    #[test]
    fn test_usage_errors_after_finalize() {
        let mut session = StreamingSession::new();
        session.on_chunk("text").unwrap();
        session.finalize().unwrap();

        assert_eq!(session.on_chunk("more"), Err(ExtractorError::AlreadyFinalized));
        assert_eq!(session.on_bytes(b"more"), Err(ExtractorError::AlreadyFinalized));
        assert_eq!(session.finalize(), Err(ExtractorError::AlreadyFinalized));
        assert_eq!(session.buffer(), "text");
    }

    #[test]
    fn test_empty_chunk_is_accepted() {
        let mut session = StreamingSession::new();
        let doc = session.on_chunk("").unwrap();
        assert!(doc.is_empty());
        assert_eq!(session.chunk_count(), 1);
    }

    #[test]
    fn test_latest_tracks_last_parse() {
        let mut session = StreamingSession::new();
        let doc = session.on_chunk("title: A\n").unwrap();
        assert_eq!(session.latest(), &doc);
        assert_eq!(session.grammar(), Some(Grammar::Sections));
    }

    #[test]
    fn test_on_bytes_split_multibyte() {
        let text = "title: 제목";
        let bytes = text.as_bytes();
        // split inside the three-byte encoding of '제'
        let split = "title: ".len() + 1;

        let mut session = StreamingSession::new();
        let doc = session.on_bytes(&bytes[..split]).unwrap();
        assert!(doc.title.is_none());
        assert_eq!(session.buffer(), "title: ");

        let doc = session.on_bytes(&bytes[split..]).unwrap();
        assert_eq!(doc.title.as_deref(), Some("제목"));
        assert_eq!(session.buffer(), text);
    }

    #[test]
    fn test_on_bytes_invalid_sequence() {
        let mut session = StreamingSession::new();
        session.on_bytes(b"a\xffb").unwrap();
        assert_eq!(session.buffer(), "a\u{FFFD}b");
    }

    #[test]
    fn test_finalize_flushes_pending_bytes() {
        let mut session = StreamingSession::new();
        session.on_bytes(&"é".as_bytes()[..1]).unwrap();
        assert_eq!(session.buffer(), "");
        session.finalize().unwrap();
        assert_eq!(session.buffer(), "\u{FFFD}");
    }

    #[test]
    fn test_text_too_long() {
        let config = ExtractorConfig {
            max_text_length: 8,
            ..ExtractorConfig::default()
        };
        let mut session = StreamingSession::with_config(config);
        session.on_chunk("12345").unwrap();

        let result = session.on_chunk("6789");
        assert_eq!(result, Err(ExtractorError::TextTooLong(9, 8)));
        assert_eq!(session.buffer(), "12345");
        assert_eq!(session.chunk_count(), 1);

        // still usable after a rejected chunk
        session.on_chunk("678").unwrap();
        assert_eq!(session.buffer(), "12345678");
    }

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_utf8(b"abc"), ("abc".to_string(), &b""[..]));
        assert_eq!(decode_utf8(b"ab\xea\xb0"), ("ab".to_string(), &b"\xea\xb0"[..]));
        assert_eq!(decode_utf8(b"\xff\xfe"), ("\u{FFFD}\u{FFFD}".to_string(), &b""[..]));
    }
}
