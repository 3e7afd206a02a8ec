//! Error types for the Extractor

use thiserror::Error;

/// Errors surfaced by a streaming session.
///
/// Extraction itself never fails: a response the three grammars cannot
/// interpret still yields a document. These variants only report misuse of
/// a session or its configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractorError {
    /// A chunk or a second `finalize` arrived after the session was finalized
    #[error("Session already finalized")]
    AlreadyFinalized,

    /// Appending the chunk would push the buffer past its limit
    #[error("Text too long: {0} bytes (max: {1})")]
    TextTooLong(usize, usize),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for ExtractorError {
    fn from(e: toml::de::Error) -> Self {
        ExtractorError::Config(format!("Failed to parse TOML: {}", e))
    }
}

impl From<toml::ser::Error> for ExtractorError {
    fn from(e: toml::ser::Error) -> Self {
        ExtractorError::Config(format!("Failed to serialize to TOML: {}", e))
    }
}
