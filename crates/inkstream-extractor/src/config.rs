//! Configuration for the Extractor

use crate::error::ExtractorError;
use serde::{Deserialize, Serialize};

/// Configuration for the Extractor and the sessions built on it
///
/// # Examples
///
/// ```
/// use inkstream_extractor::ExtractorConfig;
///
/// let config = ExtractorConfig::default();
/// assert!(config.case_insensitive_fields);
///
/// let config = ExtractorConfig::strict();
/// assert!(!config.accept_bare_json);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Match field headers and JSON keys regardless of case (`Title:` == `title:`)
    pub case_insensitive_fields: bool,

    /// Treat an unfenced response starting with `{` as a JSON candidate
    pub accept_bare_json: bool,

    /// Derive the heading list from `content` when the response did not supply one
    pub derive_headings: bool,

    /// Maximum accumulated buffer size per session (bytes)
    pub max_text_length: usize,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.max_text_length == 0 {
            return Err(ExtractorError::Config(
                "max_text_length must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Strict preset: exact-case field names, fenced JSON only
    pub fn strict() -> Self {
        Self {
            case_insensitive_fields: false,
            accept_bare_json: false,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            case_insensitive_fields: true,
            accept_bare_json: true,
            derive_headings: true,
            max_text_length: 200_000,
        }
    }
}
