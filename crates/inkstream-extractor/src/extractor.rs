//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::parser::{fenced_json, markdown, sections};
use crate::types::{ExtractMode, ExtractedDocument, Extraction, Grammar};
use tracing::debug;

/// Reads structured documents out of free-form model output
///
/// Stateless: every call parses the whole text it is given, so the same
/// text always produces the same document and a value can be shared freely
/// between sessions and threads.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    /// Create a new Extractor
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// The configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract the best-available document from `text`
    ///
    /// Never fails. Text that matches no structured grammar comes back as
    /// `content`, and blank text as an empty document.
    pub fn extract(&self, text: &str, mode: ExtractMode) -> ExtractedDocument {
        self.extract_detailed(text, mode).document
    }

    /// Like [`extract`](Self::extract), also reporting which grammar matched
    pub fn extract_detailed(&self, text: &str, mode: ExtractMode) -> Extraction {
        let (mut document, grammar) = if let Some(doc) = fenced_json::extract(text, mode, &self.config) {
            (doc, Some(Grammar::FencedJson))
        } else if let Some(doc) = sections::extract(text, mode, self.config.case_insensitive_fields) {
            (doc, Some(Grammar::Sections))
        } else if let Some(doc) = markdown::extract(text) {
            (doc, Some(Grammar::Markdown))
        } else {
            (ExtractedDocument::default(), None)
        };

        if self.config.derive_headings && document.headings.is_none() {
            if let Some(content) = &document.content {
                document.headings = markdown::derive_headings(content);
            }
        }

        debug!(
            "Extracted {} field(s) from {} bytes via {:?} ({:?} mode)",
            document.populated_fields().len(),
            text.len(),
            grammar,
            mode
        );

        Extraction { document, grammar }
    }
}

/// Extract with the default configuration
///
/// # Examples
///
/// ```
/// use inkstream_extractor::{extract, ExtractMode};
///
/// let doc = extract("# Hello\n\nWorld", ExtractMode::Final);
/// assert_eq!(doc.title.as_deref(), Some("Hello"));
/// assert_eq!(doc.content.as_deref(), Some("World"));
/// ```
pub fn extract(text: &str, mode: ExtractMode) -> ExtractedDocument {
    Extractor::default().extract(text, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_no_grammar() {
        let extraction = Extractor::default().extract_detailed("", ExtractMode::Partial);
        assert!(extraction.document.is_empty());
        assert_eq!(extraction.grammar, None);

        let extraction = Extractor::default().extract_detailed("  \n ", ExtractMode::Final);
        assert!(extraction.document.is_empty());
        assert_eq!(extraction.grammar, None);
    }

    #[test]
    fn test_grammar_reported() {
        let extractor = Extractor::default();
        let cases = [
            ("```json\n{\"title\": \"t\"}\n```", Grammar::FencedJson),
            ("title: t", Grammar::Sections),
            ("# t", Grammar::Markdown),
            ("just words", Grammar::Markdown),
        ];
        for (text, expected) in cases {
            assert_eq!(
                extractor.extract_detailed(text, ExtractMode::Partial).grammar,
                Some(expected),
                "text: {:?}",
                text
            );
        }
    }

    #[test]
    fn test_json_tier_without_fields_falls_through() {
        let extraction =
            Extractor::default().extract_detailed("```json\n{\"unrelated\": 1}\n```", ExtractMode::Final);
        assert_eq!(extraction.grammar, Some(Grammar::Markdown));
        assert!(extraction.document.content.is_some());
    }

    #[test]
    fn test_headings_derived_from_content() {
        let doc = extract("title: T\ncontent: ## One\ntext\n## Two", ExtractMode::Partial);
        assert_eq!(doc.headings, Some(vec!["One".to_string(), "Two".to_string()]));
    }

    #[test]
    fn test_explicit_headings_not_overridden() {
        let doc = extract(
            "```json\n{\"content\": \"## Derived\", \"headings\": [\"Given\"]}\n```",
            ExtractMode::Final,
        );
        assert_eq!(doc.headings, Some(vec!["Given".to_string()]));
    }

    #[test]
    fn test_derivation_can_be_disabled() {
        let config = ExtractorConfig {
            derive_headings: false,
            ..ExtractorConfig::default()
        };
        let doc = Extractor::new(config).extract("## Section\nbody", ExtractMode::Final);
        assert!(doc.headings.is_none());
    }

    #[test]
    fn test_bare_json_respects_config() {
        let text = "{\"title\": \"Bare\"}";
        assert_eq!(
            extract(text, ExtractMode::Final).title.as_deref(),
            Some("Bare")
        );

        let strict = Extractor::new(ExtractorConfig::strict());
        let doc = strict.extract(text, ExtractMode::Final);
        assert!(doc.title.is_none());
        assert_eq!(doc.content.as_deref(), Some(text));
    }
}
