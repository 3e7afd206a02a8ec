//! Document and vocabulary types produced by extraction

use serde::{Deserialize, Serialize};
use std::fmt;

/// Best-available structured interpretation of a generated article
///
/// Every field is independently optional. `None` means the field has not
/// been seen in the text (yet); it is never used as a stand-in for an empty
/// value the text actually contains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDocument {
    /// Document title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Markdown body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Short SEO summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,

    /// Keywords in the order the model emitted them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,

    /// Heading texts in document order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headings: Option<Vec<String>>,
}

impl ExtractedDocument {
    /// True when no field has been populated
    pub fn is_empty(&self) -> bool {
        self.populated_fields().is_empty()
    }

    /// Fields that are present, in canonical order
    pub fn populated_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.has(*field))
            .collect()
    }

    /// Whether `field` is present
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::Title => self.title.is_some(),
            Field::Content => self.content.is_some(),
            Field::MetaDescription => self.meta_description.is_some(),
            Field::Keywords => self.keywords.is_some(),
            Field::Headings => self.headings.is_some(),
        }
    }

    /// Set a scalar field. List fields are ignored.
    pub(crate) fn set_text(&mut self, field: Field, value: String) {
        match field {
            Field::Title => self.title = Some(value),
            Field::Content => self.content = Some(value),
            Field::MetaDescription => self.meta_description = Some(value),
            Field::Keywords | Field::Headings => {}
        }
    }

    /// Set a list field. Scalar fields are ignored.
    pub(crate) fn set_list(&mut self, field: Field, items: Vec<String>) {
        match field {
            Field::Keywords => self.keywords = Some(items),
            Field::Headings => self.headings = Some(items),
            Field::Title | Field::Content | Field::MetaDescription => {}
        }
    }
}

/// Extraction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMode {
    /// Mid-stream: more text may still arrive
    Partial,
    /// Stream complete: the text is all there will be
    Final,
}

impl ExtractMode {
    /// True for [`ExtractMode::Final`]
    pub fn is_final(self) -> bool {
        matches!(self, ExtractMode::Final)
    }
}

/// The fixed field vocabulary shared with the generation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// `title`
    Title,
    /// `content`
    Content,
    /// `metaDescription`
    MetaDescription,
    /// `keywords`
    Keywords,
    /// `headings`
    Headings,
}

impl Field {
    /// All fields in canonical order
    pub const ALL: [Field; 5] = [
        Field::Title,
        Field::Content,
        Field::MetaDescription,
        Field::Keywords,
        Field::Headings,
    ];

    /// Wire name as requested from the model
    pub fn key(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Content => "content",
            Field::MetaDescription => "metaDescription",
            Field::Keywords => "keywords",
            Field::Headings => "headings",
        }
    }

    /// Whether the field holds a list of strings
    pub fn is_list(self) -> bool {
        matches!(self, Field::Keywords | Field::Headings)
    }

    /// Resolve a field name as written by the model
    ///
    /// `meta_description` is accepted as a spelling of `metaDescription`.
    pub fn parse(name: &str, case_insensitive: bool) -> Option<Field> {
        let matches = |candidate: &str| {
            if case_insensitive {
                name.eq_ignore_ascii_case(candidate)
            } else {
                name == candidate
            }
        };

        Field::ALL
            .into_iter()
            .find(|field| matches(field.key()))
            .or_else(|| matches("meta_description").then_some(Field::MetaDescription))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The grammar tier that produced a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grammar {
    /// A ```` ```json ```` block (or bare JSON object)
    FencedJson,
    /// `field: value` sections
    Sections,
    /// Plain markdown with an optional `# title`
    Markdown,
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Grammar::FencedJson => "fenced-json",
            Grammar::Sections => "sections",
            Grammar::Markdown => "markdown",
        };
        f.write_str(name)
    }
}

/// A document together with the grammar it was read with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// The extracted document
    pub document: ExtractedDocument,

    /// Grammar used; `None` only when the text was empty or whitespace
    pub grammar: Option<Grammar>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_parse_exact() {
        assert_eq!(Field::parse("title", false), Some(Field::Title));
        assert_eq!(Field::parse("metaDescription", false), Some(Field::MetaDescription));
        assert_eq!(Field::parse("Title", false), None);
        assert_eq!(Field::parse("subtitle", false), None);
    }

    #[test]
    fn test_field_parse_case_insensitive() {
        assert_eq!(Field::parse("Title", true), Some(Field::Title));
        assert_eq!(Field::parse("KEYWORDS", true), Some(Field::Keywords));
        assert_eq!(Field::parse("metadescription", true), Some(Field::MetaDescription));
        assert_eq!(Field::parse("Meta_Description", true), Some(Field::MetaDescription));
    }

    #[test]
    fn test_list_fields() {
        let lists: Vec<Field> = Field::ALL.into_iter().filter(|f| f.is_list()).collect();
        assert_eq!(lists, vec![Field::Keywords, Field::Headings]);
    }

    #[test]
    fn test_empty_document() {
        let doc = ExtractedDocument::default();
        assert!(doc.is_empty());
        assert!(doc.populated_fields().is_empty());
    }

    #[test]
    fn test_populated_fields_order() {
        let doc = ExtractedDocument {
            keywords: Some(vec![]),
            title: Some("t".to_string()),
            ..Default::default()
        };
        assert_eq!(doc.populated_fields(), vec![Field::Title, Field::Keywords]);
    }

    #[test]
    fn test_serialize_camel_case_and_skip_absent() {
        let doc = ExtractedDocument {
            title: Some("Hello".to_string()),
            meta_description: Some("Summary".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["title"], "Hello");
        assert_eq!(json["metaDescription"], "Summary");
        assert!(json.get("content").is_none());
        assert!(json.get("keywords").is_none());
    }

    #[test]
    fn test_set_helpers_respect_field_kind() {
        let mut doc = ExtractedDocument::default();
        doc.set_text(Field::Keywords, "ignored".to_string());
        doc.set_list(Field::Title, vec!["ignored".to_string()]);
        assert!(doc.is_empty());

        doc.set_list(Field::Headings, vec!["Intro".to_string()]);
        assert_eq!(doc.headings, Some(vec!["Intro".to_string()]));
    }
}
