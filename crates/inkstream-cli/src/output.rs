//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use inkstream_extractor::{ExtractedDocument, Field, Grammar};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Longest value shown in a table cell before truncation
const MAX_CELL_CHARS: usize = 120;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a document.
    pub fn format_document(&self, doc: &ExtractedDocument) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(doc)?),
            OutputFormat::Table => Ok(self.format_document_table(doc)),
            OutputFormat::Quiet => Ok(doc.title.clone().unwrap_or_default()),
        }
    }

    /// Format one partial update of a stream.
    ///
    /// JSON output is a single line per update so it can be piped.
    pub fn format_update(&self, seq: usize, doc: &ExtractedDocument) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string(&serde_json::json!({
                "seq": seq,
                "document": doc,
            }))?),
            OutputFormat::Table => {
                let fields: Vec<&str> = doc.populated_fields().iter().map(|f| f.key()).collect();
                let title = doc.title.as_deref().unwrap_or("-");
                Ok(format!(
                    "{} {} [{}]",
                    self.colorize(&format!("#{:<4}", seq), "cyan"),
                    truncate(title, 60),
                    fields.join(", ")
                ))
            }
            OutputFormat::Quiet => Ok(doc.title.clone().unwrap_or_default()),
        }
    }

    /// Format a document as a two-column table.
    fn format_document_table(&self, doc: &ExtractedDocument) -> String {
        if doc.is_empty() {
            return self.colorize("No fields extracted.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);

        for field in Field::ALL {
            let value = match field {
                Field::Title => doc.title.as_deref().map(|v| truncate(v, MAX_CELL_CHARS)),
                Field::Content => doc.content.as_deref().map(|v| truncate(v, MAX_CELL_CHARS)),
                Field::MetaDescription => doc
                    .meta_description
                    .as_deref()
                    .map(|v| truncate(v, MAX_CELL_CHARS)),
                Field::Keywords => doc.keywords.as_ref().map(|v| v.join(", ")),
                Field::Headings => doc.headings.as_ref().map(|v| v.join("\n")),
            };
            let value = value.unwrap_or_else(|| "-".to_string());
            builder.push_record([field.key().to_string(), value]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format the grammar line shown with `--show-grammar`.
    pub fn grammar(&self, grammar: Option<Grammar>) -> String {
        match grammar {
            Some(grammar) => self.info(&format!("Grammar: {}", grammar)),
            None => self.warning("Grammar: none (empty input)"),
        }
    }

    /// Whether output is machine-readable JSON
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Shorten `text` to `max` characters, marking the cut with `…`
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max.saturating_sub(1)).collect();
    short.push('…');
    short
}
