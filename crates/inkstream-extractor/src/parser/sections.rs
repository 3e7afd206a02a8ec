//! Tier 2: `field: value` sections
//!
//! A header is a line starting with one of the five field names followed by
//! a colon. Its value runs until the next header, so `content` may span many
//! lines. List fields take either an inline comma list or the bullet lines
//! that follow an empty header. While streaming, a list item still being
//! written (no `,`, `]` or newline after it yet) is held back.

use crate::types::{ExtractMode, ExtractedDocument, Field};

struct Section<'a> {
    field: Field,
    first: &'a str,
    rest: Vec<&'a str>,
    /// The section's last line is the unterminated end of the text
    open: bool,
}

/// Extract a document from header sections. `None` when no header yields a value.
pub(crate) fn extract(
    text: &str,
    mode: ExtractMode,
    case_insensitive: bool,
) -> Option<ExtractedDocument> {
    let mut doc = ExtractedDocument::default();

    for section in split_sections(text, case_insensitive) {
        if section.field.is_list() {
            if let Some(items) = list_value(&section, mode) {
                doc.set_list(section.field, items);
            }
        } else if let Some(value) = text_value(&section, mode) {
            doc.set_text(section.field, value);
        }
    }

    (!doc.is_empty()).then_some(doc)
}

fn split_sections(text: &str, case_insensitive: bool) -> Vec<Section<'_>> {
    let mut sections: Vec<Section<'_>> = Vec::new();
    let mut in_fence = false;

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if !in_fence {
            if let Some((field, value)) = parse_header(line, case_insensitive) {
                sections.push(Section {
                    field,
                    first: value,
                    rest: Vec::new(),
                    open: false,
                });
                continue;
            }
        }

        // text before the first header is preamble
        if let Some(current) = sections.last_mut() {
            if is_fence(line) {
                in_fence = !in_fence;
            }
            current.rest.push(line);
        }
    }

    if !text.ends_with('\n') {
        if let Some(last) = sections.last_mut() {
            last.open = true;
        }
    }

    sections
}

/// `name: value` where `name` is exactly one of the field names
fn parse_header(line: &str, case_insensitive: bool) -> Option<(Field, &str)> {
    let (name, value) = line.split_once(':')?;
    let field = Field::parse(name, case_insensitive)?;
    Some((field, value.trim_start()))
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

fn text_value(section: &Section<'_>, mode: ExtractMode) -> Option<String> {
    let mut value = section.first.to_string();
    for line in &section.rest {
        value.push('\n');
        value.push_str(line);
    }

    let value = value.trim();
    if value.is_empty() && !mode.is_final() {
        return None;
    }
    Some(value.to_string())
}

fn list_value(section: &Section<'_>, mode: ExtractMode) -> Option<Vec<String>> {
    let inline = section.first.trim();
    let (mut items, dangling, closed) = if inline.is_empty() {
        let (items, from_last_line) = bullet_items(&section.rest);
        (items, section.open && from_last_line, false)
    } else {
        let terminated = inline.ends_with(',') || inline.ends_with(']');
        let dangling = section.open && section.rest.is_empty() && !terminated;
        (inline_items(inline), dangling, inline.starts_with('[') && inline.ends_with(']'))
    };

    if mode.is_final() {
        return Some(items);
    }
    if dangling {
        items.pop();
    }
    (closed || !items.is_empty()).then_some(items)
}

/// `a, b, c` or `["a", "b"]`
fn inline_items(inline: &str) -> Vec<String> {
    let inline = inline.strip_prefix('[').unwrap_or(inline);
    let inline = inline.strip_suffix(']').unwrap_or(inline);

    inline
        .split(',')
        .map(|item| item.trim().trim_matches(|c: char| c == '"' || c == '\''))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Bullet lines up to the next blank line; blank lines before the first
/// bullet are skipped. The flag is set when the last item came from the
/// last line.
fn bullet_items(lines: &[&str]) -> (Vec<String>, bool) {
    let mut items = Vec::new();
    let mut from_last_line = false;

    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if items.is_empty() {
                continue;
            }
            break;
        }

        match strip_bullet(trimmed) {
            Some(item) if !item.is_empty() => {
                items.push(item.to_string());
                from_last_line = idx + 1 == lines.len();
            }
            Some(_) => {}
            None => break,
        }
    }

    (items, from_last_line)
}

fn strip_bullet(line: &str) -> Option<&str> {
    for marker in ["- ", "* ", "+ "] {
        if let Some(item) = line.strip_prefix(marker) {
            return Some(item.trim());
        }
    }
    if matches!(line, "-" | "*" | "+") {
        return Some("");
    }

    // numbered: `1. item` or `1) item`
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(item) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return Some(item.trim());
        }
    }
    None
}
