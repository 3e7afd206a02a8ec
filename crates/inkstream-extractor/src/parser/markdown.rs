//! Tier 3: plain markdown, plus ATX heading scanning shared with the
//! heading-list derivation.

use crate::types::ExtractedDocument;

/// An ATX heading (`#` to `######`) found outside fenced code
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Heading<'a> {
    /// Zero-based line index in the scanned text
    pub line: usize,
    pub level: usize,
    pub text: &'a str,
}

/// The first level-1 heading becomes the title and the rest of the text,
/// with that line removed, the content. Without one, the whole text is
/// content. `None` for blank text.
pub(crate) fn extract(text: &str) -> Option<ExtractedDocument> {
    if text.trim().is_empty() {
        return None;
    }

    let mut doc = ExtractedDocument::default();
    let title = scan_headings(text).into_iter().find(|h| h.level == 1);

    match title {
        Some(heading) => {
            doc.title = Some(heading.text.to_string());
            let body: Vec<&str> = text
                .split('\n')
                .enumerate()
                .filter(|(idx, _)| *idx != heading.line)
                .map(|(_, line)| line)
                .collect();
            doc.content = trim_blank_lines(&body.join("\n"));
        }
        None => doc.content = trim_blank_lines(text),
    }

    Some(doc)
}

/// Drop whitespace-only lines at both ends; everything between is kept as is.
fn trim_blank_lines(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.split('\n').collect();
    let start = lines.iter().position(|line| !line.trim().is_empty())?;
    let end = lines.iter().rposition(|line| !line.trim().is_empty())?;

    let body = lines[start..=end].join("\n");
    Some(body.strip_suffix('\r').map(str::to_string).unwrap_or(body))
}

/// Heading texts of levels 1-6, in document order. `None` when there are none.
pub(crate) fn derive_headings(content: &str) -> Option<Vec<String>> {
    let headings: Vec<String> = scan_headings(content)
        .into_iter()
        .map(|h| h.text.to_string())
        .collect();

    (!headings.is_empty()).then_some(headings)
}

pub(crate) fn scan_headings(text: &str) -> Vec<Heading<'_>> {
    let mut headings = Vec::new();
    let mut in_fence = false;

    for (idx, line) in text.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some((level, text)) = parse_heading(line) {
            headings.push(Heading {
                line: idx,
                level,
                text,
            });
        }
    }

    headings
}

/// `## Text ##` -> `(2, "Text")`
fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let level = line.bytes().take_while(|b| *b == b'#').count();
    if !(1..=6).contains(&level) {
        return None;
    }

    let rest = &line[level..];
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }

    let text = strip_closing_sequence(rest.trim());
    (!text.is_empty()).then_some((level, text))
}

fn strip_closing_sequence(text: &str) -> &str {
    let without = text.trim_end_matches('#');
    if without.len() == text.len() {
        return text;
    }
    if without.is_empty() || without.ends_with(|c: char| c.is_whitespace()) {
        without.trim_end()
    } else {
        text
    }
}
