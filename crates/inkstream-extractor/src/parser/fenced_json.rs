//! Tier 1: JSON inside a ```` ```json ```` fence
//!
//! The candidate text may be cut anywhere. Partial reads walk the object
//! by hand and keep whatever `"key": value` pairs have arrived; final reads
//! try `serde_json` first and only walk when the model's JSON is not quite
//! valid.

use super::cursor::{Cursor, Hex4};
use crate::config::ExtractorConfig;
use crate::types::{ExtractMode, ExtractedDocument, Field};
use serde_json::Value;
use tracing::debug;

const FENCE: &str = "```";

/// Extract a document from the JSON candidate, if there is one and it
/// yields at least one field.
pub(crate) fn extract(
    text: &str,
    mode: ExtractMode,
    config: &ExtractorConfig,
) -> Option<ExtractedDocument> {
    let body = locate(text, config.accept_bare_json)?;
    let case_insensitive = config.case_insensitive_fields;

    if mode.is_final() {
        match parse_strict(body, case_insensitive) {
            Ok(doc) if !doc.is_empty() => return Some(doc),
            Ok(_) => debug!("Strict JSON parse found no known fields"),
            Err(e) => debug!("Strict JSON parse failed, walking tolerantly: {}", e),
        }
    }

    let doc = parse_tolerant(body, mode, case_insensitive);
    (!doc.is_empty()).then_some(doc)
}

/// Find the JSON candidate: the body of the first ```` ```json ```` fence,
/// up to its closing fence or end of input.
pub(crate) fn locate(text: &str, accept_bare_json: bool) -> Option<&str> {
    let mut from = 0;
    while let Some(found) = text[from..].find(FENCE) {
        let tag_start = from + found + FENCE.len();
        let (tag, body_start) = match text[tag_start..].find('\n') {
            Some(nl) => (&text[tag_start..tag_start + nl], tag_start + nl + 1),
            None => (&text[tag_start..], text.len()),
        };

        if tag.trim().eq_ignore_ascii_case("json") {
            let body = &text[body_start..];
            return Some(match closing_fence(body) {
                Some(end) => &body[..end],
                None => body,
            });
        }
        from = tag_start;
    }

    let trimmed = text.trim_start();
    (accept_bare_json && trimmed.starts_with('{')).then_some(trimmed)
}

/// Byte offset of the line holding the closing fence
fn closing_fence(body: &str) -> Option<usize> {
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if line.trim_start().starts_with(FENCE) {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

fn parse_strict(body: &str, case_insensitive: bool) -> Result<ExtractedDocument, serde_json::Error> {
    let value: Value = serde_json::from_str(body.trim())?;
    let mut doc = ExtractedDocument::default();

    let Value::Object(map) = value else {
        return Ok(doc);
    };

    for (key, value) in &map {
        let Some(field) = Field::parse(key, case_insensitive) else {
            continue;
        };

        if field.is_list() {
            let items = match value {
                Value::Array(items) => Some(items.iter().filter_map(scalar_text).collect()),
                Value::String(s) => Some(split_list(s)),
                _ => None,
            };
            if let Some(items) = items {
                doc.set_list(field, items);
            }
        } else if let Some(text) = scalar_text(value) {
            doc.set_text(field, text);
        }
    }

    Ok(doc)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Walk the top-level object by hand, collecting known keys.
fn parse_tolerant(body: &str, mode: ExtractMode, case_insensitive: bool) -> ExtractedDocument {
    let mut doc = ExtractedDocument::default();
    let Some(open) = body.find('{') else {
        return doc;
    };
    let mut cur = Cursor::new(&body[open + 1..]);

    loop {
        cur.skip_ws();
        match cur.peek() {
            None | Some('}') => break,
            Some('"') => {}
            // stray commas or junk between pairs
            Some(_) => {
                cur.bump();
                continue;
            }
        }

        cur.bump();
        let key = read_string(&mut cur, Quote::Key);
        if !key.terminated {
            break;
        }
        cur.skip_ws();
        if !cur.eat(':') {
            continue;
        }
        cur.skip_ws();

        let field = Field::parse(&key.value, case_insensitive);
        match cur.peek() {
            None => break,
            Some('"') => {
                cur.bump();
                let value = read_string(&mut cur, Quote::Value);
                if let Some(field) = field {
                    assign_string(&mut doc, field, value, mode);
                }
            }
            Some('[') => {
                cur.bump();
                let (items, closed) = read_array(&mut cur, mode);
                // `[` with no complete element yet says nothing about the list
                let known = closed || !items.is_empty() || mode.is_final();
                if let Some(field) = field.filter(|f| f.is_list() && known) {
                    doc.set_list(field, items);
                }
            }
            Some('{') => skip_nested(&mut cur),
            Some(_) => {
                let (raw, terminated) = read_scalar(&mut cur);
                if let Some(field) = field {
                    if (terminated || mode.is_final()) && raw != "null" && !raw.is_empty() {
                        doc.set_text(field, raw.to_string());
                    }
                }
            }
        }
    }

    doc
}

fn assign_string(doc: &mut ExtractedDocument, field: Field, value: JsonString, mode: ExtractMode) {
    // an opening quote alone says nothing about the value yet
    if !value.terminated && value.value.is_empty() {
        return;
    }

    if field.is_list() {
        let mut items = split_list(&value.value);
        if !value.terminated && !mode.is_final() {
            if !value.value.ends_with(',') {
                items.pop();
            }
            if items.is_empty() {
                return;
            }
        }
        doc.set_list(field, items);
    } else {
        doc.set_text(field, value.value);
    }
}

/// Read array elements after `[`. In partial mode an element is only kept
/// once the `,` or `]` that terminates it has arrived. The flag reports
/// whether the closing `]` was seen.
fn read_array(cur: &mut Cursor<'_>, mode: ExtractMode) -> (Vec<String>, bool) {
    let mut items = Vec::new();

    loop {
        cur.skip_ws();
        let item = match cur.peek() {
            // `}` before `]`: the array was never closed, leave the brace to the caller
            None | Some('}') => return (items, false),
            Some(']') => {
                cur.bump();
                return (items, true);
            }
            Some(',') => {
                cur.bump();
                continue;
            }
            Some('"') => {
                cur.bump();
                let s = read_string(cur, Quote::Value);
                (s.terminated || !s.value.is_empty()).then_some(s.value)
            }
            Some('{') | Some('[') => {
                skip_nested(cur);
                None
            }
            Some(_) => {
                let (raw, _) = read_scalar(cur);
                (raw != "null" && !raw.is_empty()).then(|| raw.to_string())
            }
        };

        cur.skip_ws();
        match cur.peek() {
            Some(',') => {
                cur.bump();
                items.extend(item);
            }
            Some(']') => {
                cur.bump();
                items.extend(item);
                return (items, true);
            }
            None => {
                if mode.is_final() {
                    items.extend(item);
                }
                return (items, false);
            }
            // missing comma
            Some(_) => items.extend(item),
        }
    }
}

/// Bare literal up to the next delimiter
fn read_scalar<'a>(cur: &mut Cursor<'a>) -> (&'a str, bool) {
    let (raw, terminated) = cur.take_until(|c| matches!(c, ',' | '}' | ']' | '\n'));
    (raw.trim(), terminated)
}

/// Skip a nested object or array, honouring strings
fn skip_nested(cur: &mut Cursor<'_>) {
    let mut depth = 0usize;
    while let Some(c) = cur.bump() {
        match c {
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return;
                }
            }
            '"' => {
                read_string(cur, Quote::Key);
            }
            _ => {}
        }
    }
}

/// How a `"` inside a string is read
#[derive(Clone, Copy)]
enum Quote {
    /// Always closes the string
    Key,
    /// Closes the string only where JSON could continue after it; otherwise
    /// it is an unescaped quote inside the text
    Value,
}

struct JsonString {
    value: String,
    terminated: bool,
}

enum Escape {
    Char(char),
    Truncated,
}

/// Read a string body after its opening quote
fn read_string(cur: &mut Cursor<'_>, quote: Quote) -> JsonString {
    let mut value = String::new();
    while let Some(c) = cur.bump() {
        match c {
            '"' if matches!(quote, Quote::Value) && !closes_value(cur.rest()) => value.push(c),
            '"' => {
                return JsonString {
                    value,
                    terminated: true,
                }
            }
            '\\' => match read_escape(cur) {
                Escape::Char(ch) => value.push(ch),
                Escape::Truncated => break,
            },
            _ => value.push(c),
        }
    }
    JsonString {
        value,
        terminated: false,
    }
}

/// Whether a `"` followed by `rest` can end a value: the text after it must
/// be end of input, a closing bracket, or a comma leading to another value.
/// A quote and then a newline before the next key also counts (missing comma).
fn closes_value(rest: &str) -> bool {
    let after = rest.trim_start();
    let gap = &rest[..rest.len() - after.len()];

    match after.chars().next() {
        None | Some('}') | Some(']') | Some(':') => true,
        Some('"') => gap.contains('\n'),
        Some(',') => starts_value(after[1..].trim_start()),
        Some(_) => false,
    }
}

fn starts_value(text: &str) -> bool {
    match text.chars().next() {
        None => true,
        Some(c) if matches!(c, '"' | '{' | '[' | ']' | '}' | '-') || c.is_ascii_digit() => true,
        Some(_) => ["true", "false", "null"].iter().any(|word| text.starts_with(word)),
    }
}

fn read_escape(cur: &mut Cursor<'_>) -> Escape {
    let Some(c) = cur.bump() else {
        return Escape::Truncated;
    };
    Escape::Char(match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        'b' => '\u{8}',
        'f' => '\u{c}',
        'u' => return read_unicode_escape(cur),
        other => other,
    })
}

fn read_unicode_escape(cur: &mut Cursor<'_>) -> Escape {
    let high = match cur.hex4() {
        Hex4::Value(v) => v,
        Hex4::Truncated => return Escape::Truncated,
        Hex4::Invalid => return Escape::Char(char::REPLACEMENT_CHARACTER),
    };

    if !(0xD800..0xDC00).contains(&high) {
        return Escape::Char(char::from_u32(u32::from(high)).unwrap_or(char::REPLACEMENT_CHARACTER));
    }

    // high surrogate: the low half may still be in flight
    let rest = cur.rest();
    if rest.is_empty() || rest == "\\" {
        return Escape::Truncated;
    }
    if rest.starts_with("\\u") {
        let mut probe = *cur;
        probe.bump();
        probe.bump();
        match probe.hex4() {
            Hex4::Value(low) if (0xDC00..0xE000).contains(&low) => {
                *cur = probe;
                let code = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                return Escape::Char(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            Hex4::Truncated => return Escape::Truncated,
            _ => {}
        }
    }
    Escape::Char(char::REPLACEMENT_CHARACTER)
}
