//! Dotenv format.
//!
//! A dotenv file is a flat, ordered list of `KEY=value` lines. Parsing keeps
//! the original lines alongside the tree so that rendering can reproduce
//! comments, blank lines, untouched entries and CRLF line endings exactly.

use std::collections::{HashMap, HashSet};

use crate::core::document::{Document, Mapping, Node};
use crate::core::format::Format;
use crate::error::FormatError;

/// Original lines of a parsed dotenv file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    lines: Vec<Line>,
    crlf: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Line {
    /// Blank line or comment, kept as written.
    Verbatim(String),
    /// An assignment. `raw` may span several physical lines; `comment` is
    /// the trailing `# ...` kept when the value is re-rendered.
    Entry {
        key: String,
        value: String,
        export: bool,
        comment: Option<String>,
        raw: String,
    },
}

/// Parse dotenv text into a flat string mapping.
///
/// # Errors
///
/// Returns `FormatError::Dotenv` with the 1-based line number for a line that
/// is not an assignment, an empty or malformed key, or an unterminated quote.
pub fn parse(text: &str) -> Result<Document, FormatError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut layout = Layout {
        lines: Vec::new(),
        crlf: text.contains("\r\n"),
    };
    let newline = layout.newline();
    let mut mapping = Mapping::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let line_no = i + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            layout.lines.push(Line::Verbatim(line.to_string()));
            i += 1;
            continue;
        }

        let (export, assignment) = match trimmed.strip_prefix("export ") {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };

        let (key, rest) = assignment
            .split_once('=')
            .ok_or_else(|| syntax(line_no, "expected KEY=VALUE"))?;
        let key = key.trim();
        validate_key(key).map_err(|reason| syntax(line_no, reason))?;

        let rest = rest.trim_start();
        let mut raw = line.to_string();
        let (value, comment) = match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let mut body = rest[1..].to_string();
                let close = loop {
                    if let Some(close) = find_closing(&body, quote) {
                        break close;
                    }
                    i += 1;
                    let next = lines
                        .get(i)
                        .ok_or_else(|| syntax(line_no, "unterminated quoted value"))?;
                    body.push('\n');
                    body.push_str(next);
                    raw.push_str(newline);
                    raw.push_str(next);
                };

                let trailing = body[close + 1..].trim();
                if !trailing.is_empty() && !trailing.starts_with('#') {
                    return Err(syntax(line_no, "unexpected characters after closing quote"));
                }

                let value = if quote == '"' {
                    unescape_double_quoted(&body[..close])
                } else {
                    body[..close].to_string()
                };
                (value, (!trailing.is_empty()).then(|| trailing.to_string()))
            }
            _ => {
                let (value, comment) = split_inline_comment(rest);
                (
                    value.trim_end().to_string(),
                    comment.map(|c| c.trim_end().to_string()),
                )
            }
        };

        mapping.insert(key, Node::String(value.clone()));
        layout.lines.push(Line::Entry {
            key: key.to_string(),
            value,
            export,
            comment,
            raw,
        });
        i += 1;
    }

    Ok(Document::with_layout(Node::Mapping(mapping), layout))
}

/// Render a flat mapping as dotenv text.
///
/// With a layout, comments, blank lines and entries whose value did not
/// change are copied from the source; changed entries are re-rendered in
/// place with their trailing comment, and keys missing from the layout are
/// appended. The source's line ending is kept.
///
/// # Errors
///
/// Returns `FormatError::Unrepresentable` if the root is not a mapping of
/// scalars, or a key cannot be written as a dotenv key.
pub fn render(root: &Node, layout: Option<&Layout>) -> Result<Vec<u8>, FormatError> {
    let mapping = match root {
        Node::Mapping(m) => m,
        other => {
            return Err(unrepresentable(format!(
                "root must be a mapping, found a {}",
                other.kind()
            )))
        }
    };

    let mut values = HashMap::with_capacity(mapping.len());
    for (key, node) in mapping.iter() {
        validate_key(key).map_err(|reason| unrepresentable(format!("key `{}`: {}", key, reason)))?;
        let text = match node {
            Node::Null => String::new(),
            other => other.scalar_text().ok_or_else(|| {
                unrepresentable(format!("value of `{}` is a {}", key, other.kind()))
            })?,
        };
        values.insert(key, text);
    }

    let mut out: Vec<String> = Vec::new();
    let mut emitted: HashSet<&str> = HashSet::new();

    if let Some(layout) = layout {
        // Only the last assignment of a repeated key carries the live value.
        let mut last_index = HashMap::new();
        for (idx, line) in layout.lines.iter().enumerate() {
            if let Line::Entry { key, .. } = line {
                last_index.insert(key.as_str(), idx);
            }
        }

        for (idx, line) in layout.lines.iter().enumerate() {
            match line {
                Line::Verbatim(raw) => out.push(raw.clone()),
                Line::Entry {
                    key,
                    value,
                    export,
                    comment,
                    raw,
                } => {
                    let Some(current) = values.get(key.as_str()) else {
                        continue;
                    };
                    if last_index.get(key.as_str()) != Some(&idx) || current == value {
                        out.push(raw.clone());
                    } else {
                        let mut entry = render_entry(key, current, *export);
                        if let Some(comment) = comment {
                            entry.push(' ');
                            entry.push_str(comment);
                        }
                        out.push(entry);
                    }
                    emitted.insert(key.as_str());
                }
            }
        }
    }

    for key in mapping.keys() {
        if emitted.contains(key) {
            continue;
        }
        out.push(render_entry(key, &values[key], false));
    }

    let newline = layout.map_or("\n", Layout::newline);
    let mut text = out.join(newline);
    if !text.is_empty() {
        text.push_str(newline);
    }
    Ok(text.into_bytes())
}

impl Layout {
    fn newline(&self) -> &'static str {
        if self.crlf {
            "\r\n"
        } else {
            "\n"
        }
    }
}

fn render_entry(key: &str, value: &str, export: bool) -> String {
    let prefix = if export { "export " } else { "" };
    if needs_quotes(value) {
        format!("{}{}=\"{}\"", prefix, key, escape_env_value(value))
    } else {
        format!("{}{}={}", prefix, key, value)
    }
}

fn validate_key(key: &str) -> Result<(), &'static str> {
    if key.is_empty() {
        return Err("empty key");
    }
    if key.starts_with('#') {
        return Err("key must not start with `#`");
    }
    if key.chars().any(|ch| ch.is_whitespace() || ch == '=' || ch == '"' || ch == '\'') {
        return Err("key contains whitespace, `=` or quotes");
    }
    Ok(())
}

fn syntax(line: usize, reason: &str) -> FormatError {
    FormatError::Dotenv {
        line,
        reason: reason.to_string(),
    }
}

fn unrepresentable(reason: String) -> FormatError {
    FormatError::Unrepresentable {
        format: Format::Dotenv,
        reason,
    }
}

/// Byte offset of the closing quote, honouring backslash escapes in
/// double-quoted values.
fn find_closing(body: &str, quote: char) -> Option<usize> {
    let mut escaped = false;
    for (idx, ch) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if quote == '"' && ch == '\\' {
            escaped = true;
            continue;
        }
        if ch == quote {
            return Some(idx);
        }
    }
    None
}

/// Split an unquoted value from its ` #comment` tail.
fn split_inline_comment(value: &str) -> (&str, Option<&str>) {
    let mut prev_ws = false;
    for (idx, ch) in value.char_indices() {
        if ch == '#' && prev_ws {
            return (&value[..idx], Some(&value[idx..]));
        }
        prev_ws = ch.is_whitespace();
    }
    (value, None)
}

fn unescape_double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || value.chars().any(|ch| ch.is_whitespace())
        || value.contains('#')
        || value.contains('=')
        || value.contains('"')
        || value.contains('\'')
        || value.contains('\\')
}

fn escape_env_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(ch),
        }
    }

    escaped
}
