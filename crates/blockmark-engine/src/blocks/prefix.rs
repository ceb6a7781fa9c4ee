//! Structural prefix classification.
//!
//! A prefix is the literal marker at the start of a line (after its
//! indentation) that identifies which structural run the line belongs to.
//! Classification is a literal pattern match; anything it cannot classify is
//! plain text.

use std::sync::LazyLock;

use regex::Regex;

/// Literal markers recognised as structural prefixes.
pub const MARKERS: [&str; 5] = [">", "-", "+", "*", "|"];

static ORDERED_LIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.$").expect("ordered list regex should compile"));

/// Reads from `indent_offset` up to the next space (or end of line) and returns
/// that token if it is a structural marker, otherwise `""`.
pub fn extract_prefix(line: &str, indent_offset: usize) -> &str {
    let Some(rest) = line.get(indent_offset..) else {
        return "";
    };
    let candidate = rest.find(' ').map_or(rest, |end| &rest[..end]);
    if MARKERS.contains(&candidate) || is_ordered_list(candidate) {
        candidate
    } else {
        ""
    }
}

/// True iff `prefix` is digits followed by a single trailing `.`.
pub fn is_ordered_list(prefix: &str) -> bool {
    ORDERED_LIST_RE.is_match(prefix)
}

/// Two prefixes may share a run when equal or when both are ordered-list markers.
pub fn compatible(a: &str, b: &str) -> bool {
    a == b || (is_ordered_list(a) && is_ordered_list(b))
}

/// Number of leading spaces on `line`.
pub fn indent_of(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}

/// The prefix of `line` read at its own indentation.
pub fn line_prefix(line: &str) -> &str {
    extract_prefix(line, indent_of(line))
}

/// Leading spaces of line number `line` in `text`, or 0 past the last line.
pub fn indent_at_line(text: &str, line: usize) -> usize {
    text.split('\n').nth(line).map_or(0, indent_of)
}

/// The prefix that makes `text` a structural run, or `""` for plain text.
///
/// Only the first line is inspected, and the marker must be followed by a
/// space: a bare `-` is still being typed and stays plain text.
pub fn detected_prefix(text: &str) -> &str {
    let first = first_line(text);
    let indent = indent_of(first);
    let prefix = extract_prefix(first, indent);
    if prefix.is_empty() || !first[indent + prefix.len()..].starts_with(' ') {
        return "";
    }
    prefix
}

/// Everything after the first line's indentation and prefix.
pub fn content_after_prefix<'a>(line: &'a str, prefix: &str) -> &'a str {
    let indent = indent_of(line);
    line.get(indent + prefix.len()..).unwrap_or("")
}

pub(crate) fn first_line(text: &str) -> &str {
    text.split('\n').next().unwrap_or(text)
}
