use serde::{Deserialize, Serialize};

/// A byte range `[start, end)` into a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn contains(self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// A single line of a text with its byte span (newline excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRef<'a> {
    pub span: Span,
    pub text: &'a str,
    /// Whether a newline follows this line.
    pub terminated: bool,
}

/// Lines of `text` split on `\n`, with their spans.
///
/// A trailing newline yields a final empty line, so every byte offset of the
/// text falls inside exactly one line span.
pub fn lines_with_spans(text: &str) -> impl Iterator<Item = LineRef<'_>> {
    let total = text.len();
    let mut offset = 0usize;
    text.split('\n').map(move |line| {
        let start = offset;
        let end = start + line.len();
        offset = end + 1;
        LineRef {
            span: Span { start, end },
            text: line,
            terminated: end < total,
        }
    })
}

/// Index of the line holding byte offset `caret`.
pub fn line_at(text: &str, caret: usize) -> usize {
    lines_with_spans(text)
        .position(|line| line.span.contains(caret))
        .unwrap_or_else(|| text.split('\n').count() - 1)
}
