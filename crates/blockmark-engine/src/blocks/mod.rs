//! # Blocks
//!
//! A document is an ordered sequence of blocks. A block is either a single
//! logical line of markdown or a multi-line structural run (quote, list,
//! ordered list, checkbox list, code fence, table) whose lines share a prefix.
//!
//! ## Modules
//!
//! - **`prefix`**: pure prefix classification (`extract_prefix`, `compatible`, ...)
//! - **`fence`**: code fence delimiters
//! - **`arena`**: stable slot storage plus document order

pub mod arena;
pub mod fence;
pub mod prefix;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::options::EngineOptions;

pub use arena::BlockArena;
pub use fence::{CodeFence, FenceKind};

/// Stable identity of a block. Survives in-place edits and reconciliation of
/// the block it names; a block absorbed by a merge loses its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId(pub Uuid);

impl BlockId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Type tag of a multi-line block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MultiLineKind {
    Quote,
    List,
    OrderedList,
    Checkbox,
    Code,
    Table,
}

impl MultiLineKind {
    /// Derives the kind from a structural prefix and the text following it.
    pub fn from_prefix(marker: &str, content: &str) -> Option<Self> {
        match marker {
            ">" => Some(Self::Quote),
            "-" | "+" | "*" if is_task_box(content) => Some(Self::Checkbox),
            "-" | "+" | "*" => Some(Self::List),
            "|" => Some(Self::Table),
            p if prefix::is_ordered_list(p) => Some(Self::OrderedList),
            p if CodeFence::is_marker(p) => Some(Self::Code),
            _ => None,
        }
    }

    /// Code blocks are self-delimiting and never absorb a neighbour.
    pub fn is_mergeable(self) -> bool {
        !matches!(self, Self::Code)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::List => "list",
            Self::OrderedList => "ordered-list",
            Self::Checkbox => "checkbox",
            Self::Code => "code",
            Self::Table => "table",
        }
    }
}

impl fmt::Display for MultiLineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MultiLineKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quote" => Ok(Self::Quote),
            "list" => Ok(Self::List),
            "ordered-list" | "ordered" | "ol" => Ok(Self::OrderedList),
            "checkbox" | "task" => Ok(Self::Checkbox),
            "code" => Ok(Self::Code),
            "table" => Ok(Self::Table),
            _ => Err(EngineError::UnknownKind(s.to_string())),
        }
    }
}

fn is_task_box(content: &str) -> bool {
    let t = content.trim_start();
    t.starts_with("[ ]") || t.starts_with("[x]") || t.starts_with("[X]")
}

/// The structural part of a multi-line block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub prefix: String,
    pub kind: MultiLineKind,
    pub indent_level: usize,
}

impl Structure {
    /// Detects the structure a text would have as a multi-line block, from its
    /// first line. Returns `None` for plain text.
    pub fn detect(text: &str, options: &EngineOptions) -> Option<Self> {
        let first = prefix::first_line(text);
        let indent = prefix::indent_of(first);
        if let Some(fence) = CodeFence::open(first) {
            return Some(Self {
                prefix: fence.marker().to_string(),
                kind: MultiLineKind::Code,
                indent_level: options.indent_level(indent),
            });
        }
        let p = prefix::detected_prefix(text);
        let kind = MultiLineKind::from_prefix(p, prefix::content_after_prefix(first, p))?;
        Some(Self {
            prefix: p.to_string(),
            kind,
            indent_level: options.indent_level(indent),
        })
    }
}

/// Single-line or multi-line variant of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    SingleLine,
    MultiLine(Structure),
}

/// One contiguous unit of document text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    id: BlockId,
    text: String,
    shape: Shape,
}

impl Block {
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            id: BlockId::new(),
            text: text.into(),
            shape: Shape::SingleLine,
        }
    }

    pub fn multi(text: impl Into<String>, structure: Structure) -> Self {
        Self {
            id: BlockId::new(),
            text: text.into(),
            shape: Shape::MultiLine(structure),
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Replaces text and shape while keeping the block's identity.
    pub fn reshape(&mut self, text: impl Into<String>, shape: Shape) {
        self.text = text.into();
        self.shape = shape;
    }

    pub fn structure(&self) -> Option<&Structure> {
        match &self.shape {
            Shape::SingleLine => None,
            Shape::MultiLine(s) => Some(s),
        }
    }

    pub fn is_multi_line(&self) -> bool {
        matches!(self.shape, Shape::MultiLine(_))
    }

    pub fn kind(&self) -> Option<MultiLineKind> {
        self.structure().map(|s| s.kind)
    }

    pub fn prefix(&self) -> Option<&str> {
        self.structure().map(|s| s.prefix.as_str())
    }

    /// The prefix the block's text calls for, regardless of its current shape.
    pub fn detected_prefix(&self) -> &str {
        prefix::detected_prefix(&self.text)
    }

    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// Appends `line` on a new line of its own.
    pub(crate) fn append_line(&mut self, line: &str) {
        self.text.push('\n');
        self.text.push_str(line);
    }

    /// Collapses the block to one line of plain text.
    ///
    /// Each line loses its indentation, structural marker and task box, fence
    /// delimiter lines are dropped, and the remaining contents are joined with
    /// single spaces.
    pub fn flattened_text(&self) -> String {
        let Some(structure) = self.structure() else {
            return self.text.clone();
        };
        let mut parts = Vec::new();
        for line in self.text.split('\n') {
            let content = match structure.kind {
                MultiLineKind::Code => {
                    if CodeFence::open(line).is_some() {
                        continue;
                    }
                    line.trim()
                }
                _ => strip_marker(line),
            };
            if !content.is_empty() {
                parts.push(content);
            }
        }
        parts.join(" ")
    }
}

fn strip_marker(line: &str) -> &str {
    let p = prefix::line_prefix(line);
    let mut content = prefix::content_after_prefix(line, p).trim();
    for task_box in ["[ ]", "[x]", "[X]"] {
        if let Some(rest) = content.strip_prefix(task_box) {
            content = rest.trim_start();
            break;
        }
    }
    content
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.shape {
            Shape::SingleLine => write!(f, "SingleLine {:?}", self.text),
            Shape::MultiLine(s) => write!(
                f,
                "MultiLine({}, {:?}, indent {}) {:?}",
                s.kind, s.prefix, s.indent_level, self.text
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(">", " quoted", Some(MultiLineKind::Quote))]
    #[case("-", " item", Some(MultiLineKind::List))]
    #[case("*", " [ ] todo", Some(MultiLineKind::Checkbox))]
    #[case("+", " [x] done", Some(MultiLineKind::Checkbox))]
    #[case("3.", " third", Some(MultiLineKind::OrderedList))]
    #[case("|", " a | b |", Some(MultiLineKind::Table))]
    #[case("```", "rust", Some(MultiLineKind::Code))]
    #[case("", "plain", None)]
    fn kind_from_prefix(
        #[case] prefix: &str,
        #[case] content: &str,
        #[case] expected: Option<MultiLineKind>,
    ) {
        assert_eq!(MultiLineKind::from_prefix(prefix, content), expected);
    }

    #[test]
    fn detect_structure_with_indent() {
        let s = Structure::detect("    - deep", &EngineOptions::default()).unwrap();
        assert_eq!(s.prefix, "-");
        assert_eq!(s.kind, MultiLineKind::List);
        assert_eq!(s.indent_level, 2);
    }

    #[test]
    fn detect_structure_of_fence() {
        let s = Structure::detect("~~~\ncode\n~~~", &EngineOptions::default()).unwrap();
        assert_eq!(s.prefix, "~~~");
        assert_eq!(s.kind, MultiLineKind::Code);
    }

    #[test]
    fn plain_text_has_no_structure() {
        assert!(Structure::detect("hello - world", &EngineOptions::default()).is_none());
    }

    #[test]
    fn reshape_keeps_identity() {
        let mut block = Block::single("- a");
        let id = block.id();
        let structure = Structure::detect("- a", &EngineOptions::default()).unwrap();
        block.reshape("- a", Shape::MultiLine(structure));
        assert_eq!(block.id(), id);
        assert!(block.is_multi_line());
        assert_eq!(block.prefix(), Some("-"));
    }

    #[test]
    fn flatten_list() {
        let structure = Structure::detect("- a", &EngineOptions::default()).unwrap();
        let block = Block::multi("- a\n  - b\n- [x] c", structure);
        assert_eq!(block.flattened_text(), "a b c");
    }

    #[test]
    fn flatten_code_drops_fences() {
        let structure = Structure::detect("```", &EngineOptions::default()).unwrap();
        let block = Block::multi("```rust\nlet x = 1;\n\n```", structure);
        assert_eq!(block.flattened_text(), "let x = 1;");
    }

    #[test]
    fn kind_round_trips_through_str() {
        for kind in [
            MultiLineKind::Quote,
            MultiLineKind::List,
            MultiLineKind::OrderedList,
            MultiLineKind::Checkbox,
            MultiLineKind::Code,
            MultiLineKind::Table,
        ] {
            assert_eq!(kind.as_str().parse::<MultiLineKind>(), Ok(kind));
        }
        assert!("heading".parse::<MultiLineKind>().is_err());
    }
}
