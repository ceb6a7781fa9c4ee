//! # Structural parsing
//!
//! The bootstrap parser turns a markdown string into its top-level structural
//! elements. It is only consulted when a document is loaded; after that the
//! block model is maintained by reconciliation.
//!
//! The parser is a collaborator behind the [`StructuralParser`] trait so the
//! core can be driven by any markdown library. [`CmarkParser`] is the default,
//! backed by pulldown-cmark.

use pulldown_cmark::{Event, Options, Parser, Tag};
use serde::{Deserialize, Serialize};

use crate::blocks::MultiLineKind;
use crate::span::Span;

/// Structural kind of a top-level element, as reported by a parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructuralTag {
    BlockQuote,
    UnorderedList,
    OrderedList,
    TaskList,
    CodeBlock,
    Table,
    Other,
}

impl StructuralTag {
    /// The multi-line type an element of this kind bootstraps into.
    pub fn multi_line_kind(self) -> Option<MultiLineKind> {
        match self {
            StructuralTag::BlockQuote => Some(MultiLineKind::Quote),
            StructuralTag::UnorderedList => Some(MultiLineKind::List),
            StructuralTag::OrderedList => Some(MultiLineKind::OrderedList),
            StructuralTag::TaskList => Some(MultiLineKind::Checkbox),
            StructuralTag::CodeBlock => Some(MultiLineKind::Code),
            StructuralTag::Table => Some(MultiLineKind::Table),
            StructuralTag::Other => None,
        }
    }

    /// Maps a rendered HTML tag name, for parsers that report elements that way.
    pub fn from_tag_name(name: &str, has_checkbox: bool) -> Self {
        match name {
            "blockquote" => StructuralTag::BlockQuote,
            "ul" | "ol" | "li" if has_checkbox => StructuralTag::TaskList,
            "ul" => StructuralTag::UnorderedList,
            "ol" => StructuralTag::OrderedList,
            "pre" | "code" => StructuralTag::CodeBlock,
            "table" => StructuralTag::Table,
            _ => StructuralTag::Other,
        }
    }
}

/// One top-level element of a markdown string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedElement {
    /// Source text of the element, whole lines, without the trailing newline.
    pub raw_text: String,
    /// Byte span of `raw_text` in the source.
    pub span: Span,
    pub tag: StructuralTag,
}

/// Splits markdown into top-level structural elements.
pub trait StructuralParser {
    fn parse(&self, markdown: &str) -> Vec<ParsedElement>;
}

/// Markdown extensions understood by the default parser and renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownExtensions {
    pub tables: bool,
    pub tasklists: bool,
    pub strikethrough: bool,
}

impl Default for MarkdownExtensions {
    fn default() -> Self {
        Self {
            tables: true,
            tasklists: true,
            strikethrough: true,
        }
    }
}

impl MarkdownExtensions {
    pub fn to_options(self) -> Options {
        let mut options = Options::empty();
        if self.tables {
            options.insert(Options::ENABLE_TABLES);
        }
        if self.tasklists {
            options.insert(Options::ENABLE_TASKLISTS);
        }
        if self.strikethrough {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        options
    }
}

/// Default structural parser backed by pulldown-cmark.
#[derive(Debug, Clone, Copy, Default)]
pub struct CmarkParser {
    extensions: MarkdownExtensions,
}

impl CmarkParser {
    pub fn new(extensions: MarkdownExtensions) -> Self {
        Self { extensions }
    }
}

impl StructuralParser for CmarkParser {
    fn parse(&self, markdown: &str) -> Vec<ParsedElement> {
        let mut elements = Vec::new();
        let mut depth = 0usize;
        let mut open: Option<(StructuralTag, std::ops::Range<usize>)> = None;

        for (event, range) in Parser::new_ext(markdown, self.extensions.to_options()).into_offset_iter() {
            match event {
                Event::Start(tag) => {
                    if depth == 0 {
                        open = Some((tag_kind(&tag), range));
                    }
                    depth += 1;
                }
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0
                        && let Some((tag, range)) = open.take()
                    {
                        elements.push(element(markdown, range, tag));
                    }
                }
                Event::TaskListMarker(_) => {
                    if let Some((tag, _)) = open.as_mut()
                        && matches!(tag, StructuralTag::UnorderedList | StructuralTag::OrderedList)
                    {
                        *tag = StructuralTag::TaskList;
                    }
                }
                _ if depth == 0 => elements.push(element(markdown, range, StructuralTag::Other)),
                _ => {}
            }
        }

        elements
    }
}

fn tag_kind(tag: &Tag<'_>) -> StructuralTag {
    match tag {
        Tag::BlockQuote(_) => StructuralTag::BlockQuote,
        Tag::List(None) => StructuralTag::UnorderedList,
        Tag::List(Some(_)) => StructuralTag::OrderedList,
        Tag::CodeBlock(_) => StructuralTag::CodeBlock,
        Tag::Table(_) => StructuralTag::Table,
        _ => StructuralTag::Other,
    }
}

/// Widens `range` to whole lines and drops the trailing line break. Blank
/// lines inside structural elements (loose lists, spaced quotes) are removed;
/// a structural run has no blank lines of its own.
fn element(markdown: &str, range: std::ops::Range<usize>, tag: StructuralTag) -> ParsedElement {
    let start = markdown[..range.start].rfind('\n').map_or(0, |n| n + 1);
    let end = start.max(range.end.min(markdown.len()));
    let text = markdown[start..end].trim_end_matches(['\n', '\r']);
    let span = Span {
        start,
        end: start + text.len(),
    };

    let raw_text = match tag {
        StructuralTag::CodeBlock | StructuralTag::Other => text.to_string(),
        _ => text
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
    };

    ParsedElement {
        raw_text,
        span,
        tag,
    }
}
