//! Locating structural elements in a markdown string.

use crate::blocks::Block;
use crate::editing::Document;
use crate::parsing::StructuralParser;
use crate::span::{LineRef, Span, lines_with_spans};

/// Byte span of the first block of `markdown` matching `predicate`.
///
/// The string is segmented on its own, independently of any live document.
/// Each block is found in the source by a forward search over whole lines, so
/// the span covers the element as written even when loading dropped blank
/// lines inside it.
pub fn locate_element_span(
    markdown: &str,
    parser: &dyn StructuralParser,
    predicate: impl Fn(&Block) -> bool,
) -> Option<Span> {
    let doc = Document::from_markdown(markdown, parser);
    let mut cursor = 0;

    for block in doc.blocks() {
        let Some(span) = find_block(markdown, block.text(), cursor) else {
            log::warn!("block {} not found in source after byte {cursor}", block.id());
            continue;
        };
        if predicate(block) {
            return Some(span);
        }
        cursor = span.end + 1;
    }
    None
}

/// `(start, end)` of a located span, or `(-1, -1)` when nothing matched.
pub fn offsets(found: Option<Span>) -> (isize, isize) {
    match found {
        Some(span) => (span.start as isize, span.end as isize),
        None => (-1, -1),
    }
}

/// Finds `text` in `source` at or after `cursor`, matching whole lines.
///
/// Each line of the block must equal a source line, in order. Blank source
/// lines between them are skipped, as loading drops those inside a run.
fn find_block(source: &str, text: &str, cursor: usize) -> Option<Span> {
    let lines: Vec<LineRef<'_>> = lines_with_spans(source)
        .filter(|line| line.span.start >= cursor)
        .collect();
    let wanted: Vec<&str> = text.split('\n').collect();

    (0..lines.len()).find_map(|first| match_from(&lines[first..], &wanted))
}

fn match_from(lines: &[LineRef<'_>], wanted: &[&str]) -> Option<Span> {
    let (first, rest) = lines.split_first()?;
    let (&first_wanted, rest_wanted) = wanted.split_first()?;
    if first.text != first_wanted {
        return None;
    }

    let mut end = first.span.end;
    let mut source = rest.iter();
    for &want in rest_wanted {
        let line = source.find(|line| line.text == want || !line.text.trim().is_empty())?;
        if line.text != want {
            return None;
        }
        end = line.span.end;
    }
    Some(Span {
        start: first.span.start,
        end,
    })
}
