//! Segmentation: split one block's text into homogeneous blocks.

use crate::blocks::prefix::{compatible, first_line, indent_of, line_prefix};
use crate::blocks::{Block, BlockArena, CodeFence, FenceKind, MultiLineKind, Shape, Structure};
use crate::options::EngineOptions;
use crate::span::lines_with_spans;

/// How one text splits: the leading homogeneous part and whatever follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split<'a> {
    pub head: &'a str,
    pub shape: Shape,
    /// Text cut off after `head`, to become the next block.
    pub remainder: Option<&'a str>,
}

/// Splits `text` at its first structural boundary.
///
/// - A fence opener keeps everything through the closing fence.
/// - A structural prefix keeps every following line whose prefix is
///   compatible, stopping at the first line that is not. A table also keeps
///   rows like `|---|---|` that have no space after the pipe. Trailing blank
///   lines after the run are trimmed rather than split off.
/// - Plain text keeps only its first line.
pub fn split_text<'a>(text: &'a str, options: &EngineOptions) -> Split<'a> {
    let first = first_line(text);
    if let Some(fence) = CodeFence::open(first) {
        return split_fence(text, fence, options);
    }

    let Some(structure) = Structure::detect(text, options) else {
        return match text.split_once('\n') {
            Some((head, rest)) => Split {
                head,
                shape: Shape::SingleLine,
                remainder: Some(rest),
            },
            None => Split {
                head: text,
                shape: Shape::SingleLine,
                remainder: None,
            },
        };
    };

    for line in lines_with_spans(text) {
        if compatible(&structure.prefix, line_prefix(line.text))
            || (structure.kind == MultiLineKind::Table && is_table_row(line.text))
        {
            continue;
        }
        let head = &text[..line.span.start.saturating_sub(1)];
        return Split {
            head,
            remainder: non_blank(&text[line.span.start..]),
            shape: Shape::MultiLine(structure),
        };
    }

    Split {
        head: text,
        shape: Shape::MultiLine(structure),
        remainder: None,
    }
}

fn split_fence<'a>(text: &'a str, fence: FenceKind, options: &EngineOptions) -> Split<'a> {
    let shape = Shape::MultiLine(Structure {
        prefix: fence.marker().to_string(),
        kind: MultiLineKind::Code,
        indent_level: options.indent_level(indent_of(first_line(text))),
    });

    for line in lines_with_spans(text).skip(1) {
        if !CodeFence::closes(fence, line.text) {
            continue;
        }
        let remainder = if line.terminated {
            non_blank(&text[line.span.end + 1..])
        } else {
            None
        };
        return Split {
            head: &text[..line.span.end],
            shape,
            remainder,
        };
    }

    // Unterminated fence runs to the end of the text.
    Split {
        head: text,
        shape,
        remainder: None,
    }
}

fn is_table_row(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

fn non_blank(rest: &str) -> Option<&str> {
    (!rest.trim().is_empty()).then_some(rest)
}

/// Blocks produced by segmenting one index, as positions `first..=last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segmented {
    pub first: usize,
    pub last: usize,
}

/// Rewrites the block at `idx` into the minimal homogeneous sequence.
///
/// The block at `idx` keeps its identity; each cut-off remainder is inserted
/// right after as a new block and is itself segmented, until a terminal line
/// is reached.
pub fn segment(blocks: &mut BlockArena, idx: usize, options: &EngineOptions) -> Segmented {
    let mut pending = vec![idx];
    let mut last = idx;

    while let Some(current) = pending.pop() {
        let block = &mut blocks[current];
        let text = block.text().to_string();
        let split = split_text(&text, options);

        block.reshape(split.head, split.shape);
        if let Some(rest) = split.remainder {
            log::trace!("segment: split block {current} after {} bytes", split.head.len());
            blocks.insert(current + 1, Block::single(rest));
            last = current + 1;
            pending.push(current + 1);
        }
    }

    Segmented { first: idx, last }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn opts() -> EngineOptions {
        EngineOptions::default()
    }

    fn segment_all(text: &str) -> Vec<(Option<MultiLineKind>, String)> {
        let mut blocks: BlockArena = std::iter::once(Block::single(text)).collect();
        segment(&mut blocks, 0, &opts());
        blocks
            .iter()
            .map(|b| (b.kind(), b.text().to_string()))
            .collect()
    }

    #[test]
    fn single_line_without_newline_is_terminal() {
        let split = split_text("hello", &opts());
        assert_eq!(split.head, "hello");
        assert_eq!(split.shape, Shape::SingleLine);
        assert_eq!(split.remainder, None);
    }

    #[test]
    fn plain_text_keeps_first_line() {
        let split = split_text("a\nb\nc", &opts());
        assert_eq!(split.head, "a");
        assert_eq!(split.remainder, Some("b\nc"));
    }

    #[test]
    fn one_line_structural_block() {
        let split = split_text("- only", &opts());
        assert_eq!(split.head, "- only");
        assert!(matches!(split.shape, Shape::MultiLine(ref s) if s.kind == MultiLineKind::List));
        assert_eq!(split.remainder, None);
    }

    #[test]
    fn splits_at_first_incompatible_line() {
        let split = split_text("- a\n- b\nplain\n- c", &opts());
        assert_eq!(split.head, "- a\n- b");
        assert_eq!(split.remainder, Some("plain\n- c"));
    }

    #[test]
    fn ordered_markers_stay_together() {
        let split = split_text("1. a\n2. b\n10. c", &opts());
        assert_eq!(split.head, "1. a\n2. b\n10. c");
        assert_eq!(split.remainder, None);
    }

    #[test]
    fn nested_items_use_their_own_indent() {
        let split = split_text("- a\n  - b\n- c", &opts());
        assert_eq!(split.head, "- a\n  - b\n- c");
    }

    #[test]
    fn table_keeps_delimiter_row_without_spaces() {
        let split = split_text("| a | b |\n|---|---|\n| 1 | 2 |\nafter", &opts());
        assert_eq!(split.head, "| a | b |\n|---|---|\n| 1 | 2 |");
        assert_eq!(split.remainder, Some("after"));
    }

    #[test]
    fn trailing_blank_lines_are_trimmed() {
        let split = split_text("> q\n\n  ", &opts());
        assert_eq!(split.head, "> q");
        assert_eq!(split.remainder, None);
    }

    #[test]
    fn fence_runs_to_closing_line() {
        let split = split_text("```rust\n- not a list\n```\nafter", &opts());
        assert_eq!(split.head, "```rust\n- not a list\n```");
        assert_eq!(split.remainder, Some("after"));
    }

    #[test]
    fn unterminated_fence_takes_everything() {
        let split = split_text("~~~\ncode\nmore", &opts());
        assert_eq!(split.head, "~~~\ncode\nmore");
        assert_eq!(split.remainder, None);
    }

    #[rstest]
    #[case("- a\n- b", vec![(Some(MultiLineKind::List), "- a\n- b")])]
    #[case(
        "- item1\nplain text",
        vec![(Some(MultiLineKind::List), "- item1"), (None, "plain text")]
    )]
    #[case(
        "intro\n> q1\n> q2\n1. one\n7. seven",
        vec![
            (None, "intro"),
            (Some(MultiLineKind::Quote), "> q1\n> q2"),
            (Some(MultiLineKind::OrderedList), "1. one\n7. seven"),
        ]
    )]
    #[case(
        "- [ ] todo\n- [x] done\n| a | b |\n| - | - |",
        vec![
            (Some(MultiLineKind::Checkbox), "- [ ] todo\n- [x] done"),
            (Some(MultiLineKind::Table), "| a | b |\n| - | - |"),
        ]
    )]
    #[case(
        "- a\n\n- b",
        vec![
            (Some(MultiLineKind::List), "- a"),
            (None, ""),
            (Some(MultiLineKind::List), "- b"),
        ]
    )]
    fn segments_into_homogeneous_runs(
        #[case] text: &str,
        #[case] expected: Vec<(Option<MultiLineKind>, &str)>,
    ) {
        let expected: Vec<_> = expected
            .into_iter()
            .map(|(kind, text)| (kind, text.to_string()))
            .collect();
        assert_eq!(segment_all(text), expected);
    }

    #[test]
    fn segmented_range_reports_created_blocks() {
        let mut blocks: BlockArena = ["before", "a\nb\nc", "after"]
            .into_iter()
            .map(Block::single)
            .collect();
        let id = blocks[1].id();

        let seg = segment(&mut blocks, 1, &opts());

        assert_eq!(seg, Segmented { first: 1, last: 3 });
        assert_eq!(blocks.len(), 5);
        assert_eq!(blocks[1].id(), id);
        assert_eq!(blocks[4].text(), "after");
    }
}
