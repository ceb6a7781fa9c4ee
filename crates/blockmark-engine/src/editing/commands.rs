use crate::blocks::prefix::{content_after_prefix, indent_of, line_prefix};
use crate::blocks::{MultiLineKind, Structure};
use crate::editing::{BlockEvent, Document, Patch};
use crate::error::EngineError;
use crate::span::{line_at, lines_with_spans};

/// Key-level edits on the focused block.
///
/// A host's editing widget translates its keystrokes into these; the document
/// compiles each into an in-place text edit or a [`BlockEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// The widget's current text for the focused block.
    ReplaceText { text: String },
    Enter { caret: usize },
    Backspace { caret: usize },
    Tab { caret: usize },
    ArrowUp { caret: usize },
    ArrowDown { caret: usize },
    Click { target: usize },
}

impl Document {
    /// Applies `cmd` to the focused block.
    ///
    /// Commands that only make sense in some positions (Backspace away from
    /// the start, arrows away from the first/last line, Tab on a single line)
    /// return a no-op patch; the widget handles the key itself.
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EngineError> {
        let index = self.focus().ok_or(EngineError::NoFocus)?;

        match cmd {
            Cmd::ReplaceText { text } => {
                self.blocks[index].set_text(text);
                self.dispatch(index, BlockEvent::UpdateBlock)
            }
            Cmd::Enter { caret } => self.enter(index, caret),
            Cmd::Backspace { caret: 0 } => self.dispatch(index, BlockEvent::DeleteBlock),
            Cmd::Tab { caret } => self.tab(index, caret),
            Cmd::ArrowUp { caret } if line_at(self.blocks[index].text(), caret) == 0 => {
                self.dispatch(index, BlockEvent::OutfocusBlockUp)
            }
            Cmd::ArrowDown { caret } if self.on_last_line(index, caret) => {
                self.dispatch(index, BlockEvent::OutfocusBlockDown)
            }
            Cmd::Click { target } => self.dispatch(index, BlockEvent::OutfocusClicked { target }),
            cmd @ (Cmd::Backspace { .. } | Cmd::ArrowUp { .. } | Cmd::ArrowDown { .. }) => {
                Ok(self.absorbed(index, cmd))
            }
        }
    }

    fn on_last_line(&self, index: usize, caret: usize) -> bool {
        let block = &self.blocks[index];
        line_at(block.text(), caret) + 1 == block.line_count()
    }

    /// Enter continues a structural run with a new prefixed line, ends it on an
    /// empty item, and splits a single-line block.
    fn enter(&mut self, index: usize, caret: usize) -> Result<Patch, EngineError> {
        let block = &self.blocks[index];
        let Some(structure) = block.structure() else {
            return self.dispatch(index, BlockEvent::NewBlock { caret });
        };
        let text = block.text();
        let caret = caret.min(text.len());
        if !text.is_char_boundary(caret) {
            return Err(EngineError::InvalidCaret { caret });
        }

        let line = lines_with_spans(text)
            .nth(line_at(text, caret))
            .map_or("", |line| line.text);

        if caret == text.len() && is_empty_item(line, structure.kind) {
            let kept = text[..text.len() - line.len()]
                .strip_suffix('\n')
                .unwrap_or("")
                .to_string();
            let end = kept.len();
            self.blocks[index].set_text(kept);
            return self.dispatch(index, BlockEvent::NewBlock { caret: end });
        }

        let continuation = continuation(structure, line);
        let mut edited = text.to_string();
        edited.insert_str(caret, &continuation);
        self.blocks[index].set_text(edited);
        Ok(self.edited(index, Some(caret + continuation.len())))
    }

    /// Tab indents the caret's line by one indent width. The first line of a
    /// run is never indented.
    fn tab(&mut self, index: usize, caret: usize) -> Result<Patch, EngineError> {
        let block = &self.blocks[index];
        let line = line_at(block.text(), caret);
        if !block.is_multi_line() || line == 0 {
            return Ok(self.absorbed(index, Cmd::Tab { caret }));
        }

        let start = lines_with_spans(block.text())
            .nth(line)
            .map_or(0, |l| l.span.start);
        let width = self.options.indent_width;
        let mut text = block.text().to_string();
        text.insert_str(start, &" ".repeat(width));
        self.blocks[index].set_text(text);
        Ok(self.edited(index, Some(caret + width)))
    }
}

/// The text Enter inserts to open the next line of a structural run.
fn continuation(structure: &Structure, line: &str) -> String {
    let indent = " ".repeat(indent_of(line));
    let marker = match line_prefix(line) {
        "" => structure.prefix.as_str(),
        p => p,
    };
    match structure.kind {
        MultiLineKind::Code => format!("\n{indent}"),
        MultiLineKind::OrderedList => format!("\n{indent}{} ", next_ordinal(marker)),
        MultiLineKind::Checkbox => format!("\n{indent}{marker} [ ] "),
        MultiLineKind::Quote | MultiLineKind::List | MultiLineKind::Table => {
            format!("\n{indent}{marker} ")
        }
    }
}

fn next_ordinal(marker: &str) -> String {
    marker
        .strip_suffix('.')
        .and_then(|n| n.parse::<u64>().ok())
        .map_or_else(|| marker.to_string(), |n| format!("{}.", n + 1))
}

/// A line holding only its indentation, marker and (for task lists) an empty
/// task box.
fn is_empty_item(line: &str, kind: MultiLineKind) -> bool {
    if kind == MultiLineKind::Code {
        return false;
    }
    let marker = line_prefix(line);
    if marker.is_empty() {
        return false;
    }
    let content = content_after_prefix(line, marker).trim();
    content.is_empty() || (kind == MultiLineKind::Checkbox && matches!(content, "[ ]" | "[x]" | "[X]"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{doc, summary};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn focused_text(doc: &Document) -> &str {
        doc.focused_block().map_or("", |b| b.text())
    }

    #[rstest]
    #[case("- a", "- a\n- ")]
    #[case("> a", "> a\n> ")]
    #[case("1. a", "1. a\n2. ")]
    #[case("9. a", "9. a\n10. ")]
    #[case("- [x] a", "- [x] a\n- [ ] ")]
    #[case("| a |\n| - |", "| a |\n| - |\n| ")]
    fn enter_continues_run(#[case] text: &str, #[case] expected: &str) {
        let mut doc = doc(text);
        let patch = doc.apply(Cmd::Enter { caret: text.len() }).unwrap();

        assert_eq!(focused_text(&doc), expected);
        assert_eq!(patch.caret, Some(expected.len()));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn enter_keeps_nested_indent() {
        let mut doc = doc("- a\n  - b");
        doc.apply(Cmd::Enter { caret: 9 }).unwrap();
        assert_eq!(focused_text(&doc), "- a\n  - b\n  - ");
    }

    #[test]
    fn enter_in_middle_of_item() {
        let mut doc = doc("- ab");
        let patch = doc.apply(Cmd::Enter { caret: 3 }).unwrap();
        assert_eq!(focused_text(&doc), "- a\n- b");
        assert_eq!(patch.caret, Some(6));
    }

    #[test]
    fn enter_on_empty_item_ends_the_run() {
        let mut doc = doc("- a");
        doc.apply(Cmd::Enter { caret: 3 }).unwrap();
        doc.apply(Cmd::Enter { caret: 6 }).unwrap();

        assert_eq!(
            summary(&doc),
            vec![(Some(MultiLineKind::List), "- a"), (None, "")]
        );
        assert_eq!(doc.focus(), Some(1));
    }

    #[test]
    fn enter_in_code_inserts_plain_line() {
        let mut doc = doc("```\nlet x = 1;\n```");
        doc.apply(Cmd::Enter { caret: 14 }).unwrap();
        assert_eq!(focused_text(&doc), "```\nlet x = 1;\n\n```");
    }

    #[test]
    fn enter_on_single_line_splits() {
        let mut doc = doc("helloworld");
        doc.apply(Cmd::Enter { caret: 5 }).unwrap();
        assert_eq!(summary(&doc), vec![(None, "hello"), (None, "world")]);
        assert_eq!(doc.focus(), Some(1));
    }

    #[test]
    fn backspace_at_start_deletes_block() {
        let mut doc = doc("one\n\ntwo");
        doc.apply(Cmd::Click { target: 1 }).unwrap();
        let patch = doc.apply(Cmd::Backspace { caret: 0 }).unwrap();

        assert_eq!(summary(&doc), vec![(None, "onetwo")]);
        assert_eq!(patch.caret, Some(3));
    }

    #[test]
    fn backspace_inside_text_is_left_to_the_widget() {
        let mut doc = doc("one");
        assert!(doc.apply(Cmd::Backspace { caret: 2 }).unwrap().is_noop());
    }

    #[test]
    fn tab_indents_caret_line() {
        let mut doc = doc("- a\n- b");
        let patch = doc.apply(Cmd::Tab { caret: 5 }).unwrap();
        assert_eq!(focused_text(&doc), "- a\n  - b");
        assert_eq!(patch.caret, Some(7));
    }

    #[test]
    fn tab_never_indents_first_line() {
        let mut doc = doc("- a\n- b");
        assert!(doc.apply(Cmd::Tab { caret: 1 }).unwrap().is_noop());
        assert_eq!(focused_text(&doc), "- a\n- b");
    }

    #[test]
    fn arrows_leave_block_only_from_edge_lines() {
        let mut doc = doc("- a\n- b\n\nafter");

        assert!(doc.apply(Cmd::ArrowDown { caret: 1 }).unwrap().is_noop());
        assert_eq!(doc.focus(), Some(0));

        doc.apply(Cmd::ArrowDown { caret: 6 }).unwrap();
        assert_eq!(doc.focus(), Some(1));

        doc.apply(Cmd::ArrowUp { caret: 0 }).unwrap();
        assert_eq!(doc.focus(), Some(0));
    }

    #[test]
    fn replace_text_is_live_until_focus_leaves() {
        let mut doc = doc("a\n\nb");
        doc.apply(Cmd::ReplaceText {
            text: "- x\n- y\nz".to_string(),
        })
        .unwrap();
        assert_eq!(doc.len(), 2);

        doc.apply(Cmd::Click { target: 1 }).unwrap();
        assert_eq!(
            summary(&doc),
            vec![
                (Some(MultiLineKind::List), "- x\n- y"),
                (None, "z"),
                (None, "b"),
            ]
        );
        assert_eq!(focused_text(&doc), "b");
    }

    #[test]
    fn commands_need_focus() {
        let mut doc = doc("a");
        doc.clear_focus();
        assert_eq!(
            doc.apply(Cmd::Enter { caret: 0 }),
            Err(EngineError::NoFocus)
        );
    }

    #[rstest]
    #[case("- ", MultiLineKind::List, true)]
    #[case("  - ", MultiLineKind::List, true)]
    #[case("- [ ] ", MultiLineKind::Checkbox, true)]
    #[case("3.", MultiLineKind::OrderedList, true)]
    #[case("- a", MultiLineKind::List, false)]
    #[case("", MultiLineKind::Code, false)]
    #[case("plain", MultiLineKind::Quote, false)]
    fn empty_item_detection(#[case] line: &str, #[case] kind: MultiLineKind, #[case] expected: bool) {
        assert_eq!(is_empty_item(line, kind), expected);
    }
}
