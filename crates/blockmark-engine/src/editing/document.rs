use crate::blocks::prefix::{first_line, indent_of};
use crate::blocks::{Block, BlockArena, BlockId, Shape, Structure};
use crate::editing::{BlockEvent, DisplaySurface, Patch};
use crate::error::EngineError;
use crate::options::EngineOptions;
use crate::parsing::{ParsedElement, StructuralParser};
use crate::reconcile::{Reconciled, manage_block, merge};
use crate::render::HtmlRenderer;

/// The block model of one markdown document.
///
/// Document owns the ordered block sequence and the focus pointer:
///
/// ## 1. Blocks
/// - **Never empty**: an empty document is a single empty single-line block
/// - **Arena-backed**: blocks keep stable ids while positions shift around them
/// - **Merge invariant**: after reconciliation no two compatible multi-line
///   blocks are adjacent
///
/// ## 2. Focus
/// - At most one block holds focus and receives live, unreconciled edits
/// - Focus is stored by id and re-resolved to a position after every event
///
/// ## 3. Events
/// - Structural events go through [`Document::dispatch`]; focus loss runs
///   [`Document::manage_block`] on the block being left
///
/// ## Usage Pattern
///
/// ```rust
/// # use blockmark_engine::{CmarkParser, Document};
/// let mut doc = Document::from_markdown("- item1\n- item2", &CmarkParser::default());
/// assert_eq!(doc.len(), 1);
///
/// doc.set_text(0, "- item1\n- item2\nplain").unwrap();
/// doc.manage_block(0).unwrap();
///
/// assert_eq!(doc.serialize(), "- item1\n- item2\n\nplain");
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) blocks: BlockArena,
    /// Block receiving live edits; `None` during batch operations.
    pub(crate) focus: Option<BlockId>,
    /// Incremented on each change (enables change detection)
    pub(crate) version: u64,
    pub(crate) options: EngineOptions,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document: one empty single-line block, focused.
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> Self {
        let first = Block::single("");
        let focus = Some(first.id());
        Self {
            blocks: std::iter::once(first).collect(),
            focus,
            version: 0,
            options,
        }
    }

    /// Loads `markdown` into a new document with default options.
    pub fn from_markdown(markdown: &str, parser: &dyn StructuralParser) -> Self {
        let mut doc = Self::new();
        doc.load(markdown, parser);
        doc
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Replaces the block sequence with `markdown` and focuses the first block.
    ///
    /// The parser bootstraps one block per top-level element. Structural
    /// elements keep the boundaries and kind the parser gave them and are only
    /// merged with their neighbours; plain elements are segmented line by line.
    pub fn load(&mut self, markdown: &str, parser: &dyn StructuralParser) {
        self.focus = None;
        self.blocks = parser
            .parse(markdown)
            .into_iter()
            .map(|element| self.bootstrap_block(element))
            .collect();
        if self.blocks.is_empty() {
            self.blocks.push(Block::single(""));
        }

        let mut idx = 0;
        while idx < self.blocks.len() {
            idx = if self.blocks[idx].is_multi_line() {
                merge(&mut self.blocks, idx).index + 1
            } else {
                manage_block(&mut self.blocks, idx, &self.options).last + 1
            };
        }

        self.focus = Some(self.blocks[0].id());
        self.version += 1;
        log::debug!("loaded document: {} block(s)", self.blocks.len());
    }

    fn bootstrap_block(&self, element: ParsedElement) -> Block {
        let Some(kind) = element.tag.multi_line_kind() else {
            return Block::single(element.raw_text);
        };
        let structure = match Structure::detect(&element.raw_text, &self.options) {
            Some(detected) => Structure { kind, ..detected },
            None => Structure {
                prefix: String::new(),
                kind,
                indent_level: self
                    .options
                    .indent_level(indent_of(first_line(&element.raw_text))),
            },
        };
        Block::multi(element.raw_text, structure)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.blocks.iter()
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.position(id)
    }

    /// Position of the focused block.
    pub fn focus(&self) -> Option<usize> {
        self.focus.and_then(|id| self.blocks.position(id))
    }

    pub fn focused_block(&self) -> Option<&Block> {
        self.focus().and_then(|idx| self.blocks.get(idx))
    }

    /// Moves focus without reconciling the block that had it.
    pub fn focus_block(&mut self, index: usize) -> Result<(), EngineError> {
        self.focus = Some(self.checked(index)?.id());
        Ok(())
    }

    pub fn clear_focus(&mut self) {
        self.focus = None;
    }

    /// Get the current version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replaces a block's live text. Structure is not touched until the block
    /// is reconciled.
    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> Result<(), EngineError> {
        self.checked(index)?;
        self.blocks[index].set_text(text);
        self.version += 1;
        Ok(())
    }

    /// Segments the block at `index`, then merges the result with its
    /// neighbours.
    pub fn manage_block(&mut self, index: usize) -> Result<Reconciled, EngineError> {
        self.checked(index)?;
        let reconciled = manage_block(&mut self.blocks, index, &self.options);
        self.version += 1;
        Ok(reconciled)
    }

    /// Applies a structural event raised by the block at `index`.
    ///
    /// Navigation past either end, deleting the first block and transforms
    /// whose precondition does not hold are absorbed: the returned patch is a
    /// no-op and the document is unchanged.
    pub fn dispatch(&mut self, index: usize, event: BlockEvent) -> Result<Patch, EngineError> {
        let len = self.checked(index).map(|_| self.blocks.len())?;

        match event {
            BlockEvent::UpdateBlock => Ok(self.edited(index, None)),
            BlockEvent::NewBlock { caret } => self.new_block(index, caret),
            BlockEvent::DeleteBlock if index > 0 => Ok(self.delete_block(index)),
            BlockEvent::OutfocusBlockUp if index > 0 => Ok(self.outfocus(index, index - 1)),
            BlockEvent::OutfocusBlockDown if index + 1 < len => Ok(self.outfocus_down(index)),
            BlockEvent::OutfocusClicked { target } => {
                self.checked(target)?;
                if target == index {
                    return Ok(self.absorbed(index, event));
                }
                Ok(self.outfocus(index, target))
            }
            BlockEvent::TransformMulti { kind } if !self.blocks[index].is_multi_line() => {
                let block = &mut self.blocks[index];
                let text = block.text().to_string();
                let structure = Structure {
                    prefix: block.detected_prefix().to_string(),
                    kind,
                    indent_level: self.options.indent_level(indent_of(first_line(&text))),
                };
                block.reshape(text, Shape::MultiLine(structure));
                Ok(self.edited(index, None))
            }
            BlockEvent::TransformSingle if self.blocks[index].is_multi_line() => {
                let block = &mut self.blocks[index];
                let flat = block.flattened_text();
                block.reshape(flat, Shape::SingleLine);
                Ok(self.edited(index, None))
            }
            BlockEvent::DeleteBlock
            | BlockEvent::OutfocusBlockUp
            | BlockEvent::OutfocusBlockDown
            | BlockEvent::TransformMulti { .. }
            | BlockEvent::TransformSingle => Ok(self.absorbed(index, event)),
        }
    }

    /// [`Document::dispatch`], then tells `surface` about the change.
    pub fn dispatch_and_notify(
        &mut self,
        index: usize,
        event: BlockEvent,
        surface: &mut dyn DisplaySurface,
    ) -> Result<Patch, EngineError> {
        let patch = self.dispatch(index, event)?;
        self.notify(&patch, surface);
        Ok(patch)
    }

    pub(crate) fn notify(&self, patch: &Patch, surface: &mut dyn DisplaySurface) {
        surface.document_changed(self, patch);
        if let Some(focus) = patch.focus
            && let Some(block) = self.blocks.get(focus)
        {
            surface.request_focus(focus, block.id());
        }
    }

    /// The full markdown text: every block in order, joined by the block
    /// separator. The focused block contributes its live text.
    pub fn serialize(&self) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join(&self.options.block_separator)
    }

    /// HTML for each block, in order.
    pub fn render_blocks(&self, renderer: &dyn HtmlRenderer) -> Vec<String> {
        self.blocks.iter().map(|b| renderer.render(b.text())).collect()
    }

    fn new_block(&mut self, index: usize, caret: usize) -> Result<Patch, EngineError> {
        let text = self.blocks[index].text();
        let caret = caret.min(text.len());
        if !text.is_char_boundary(caret) {
            return Err(EngineError::InvalidCaret { caret });
        }
        let (head, tail) = text.split_at(caret);
        let (head, tail) = (head.to_string(), tail.to_string());

        self.blocks[index].set_text(head);
        let created = Block::single(tail);
        let created_id = created.id();
        self.blocks.insert(index + 1, created);

        let reconciled = manage_block(&mut self.blocks, index, &self.options);
        self.focus = Some(created_id);
        let focus = self.blocks.position(created_id);
        self.version += 1;

        Ok(Patch {
            changed: vec![reconciled.first..focus.unwrap_or(reconciled.last) + 1],
            focus,
            caret: Some(0),
            version: self.version,
        })
    }

    fn delete_block(&mut self, index: usize) -> Patch {
        let removed = self.blocks.remove(index);
        let prev = &mut self.blocks[index - 1];
        let caret = prev.text().len();
        let joined = format!("{}{}", prev.text(), removed.text());
        prev.set_text(joined);
        self.focus = Some(prev.id());
        self.version += 1;

        Patch {
            changed: vec![index - 1..index],
            focus: Some(index - 1),
            caret: Some(caret),
            version: self.version,
        }
    }

    fn outfocus(&mut self, index: usize, target: usize) -> Patch {
        let target_id = self.blocks[target].id();
        let reconciled = manage_block(&mut self.blocks, index, &self.options);
        let focus_id = reconciled.resolve(target_id);
        self.refocus(&reconciled, focus_id)
    }

    /// Moving down lands on the block after the one now holding the left
    /// block's first line, so lines split off its end are visited next.
    fn outfocus_down(&mut self, index: usize) -> Patch {
        let reconciled = manage_block(&mut self.blocks, index, &self.options);
        let target = (reconciled.first + 1).min(self.blocks.len() - 1);
        let focus_id = self.blocks[target].id();
        self.refocus(&reconciled, focus_id)
    }

    fn refocus(&mut self, reconciled: &Reconciled, focus_id: BlockId) -> Patch {
        self.focus = Some(focus_id);
        self.version += 1;

        Patch {
            changed: vec![reconciled.first..reconciled.last + 1],
            focus: self.blocks.position(focus_id),
            caret: None,
            version: self.version,
        }
    }

    /// A patch for an in-place change of the block at `index`.
    pub(crate) fn edited(&mut self, index: usize, caret: Option<usize>) -> Patch {
        self.version += 1;
        Patch {
            changed: vec![index..index + 1],
            focus: self.focus(),
            caret,
            version: self.version,
        }
    }

    pub(crate) fn absorbed(&self, index: usize, event: impl std::fmt::Debug) -> Patch {
        log::debug!("{event:?} at block {index} absorbed");
        Patch {
            changed: Vec::new(),
            focus: self.focus(),
            caret: None,
            version: self.version,
        }
    }

    pub(crate) fn checked(&self, index: usize) -> Result<&Block, EngineError> {
        self.blocks.get(index).ok_or(EngineError::BlockOutOfRange {
            index,
            len: self.blocks.len(),
        })
    }
}
