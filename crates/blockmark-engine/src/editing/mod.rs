/*!
 * # Editing Core Module
 *
 * The document model and everything that changes it.
 *
 * ## Architecture Overview
 *
 * ### 1. Live text, deferred structure
 * - The focused block's text is mutated freely in place (`Cmd::ReplaceText`,
 *   `Document::set_text`); no structure is derived while it has focus
 * - When focus leaves a block it is reconciled: re-segmented into canonical
 *   blocks and merged with compatible neighbours
 *
 * ### 2. Events and commands
 * - **`BlockEvent`**: the closed set of structural events a block can raise
 * - **`Cmd`**: key-level commands from a host widget, compiled into events or
 *   in-place text edits
 *
 * ### 3. Stable block ids
 * - Every block carries a `BlockId`; focus targets are resolved through merges
 *   by id, never by a cached index
 *
 * ### 4. Display notification
 * - A `DisplaySurface` is told about each change after the document is
 *   consistent again
 *
 * ## Module Structure
 *
 * - **`document`**: `Document`, loading, event dispatch, serialization
 * - **`commands`**: `Cmd` and `Document::apply`
 * - **`events`**: `BlockEvent` and its textual form
 * - **`patch`**: result metadata of an event or command
 * - **`surface`**: the `DisplaySurface` boundary
 *
 * ## Usage Pattern
 *
 * ```rust
 * use blockmark_engine::editing::*;
 * use blockmark_engine::CmarkParser;
 *
 * // 1. Load markdown; the parser is only used to bootstrap blocks
 * let mut doc = Document::from_markdown("# Hello\n\n- Item 1", &CmarkParser::default());
 *
 * // 2. Edit the list block like a widget would
 * doc.apply(Cmd::Click { target: 1 }).unwrap();
 * doc.apply(Cmd::Enter { caret: 8 }).unwrap();
 * doc.apply(Cmd::ReplaceText { text: "- Item 1\n- Item 2".to_string() }).unwrap();
 *
 * // 3. Leaving the block reconciles it
 * doc.apply(Cmd::ArrowUp { caret: 0 }).unwrap();
 *
 * assert_eq!(doc.serialize(), "# Hello\n\n- Item 1\n- Item 2");
 * ```
 */

pub mod commands;
pub mod document;
pub mod events;
pub mod patch;
pub mod surface;

pub use commands::Cmd;
pub use document::Document;
pub use events::BlockEvent;
pub use patch::Patch;
pub use surface::{DisplaySurface, NullSurface};

use crate::parsing::StructuralParser;

/// Loads `markdown` into a new document.
pub fn load_document(markdown: &str, parser: &dyn StructuralParser) -> Document {
    Document::from_markdown(markdown, parser)
}
