pub mod blocks;
pub mod editing;
pub mod error;
pub mod io;
pub mod locate;
pub mod options;
pub mod parsing;
pub mod reconcile;
pub mod render;
pub mod span;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use blocks::{Block, BlockId, MultiLineKind, Shape, Structure};
pub use editing::{BlockEvent, Cmd, DisplaySurface, Document, NullSurface, Patch, load_document};
pub use error::EngineError;
pub use io::*;
pub use locate::{locate_element_span, offsets};
pub use options::EngineOptions;
pub use parsing::{CmarkParser, MarkdownExtensions, ParsedElement, StructuralParser, StructuralTag};
pub use reconcile::{Reconciled, manage_block};
pub use render::{CmarkRenderer, HtmlRenderer, Stylesheet};
pub use span::Span;
