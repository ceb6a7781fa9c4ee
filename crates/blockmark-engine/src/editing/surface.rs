use crate::blocks::BlockId;
use crate::editing::{Document, Patch};

/// The host display that shows the document and owns keyboard focus.
///
/// Notifications arrive after the document is fully consistent; a host may
/// defer acting on them until its own refresh cycle.
pub trait DisplaySurface {
    /// The block sequence or a block's text changed.
    fn document_changed(&mut self, document: &Document, patch: &Patch);

    /// Move keyboard focus to the element showing block `id` at `index`.
    fn request_focus(&mut self, index: usize, id: BlockId);
}

/// A surface that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl DisplaySurface for NullSurface {
    fn document_changed(&mut self, _document: &Document, _patch: &Patch) {}

    fn request_focus(&mut self, _index: usize, _id: BlockId) {}
}
