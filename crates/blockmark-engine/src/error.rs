/// Errors raised by the document model when a caller breaks its contract.
///
/// Navigation past either end of the document is not an error; those events
/// are absorbed as no-ops by [`crate::Document::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Block index {index} is out of range (document has {len} blocks)")]
    BlockOutOfRange { index: usize, len: usize },
    #[error("Caret {caret} is not on a character boundary")]
    InvalidCaret { caret: usize },
    #[error("No block has focus")]
    NoFocus,
    #[error("Unknown event: {0}")]
    UnknownEvent(String),
    #[error("Unknown block kind: {0}")]
    UnknownKind(String),
}
