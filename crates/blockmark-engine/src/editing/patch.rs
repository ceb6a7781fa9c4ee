/// Result of applying an event or command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Block positions (after the edit) whose text or shape changed.
    pub changed: Vec<std::ops::Range<usize>>,
    /// Position of the focused block after the edit.
    pub focus: Option<usize>,
    /// Caret inside the focused block, when the edit moved it.
    pub caret: Option<usize>,
    pub version: u64,
}

impl Patch {
    /// True when the event was absorbed without touching the document.
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}
