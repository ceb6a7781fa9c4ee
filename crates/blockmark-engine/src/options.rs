use serde::{Deserialize, Serialize};

/// Layout settings shared by segmentation, editing commands and serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Spaces per indent level of a multi-line block.
    pub indent_width: usize,
    /// Text placed between blocks when the document is serialized.
    pub block_separator: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            indent_width: 2,
            block_separator: "\n\n".to_string(),
        }
    }
}

impl EngineOptions {
    /// Indent level for a line starting with `spaces` spaces.
    pub fn indent_level(&self, spaces: usize) -> usize {
        if self.indent_width == 0 {
            0
        } else {
            spaces / self.indent_width
        }
    }
}
