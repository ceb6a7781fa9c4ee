/// Which delimiter opened a fenced code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

impl FenceKind {
    /// The literal marker that opens and closes this fence.
    pub fn marker(self) -> &'static str {
        match self {
            FenceKind::Backticks => CodeFence::BACKTICKS,
            FenceKind::Tildes => CodeFence::TILDES,
        }
    }

    fn delimiter(self) -> char {
        match self {
            FenceKind::Backticks => '`',
            FenceKind::Tildes => '~',
        }
    }
}

/// Code fence syntax knowledge. Fence lines are the only structural lines
/// that are not recognised by a space-terminated prefix.
pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";
    pub const TILDES: &'static str = "~~~";

    /// Returns the fence kind if `line` (after leading spaces) opens a fence.
    pub fn open(line: &str) -> Option<FenceKind> {
        let t = line.trim_start_matches(' ').trim_end_matches('\r');
        if t.starts_with(Self::BACKTICKS) {
            Some(FenceKind::Backticks)
        } else if t.starts_with(Self::TILDES) {
            Some(FenceKind::Tildes)
        } else {
            None
        }
    }

    /// A closing fence is the opening marker (or longer) with no info string.
    pub fn closes(kind: FenceKind, line: &str) -> bool {
        let t = line.trim();
        t.starts_with(kind.marker()) && t.chars().all(|c| c == kind.delimiter())
    }

    /// Whether `prefix` is one of the fence markers.
    pub fn is_marker(prefix: &str) -> bool {
        prefix == Self::BACKTICKS || prefix == Self::TILDES
    }
}
