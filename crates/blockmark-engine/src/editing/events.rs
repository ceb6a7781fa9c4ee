use std::str::FromStr;

use crate::blocks::MultiLineKind;
use crate::error::EngineError;

/// Structural events raised by the focused block's editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockEvent {
    /// Text was mutated in place; no structural change.
    UpdateBlock,
    /// Split the block at `caret` and focus the second half.
    NewBlock { caret: usize },
    /// Fold the block into its predecessor.
    DeleteBlock,
    OutfocusBlockUp,
    OutfocusBlockDown,
    /// Another block was clicked; `target` is its position before reconciliation.
    OutfocusClicked { target: usize },
    TransformMulti { kind: MultiLineKind },
    TransformSingle,
}

impl FromStr for BlockEvent {
    type Err = EngineError;

    /// Parses the textual form used by editing scripts, e.g. `new 5`,
    /// `click 2`, `multi quote`, `up`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || EngineError::UnknownEvent(s.to_string());
        let mut words = s.split_whitespace();
        let name = words.next().ok_or_else(unknown)?;
        let arg = words.next();
        if words.next().is_some() {
            return Err(unknown());
        }
        let number = |arg: Option<&str>| {
            arg.and_then(|a| a.parse::<usize>().ok())
                .ok_or_else(unknown)
        };

        match (name, arg) {
            ("update", None) => Ok(BlockEvent::UpdateBlock),
            ("new", _) => Ok(BlockEvent::NewBlock {
                caret: number(arg)?,
            }),
            ("delete", None) => Ok(BlockEvent::DeleteBlock),
            ("up", None) => Ok(BlockEvent::OutfocusBlockUp),
            ("down", None) => Ok(BlockEvent::OutfocusBlockDown),
            ("click", _) => Ok(BlockEvent::OutfocusClicked {
                target: number(arg)?,
            }),
            ("multi", Some(kind)) => Ok(BlockEvent::TransformMulti {
                kind: kind.parse().map_err(|_| unknown())?,
            }),
            ("single", None) => Ok(BlockEvent::TransformSingle),
            _ => Err(unknown()),
        }
    }
}
