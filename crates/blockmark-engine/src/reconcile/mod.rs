//! # Reconciliation
//!
//! Reconciliation runs when focus leaves a block: the block's raw text is
//! re-segmented into canonical blocks (`segment`), and the result is merged
//! with structurally-compatible neighbours (`merge`).
//!
//! Both phases are bounded loops over the arena, never recursion, so the
//! worst case is linear in the number of lines involved.

pub mod merge;
pub mod segment;

pub use merge::{Merged, merge, mergeable};
pub use segment::{Segmented, Split, segment, split_text};

use crate::blocks::{BlockArena, BlockId};
use crate::options::EngineOptions;

/// What a reconciliation pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// First position now holding the reconciled content.
    pub first: usize,
    /// Last position now holding the reconciled content.
    pub last: usize,
    /// Blocks removed by merging, as `(absorbed, survivor)`.
    pub absorbed: Vec<(BlockId, BlockId)>,
}

impl Reconciled {
    /// Follows merges from `id` to the block that now holds its text.
    pub fn resolve(&self, id: BlockId) -> BlockId {
        let mut id = id;
        while let Some(&(_, survivor)) = self.absorbed.iter().find(|(gone, _)| *gone == id) {
            id = survivor;
        }
        id
    }
}

/// Segments the block at `idx`, then merges both ends of the produced run with
/// their neighbours.
///
/// The tail is merged before the head so the head's position stays valid; a
/// split that leaves a structural run at the end can then re-join the
/// original successor as well as the predecessor.
pub fn manage_block(blocks: &mut BlockArena, idx: usize, options: &EngineOptions) -> Reconciled {
    let segmented = segment(blocks, idx, options);
    let head_id = blocks[segmented.first].id();
    let tail_id = blocks[segmented.last].id();

    let mut absorbed = Vec::new();
    if segmented.last != segmented.first {
        absorbed.extend(merge(blocks, segmented.last).absorbed);
    }
    let head = merge(blocks, segmented.first);
    absorbed.extend(head.absorbed);

    let mut reconciled = Reconciled {
        first: head.index,
        last: head.index,
        absorbed,
    };
    let tail = reconciled.resolve(tail_id);
    reconciled.last = blocks.position(tail).unwrap_or(head.index);

    log::debug!(
        "reconciled block {head_id}: {} block(s) at {}..={}, {} merge(s)",
        reconciled.last - reconciled.first + 1,
        reconciled.first,
        reconciled.last,
        reconciled.absorbed.len()
    );
    reconciled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{Block, MultiLineKind, Structure};
    use pretty_assertions::assert_eq;

    fn opts() -> EngineOptions {
        EngineOptions::default()
    }

    fn block(text: &str) -> Block {
        match Structure::detect(text, &opts()) {
            Some(s) => Block::multi(text, s),
            None => Block::single(text),
        }
    }

    fn arena(texts: &[&str]) -> BlockArena {
        texts.iter().map(|t| block(t)).collect()
    }

    fn summary(blocks: &BlockArena) -> Vec<(Option<MultiLineKind>, &str)> {
        blocks.iter().map(|b| (b.kind(), b.text())).collect()
    }

    #[test]
    fn split_then_merge_with_both_neighbours() {
        let mut blocks = arena(&["- z", "plain", "- c"]);
        blocks[1].set_text("- a\nx\n- b");

        let reconciled = manage_block(&mut blocks, 1, &opts());

        assert_eq!(
            summary(&blocks),
            vec![
                (Some(MultiLineKind::List), "- z\n- a"),
                (None, "x"),
                (Some(MultiLineKind::List), "- b\n- c"),
            ]
        );
        assert_eq!(reconciled.first, 0);
        assert_eq!(reconciled.last, 2);
        assert_eq!(reconciled.absorbed.len(), 2);
    }

    #[test]
    fn concatenated_lists_merge_back() {
        let mut blocks = arena(&["- a"]);
        blocks[0].set_text("- a\n- b");
        manage_block(&mut blocks, 0, &opts());
        assert_eq!(summary(&blocks), vec![(Some(MultiLineKind::List), "- a\n- b")]);
    }

    #[test]
    fn reconciling_twice_is_idempotent() {
        let mut blocks = arena(&["> q", "text"]);
        blocks[1].set_text("> more\nline\n1. x\n2. y");

        manage_block(&mut blocks, 1, &opts());
        let once: Vec<_> = blocks.iter().cloned().collect();
        manage_block(&mut blocks, 0, &opts());
        let twice: Vec<_> = blocks.iter().cloned().collect();

        assert_eq!(once, twice);
    }

    #[test]
    fn resolve_follows_merge_chain() {
        let (a, b, c) = (BlockId::new(), BlockId::new(), BlockId::new());
        let reconciled = Reconciled {
            first: 0,
            last: 0,
            absorbed: vec![(c, b), (b, a)],
        };
        assert_eq!(reconciled.resolve(c), a);
        assert_eq!(reconciled.resolve(a), a);
    }
}
