//! Merge: absorb adjacent compatible multi-line blocks.

use crate::blocks::prefix::compatible;
use crate::blocks::{Block, BlockArena, BlockId};

/// Result of merging around one index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    /// Position of the surviving block.
    pub index: usize,
    /// `(absorbed, survivor)` pairs in the order the merges happened.
    pub absorbed: Vec<(BlockId, BlockId)>,
}

/// Whether `b` may be absorbed into `a` (or `a` into `b`).
///
/// Both must be multi-line, mergeable, and have compatible prefixes; a
/// single-line block is always a boundary.
pub fn mergeable(a: &Block, b: &Block) -> bool {
    match (a.structure(), b.structure()) {
        (Some(a), Some(b)) => {
            a.kind.is_mergeable() && b.kind.is_mergeable() && compatible(&a.prefix, &b.prefix)
        }
        _ => false,
    }
}

/// Absorbs neighbours into the block at `idx`, first backwards then forwards.
///
/// Merging backwards moves the current block's text onto the end of its
/// predecessor, which survives; merging forwards pulls the successor's text in.
pub fn merge(blocks: &mut BlockArena, mut idx: usize) -> Merged {
    let mut absorbed = Vec::new();

    while idx > 0 && idx < blocks.len() && mergeable(&blocks[idx - 1], &blocks[idx]) {
        let current = blocks.remove(idx);
        idx -= 1;
        let survivor = &mut blocks[idx];
        survivor.append_line(current.text());
        log::trace!("merge: block {} absorbed into predecessor", current.id());
        absorbed.push((current.id(), survivor.id()));
    }

    while idx + 1 < blocks.len() && mergeable(&blocks[idx], &blocks[idx + 1]) {
        let next = blocks.remove(idx + 1);
        let survivor = &mut blocks[idx];
        survivor.append_line(next.text());
        log::trace!("merge: successor {} absorbed", next.id());
        absorbed.push((next.id(), survivor.id()));
    }

    Merged {
        index: idx,
        absorbed,
    }
}
