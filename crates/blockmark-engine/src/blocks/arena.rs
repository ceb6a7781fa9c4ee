use std::ops::{Index, IndexMut};

use super::{Block, BlockId};

/// Block storage with stable slots.
///
/// Blocks live in slots that never move; the document order is a separate
/// list of slot numbers. Insertion and removal only touch the order list, so
/// a position shifts by exactly one per insert/remove before it.
#[derive(Debug, Clone, Default)]
pub struct BlockArena {
    slots: Vec<Option<Block>>,
    free: Vec<usize>,
    order: Vec<usize>,
}

impl BlockArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        let slot = *self.order.get(index)?;
        self.slots[slot].as_ref()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Block> {
        let slot = *self.order.get(index)?;
        self.slots[slot].as_mut()
    }

    /// Blocks in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Block> + '_ {
        self.order
            .iter()
            .filter_map(move |&slot| self.slots[slot].as_ref())
    }

    pub fn push(&mut self, block: Block) {
        let slot = self.alloc(block);
        self.order.push(slot);
    }

    /// Inserts `block` so that it ends up at position `index`.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, block: Block) {
        let slot = self.alloc(block);
        self.order.insert(index, slot);
    }

    /// Removes and returns the block at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Block {
        let slot = self.order.remove(index);
        self.free.push(slot);
        self.slots[slot]
            .take()
            .unwrap_or_else(|| unreachable!("ordered slot {slot} is always occupied"))
    }

    /// Current position of the block with `id`.
    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.order
            .iter()
            .position(|&slot| self.slots[slot].as_ref().is_some_and(|b| b.id() == id))
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.order.clear();
    }

    fn alloc(&mut self, block: Block) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(block);
                slot
            }
            None => {
                self.slots.push(Some(block));
                self.slots.len() - 1
            }
        }
    }
}

impl Index<usize> for BlockArena {
    type Output = Block;

    fn index(&self, index: usize) -> &Block {
        self.get(index)
            .unwrap_or_else(|| panic!("block index {index} out of bounds"))
    }
}

impl IndexMut<usize> for BlockArena {
    fn index_mut(&mut self, index: usize) -> &mut Block {
        self.get_mut(index)
            .unwrap_or_else(|| panic!("block index {index} out of bounds"))
    }
}

impl FromIterator<Block> for BlockArena {
    fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
        let mut arena = Self::new();
        for block in iter {
            arena.push(block);
        }
        arena
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(arena: &BlockArena) -> Vec<&str> {
        arena.iter().map(Block::text).collect()
    }

    #[test]
    fn insert_and_remove_keep_order() {
        let mut arena: BlockArena = ["a", "c"].into_iter().map(Block::single).collect();
        arena.insert(1, Block::single("b"));
        assert_eq!(texts(&arena), vec!["a", "b", "c"]);

        let removed = arena.remove(0);
        assert_eq!(removed.text(), "a");
        assert_eq!(texts(&arena), vec!["b", "c"]);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut arena: BlockArena = ["a", "b"].into_iter().map(Block::single).collect();
        arena.remove(1);
        arena.push(Block::single("z"));
        assert_eq!(arena.slots.len(), 2);
        assert_eq!(texts(&arena), vec!["a", "z"]);
    }

    #[test]
    fn position_tracks_identity() {
        let mut arena: BlockArena = ["a", "b", "c"].into_iter().map(Block::single).collect();
        let id = arena[2].id();
        arena.remove(0);
        assert_eq!(arena.position(id), Some(1));
        assert_eq!(arena.position(BlockId::new()), None);
    }

    #[test]
    fn out_of_range_get_is_none() {
        let arena = BlockArena::new();
        assert!(arena.get(0).is_none());
        assert!(arena.is_empty());
    }
}
