//! Slot allocation for minified names.
//!
//! A slot is the index fed to the naming strategy. Slots are owned by
//! variables, not by source positions: a variable read and written at the
//! same place (`x = x + 1`) still holds exactly one slot and releases it
//! exactly once.

use indexmap::IndexMap;

use super::invariants::{assert_slot_not_held, ensure_slot_held};
use crate::semantic::VariableId;

#[derive(Debug, Default)]
pub(crate) struct SlotAllocator {
    free: Vec<bool>,
    held: IndexMap<VariableId, usize>,
}

impl SlotAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowest free slot, now held by `variable`.
    pub fn allocate(&mut self, variable: VariableId) -> usize {
        assert_slot_not_held(self.held.contains_key(&variable), variable);

        let slot = match self.free.iter().position(|free| *free) {
            Some(slot) => {
                self.free[slot] = false;
                slot
            }
            None => {
                self.free.push(false);
                self.free.len() - 1
            }
        };
        self.held.insert(variable, slot);
        slot
    }

    /// Give back the slot held by `variable`. Panics if it holds none.
    pub fn release(&mut self, variable: VariableId) {
        let slot = ensure_slot_held(self.held.swap_remove(&variable), variable);
        self.free[slot] = true;
    }

    pub fn held(&self) -> usize {
        self.held.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(index: usize) -> VariableId {
        VariableId::from_index(index)
    }

    #[test]
    fn lowest_free_slot_is_reused() {
        let mut slots = SlotAllocator::new();
        assert_eq!(slots.allocate(var(0)), 0);
        assert_eq!(slots.allocate(var(1)), 1);
        assert_eq!(slots.allocate(var(2)), 2);

        slots.release(var(1));
        assert_eq!(slots.allocate(var(3)), 1);
        assert_eq!(slots.allocate(var(4)), 3);
        assert_eq!(slots.held(), 4);
    }

    #[test]
    #[should_panic(expected = "released without holding a slot")]
    fn double_release_panics() {
        let mut slots = SlotAllocator::new();
        slots.allocate(var(0));
        slots.release(var(0));
        slots.release(var(0));
    }

    #[test]
    #[should_panic(expected = "allocated twice")]
    fn double_allocation_panics() {
        let mut slots = SlotAllocator::new();
        slots.allocate(var(0));
        slots.allocate(var(0));
    }
}
