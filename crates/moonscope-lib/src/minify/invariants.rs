//! Minifier invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::semantic::VariableId;

#[inline]
pub fn ensure_slot_held(slot: Option<usize>, variable: VariableId) -> usize {
    match slot {
        Some(slot) => slot,
        None => panic!("slot allocator: {:?} released without holding a slot", variable),
    }
}

#[inline]
pub fn assert_slot_not_held(held: bool, variable: VariableId) {
    assert!(
        !held,
        "slot allocator: {:?} allocated twice without release",
        variable
    );
}
