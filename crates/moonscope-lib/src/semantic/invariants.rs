//! Scope builder invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use super::ScopeId;

#[inline]
pub fn ensure_current_scope(scope: Option<&ScopeId>) -> ScopeId {
    match scope {
        Some(scope) => *scope,
        None => panic!("scope builder: scope stack is empty (Global scope was popped early)"),
    }
}

#[inline]
pub fn assert_scope_closed(expected: ScopeId, popped: Option<ScopeId>) {
    assert_eq!(
        popped,
        Some(expected),
        "scope builder: closing {:?} but the innermost open scope is {:?}",
        expected,
        popped
    );
}

#[inline]
pub fn ensure_scope_stack_empty(stack: &[ScopeId]) {
    assert!(
        stack.is_empty(),
        "scope builder: {} scopes left open after the walk",
        stack.len()
    );
}

#[inline]
pub fn ensure_loop_frame(frame: Option<&mut u32>) -> &mut u32 {
    match frame {
        Some(frame) => frame,
        None => panic!("scope builder: loop outside any function or file frame"),
    }
}

/// A pending label leaving a block cannot meet a same-named label in the
/// parent: a `goto` in the block would have resolved to it.
#[inline]
pub fn assert_label_slot_free(occupied: bool, name: &str) {
    assert!(
        !occupied,
        "scope builder: pending label `{}` collides with a label of the enclosing scope",
        name
    );
}
