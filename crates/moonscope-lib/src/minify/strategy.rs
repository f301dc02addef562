//! Naming strategies for minification.

use indexmap::IndexSet;

use crate::semantic::ScopeId;

/// Produces candidate names for a variable occupying `slot`.
///
/// The minifier calls `candidate` with `attempt = 0, 1, 2, …` until the
/// result is a valid identifier that is not in `taken`. Implementations must
/// never return the same candidate for two attempts of one slot, otherwise
/// the search may not terminate.
pub trait NamingStrategy {
    fn candidate(&self, slot: usize, attempt: usize, scope: ScopeId, taken: &IndexSet<String>) -> String;
}

/// `a`, `b`, …, `z`, `aa`, `ab`, …; collisions fall back to `_b`, `__b`, ….
#[derive(Debug, Clone, Copy, Default)]
pub struct Alphabetical;

impl NamingStrategy for Alphabetical {
    fn candidate(&self, slot: usize, attempt: usize, _scope: ScopeId, _taken: &IndexSet<String>) -> String {
        format!("{}{}", "_".repeat(attempt), letters(slot))
    }
}

/// `_0`, `_1`, …; collisions fall back to `__0`, `___0`, ….
#[derive(Debug, Clone, Copy, Default)]
pub struct Numerical;

impl NamingStrategy for Numerical {
    fn candidate(&self, slot: usize, attempt: usize, _scope: ScopeId, _taken: &IndexSet<String>) -> String {
        format!("{}_{}", "_".repeat(attempt), slot)
    }
}

/// Bijective base-26: 0 is `a`, 25 is `z`, 26 is `aa`.
fn letters(mut n: usize) -> String {
    let mut digits = Vec::new();
    loop {
        digits.push(char::from(b'a' + (n % 26) as u8));
        n /= 26;
        if n == 0 {
            break;
        }
        n -= 1;
    }
    digits.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::GLOBAL_SCOPE;

    fn alphabetical(slot: usize, attempt: usize) -> String {
        Alphabetical.candidate(slot, attempt, GLOBAL_SCOPE, &IndexSet::new())
    }

    #[test]
    fn letters_are_bijective_base_26() {
        assert_eq!(letters(0), "a");
        assert_eq!(letters(25), "z");
        assert_eq!(letters(26), "aa");
        assert_eq!(letters(27), "ab");
        assert_eq!(letters(26 + 26 * 26), "aaa");
    }

    #[test]
    fn alphabetical_attempts_grow() {
        assert_eq!(alphabetical(1, 0), "b");
        assert_eq!(alphabetical(1, 1), "_b");
        assert_eq!(alphabetical(1, 3), "___b");
    }

    #[test]
    fn numerical_attempts_grow() {
        let taken = IndexSet::new();
        assert_eq!(Numerical.candidate(0, 0, GLOBAL_SCOPE, &taken), "_0");
        assert_eq!(Numerical.candidate(12, 0, GLOBAL_SCOPE, &taken), "_12");
        assert_eq!(Numerical.candidate(12, 2, GLOBAL_SCOPE, &taken), "___12");
    }
}
