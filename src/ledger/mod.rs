//! Linear undo/redo history
//!
//! A [`Ledger`] is the past/present/future triple behind undo and redo for a
//! single value. History is linear: committing a new value after an undo
//! drops the redo branch.

mod debounce;

pub use debounce::{DEFAULT_QUIET_PERIOD, DebouncedField};

use std::collections::VecDeque;

/// Undo/redo ledger over one value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger<T> {
    /// Prior values, oldest first
    past: Vec<T>,
    present: T,
    /// Values available for redo, nearest first
    future: VecDeque<T>,
}

impl<T: Clone + PartialEq> Ledger<T> {
    pub fn new(initial: T) -> Self {
        Self {
            past: Vec::new(),
            present: initial,
            future: VecDeque::new(),
        }
    }

    /// Commit a new value. Committing the current value is a no-op.
    pub fn set(&mut self, value: T) {
        if value == self.present {
            return;
        }
        let previous = std::mem::replace(&mut self.present, value);
        self.past.push(previous);
        self.future.clear();
    }

    /// Step back one value. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let replaced = std::mem::replace(&mut self.present, previous);
        self.future.push_front(replaced);
        true
    }

    /// Step forward one value. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let replaced = std::mem::replace(&mut self.present, next);
        self.past.push(replaced);
        true
    }

    /// Drop all history and start over from `initial`
    pub fn reset(&mut self, initial: T) {
        self.past.clear();
        self.future.clear();
        self.present = initial;
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past(&self) -> &[T] {
        &self.past
    }

    pub fn future(&self) -> impl Iterator<Item = &T> {
        self.future.iter()
    }
}

impl<T: Clone + PartialEq + Default> Default for Ledger<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_set_same_value_is_noop() {
        let mut ledger = Ledger::new("a");
        ledger.set("a");
        assert!(!ledger.can_undo());
        assert_eq!(*ledger.present(), "a");
    }

    #[test]
    fn test_undo_redo_on_empty_history() {
        let mut ledger = Ledger::new(1);
        assert!(!ledger.undo());
        assert!(!ledger.redo());
        assert_eq!(*ledger.present(), 1);
    }

    #[test]
    fn test_undo_moves_present_to_front_of_future() {
        let mut ledger = Ledger::new(0);
        ledger.set(1);
        ledger.set(2);
        ledger.set(3);

        assert!(ledger.undo());
        assert!(ledger.undo());
        assert_eq!(*ledger.present(), 1);
        assert_eq!(ledger.past(), &[0]);
        assert_eq!(ledger.future().copied().collect::<Vec<_>>(), vec![2, 3]);

        assert!(ledger.redo());
        assert_eq!(*ledger.present(), 2);
        assert_eq!(ledger.past(), &[0, 1]);
        assert_eq!(ledger.future().copied().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_set_after_undo_discards_redo_branch() {
        let mut ledger = Ledger::new(String::new());
        ledger.set("a".to_string());
        ledger.set("b".to_string());
        ledger.undo();
        ledger.set("c".to_string());

        assert!(!ledger.can_redo());
        assert!(!ledger.redo());
        assert_eq!(ledger.present(), "c");
        assert_eq!(ledger.past(), &["".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut ledger = Ledger::new(0);
        ledger.set(1);
        ledger.set(2);
        ledger.undo();

        ledger.reset(10);

        assert_eq!(*ledger.present(), 10);
        assert!(!ledger.can_undo());
        assert!(!ledger.can_redo());
    }

    proptest! {
        #[test]
        fn prop_undo_walks_back_through_every_set(
            initial in 0u32..1000,
            values in prop::collection::vec(0u32..1000, 0..20),
        ) {
            // Consecutive duplicates are no-ops, so compare against the
            // deduplicated sequence of committed values.
            let mut ledger = Ledger::new(initial);
            let mut committed = vec![initial];
            for v in &values {
                ledger.set(*v);
                if committed.last() != Some(v) {
                    committed.push(*v);
                }
            }

            for expected in committed.iter().rev().skip(1) {
                prop_assert!(ledger.undo());
                prop_assert_eq!(ledger.present(), expected);
            }
            prop_assert!(!ledger.undo());
            prop_assert_eq!(*ledger.present(), initial);
        }

        #[test]
        fn prop_redo_inverts_undo(
            initial in ".{0,8}",
            value in ".{0,8}",
        ) {
            prop_assume!(initial != value);
            let mut ledger = Ledger::new(initial);
            ledger.set(value.clone());
            ledger.undo();
            prop_assert!(ledger.redo());
            prop_assert_eq!(ledger.present(), &value);
        }

        #[test]
        fn prop_set_after_undo_clears_future(
            values in prop::collection::vec(0u8..4, 1..30),
            undos in 0usize..10,
        ) {
            let mut ledger = Ledger::new(255u8);
            for v in &values {
                ledger.set(*v);
            }
            for _ in 0..undos {
                ledger.undo();
            }
            ledger.set(200);
            prop_assert!(!ledger.can_redo());
            prop_assert_eq!(*ledger.present(), 200);
        }
    }
}
