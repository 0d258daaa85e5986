//! Bounded linear undo/redo history.
//!
//! The history is a list of snapshots plus a cursor pointing at the snapshot
//! that matches the live document. Committing while the cursor is not at the
//! tail discards every later snapshot; exceeding the capacity evicts the
//! oldest one.

use crate::settings::DEFAULT_HISTORY_CAPACITY;
use std::collections::VecDeque;

/// Snapshot history with a cursor.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: VecDeque<T>,
    cursor: usize,
    capacity: usize,
}

impl<T: Clone> History<T> {
    /// Create a history holding a single initial snapshot.
    pub fn new(initial: T) -> Self {
        Self::with_capacity(initial, DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a history with a custom capacity (at least 1).
    pub fn with_capacity(initial: T, capacity: usize) -> Self {
        let mut entries = VecDeque::with_capacity(capacity.clamp(1, 64));
        entries.push_back(initial);
        Self {
            entries,
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// Drop every entry and start over from `initial`.
    pub fn reset(&mut self, initial: T) {
        self.entries.clear();
        self.entries.push_back(initial);
        self.cursor = 0;
    }

    /// Record a new snapshot after the cursor, discarding any redo entries.
    pub fn commit(&mut self, snapshot: T) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(snapshot);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Step back one snapshot. Returns the snapshot to restore, if any.
    pub fn undo(&mut self) -> Option<&T> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step forward one snapshot. Returns the snapshot to restore, if any.
    pub fn redo(&mut self) -> Option<&T> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> Option<&T> {
        self.entries.get(self.cursor)
    }

    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the snapshot matching the live document.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let history = History::new(0);
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut history = History::new(0);
        for n in 1..=5 {
            history.commit(n);
        }
        for expected in (0..5).rev() {
            assert_eq!(history.undo(), Some(&expected));
        }
        assert_eq!(history.undo(), None);
        for expected in 1..=5 {
            assert_eq!(history.redo(), Some(&expected));
        }
        assert_eq!(history.redo(), None);
        assert_eq!(history.current(), Some(&5));
    }

    #[test]
    fn test_commit_truncates_redo() {
        let mut history = History::new(0);
        history.commit(1);
        history.commit(2);
        history.commit(3);
        history.undo();
        history.undo();
        history.commit(10);
        assert!(!history.can_redo());
        assert_eq!(history.redo(), None);
        assert_eq!(history.len(), 3);
        assert_eq!(history.undo(), Some(&1));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::new(0);
        for n in 1..=60 {
            history.commit(n);
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.cursor(), 49);
        assert_eq!(history.current(), Some(&60));

        let mut undone = 0;
        while history.undo().is_some() {
            undone += 1;
        }
        assert_eq!(undone, 49);
        // oldest retained is 11; 0..=10 were evicted
        assert_eq!(history.current(), Some(&11));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn test_custom_capacity() {
        let mut history = History::with_capacity('a', 2);
        history.commit('b');
        history.commit('c');
        assert_eq!(history.len(), 2);
        assert_eq!(history.undo(), Some(&'b'));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn test_reset() {
        let mut history = History::new(0);
        history.commit(1);
        history.reset(7);
        assert_eq!(history.len(), 1);
        assert_eq!(history.current(), Some(&7));
    }
}
