//! Undo/Redo history of visibility snapshots.
//!
//! Snapshots are `Arc`s of whole maps: an entry costs one pointer until the
//! live map is next mutated, at which point only the live copy is cloned.

use std::sync::Arc;

pub const DEFAULT_MAX_ENTRIES: usize = 100;

pub struct History<T> {
    undo_stack: Vec<Arc<T>>,
    redo_stack: Vec<Arc<T>>,
    max_entries: usize,
}

impl<T> History<T> {
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_entries,
        }
    }

    /// Record the state being replaced by a fresh mutation.
    pub fn record(&mut self, previous: Arc<T>) {
        if self.max_entries == 0 {
            return;
        }
        self.undo_stack.push(previous);
        self.redo_stack.clear();

        // Limit history size
        if self.undo_stack.len() > self.max_entries {
            self.undo_stack.remove(0);
        }
    }

    /// Step back. `current` moves to the redo stack.
    pub fn undo(&mut self, current: Arc<T>) -> Option<Arc<T>> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward. `current` moves back to the undo stack.
    pub fn redo(&mut self, current: Arc<T>) -> Option<Arc<T>> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}
