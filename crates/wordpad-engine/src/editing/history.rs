use std::collections::VecDeque;

/// Capacity-bounded undo/redo stacks of whole-document snapshots.
///
/// Recording a new state clears the redo stack. When the undo stack grows past
/// `capacity` the oldest entry is dropped.
#[derive(Debug, Clone)]
pub struct History<T> {
    undo: VecDeque<T>,
    redo: Vec<T>,
    capacity: usize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl<T> History<T> {
    pub const DEFAULT_CAPACITY: usize = 100;

    /// A capacity of 0 is treated as 1
    pub fn new(capacity: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Push the state from before an edit
    pub fn record(&mut self, before: T) {
        self.redo.clear();
        self.push_undo(before);
    }

    /// Swap `current` for the most recent undo entry
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Swap `current` for the most recent redo entry
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo.pop()?;
        self.push_undo(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    fn push_undo(&mut self, state: T) {
        self.undo.push_back(state);
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
    }
}
