//! Caret positions to restore once the host finished re-rendering

use std::collections::VecDeque;

use crate::domain::block::FieldKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaretRestore {
    pub field: FieldKey,
    pub position: usize,
}

/// FIFO of pending caret restorations
#[derive(Debug, Clone, Default)]
pub struct DeferredCarets {
    queue: VecDeque<CaretRestore>,
}

impl DeferredCarets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, field: FieldKey, position: usize) {
        self.queue.push_back(CaretRestore { field, position });
    }

    /// Take every pending restore, oldest first
    pub fn drain(&mut self) -> Vec<CaretRestore> {
        self.queue.drain(..).collect()
    }

    /// Keep only restores whose field is still rendered
    pub fn retain(&mut self, mut keep: impl FnMut(&FieldKey) -> bool) {
        self.queue.retain(|r| keep(&r.field));
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
