//! Solve queue
//!
//! FIFO of pending work items. An item is queued at most once; cancelling
//! removes it wherever it sits.

use shared_types::WorkItem;
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Default)]
pub struct WorkQueue {
    order: VecDeque<WorkItem>,
    queued: HashSet<WorkItem>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the item was already queued.
    pub fn push(&mut self, item: WorkItem) -> bool {
        if !self.queued.insert(item.clone()) {
            return false;
        }
        self.order.push_back(item);
        true
    }

    pub fn pop(&mut self) -> Option<WorkItem> {
        let item = self.order.pop_front()?;
        self.queued.remove(&item);
        Some(item)
    }

    /// Returns `true` if the item was queued.
    pub fn cancel(&mut self, item: &WorkItem) -> bool {
        if !self.queued.remove(item) {
            return false;
        }
        self.order.retain(|queued| queued != item);
        true
    }

    pub fn contains(&self, item: &WorkItem) -> bool {
        self.queued.contains(item)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
