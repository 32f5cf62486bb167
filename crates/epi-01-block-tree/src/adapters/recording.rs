//! In-memory observers

use crate::ports::LedgerObserver;
use parking_lot::Mutex;
use shared_bus::LedgerEvent;
use shared_types::{Block, Hash};
use std::sync::Arc;

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl LedgerObserver for NoOpObserver {
    fn block_added(&self, _block: &Block, _parent: &Hash) {}
    fn block_pruned(&self, _hash: &Hash) {}
    fn block_immortalized(&self, _block: &Block) {}
    fn lca_changed(&self, _block: &Block) {}
    fn branch_rebased(&self, _: &Block, _: &Hash, _: &Hash, _: &Hash) {}
    fn ledger_replaced(&self, _top_block: &Hash, _bedrock_count: usize) {}
}

/// Records every event. Clones share the same log, so one clone can be
/// handed to the ledger and another kept for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<LedgerEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.lock().clone()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<LedgerEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().len()
    }

    fn push(&self, event: LedgerEvent) {
        self.events.lock().push(event);
    }
}

impl LedgerObserver for RecordingObserver {
    fn block_added(&self, block: &Block, parent: &Hash) {
        self.push(LedgerEvent::BlockAdded {
            block: block.clone(),
            parent: parent.clone(),
        });
    }

    fn block_pruned(&self, hash: &Hash) {
        self.push(LedgerEvent::BlockPruned { hash: hash.clone() });
    }

    fn block_immortalized(&self, block: &Block) {
        self.push(LedgerEvent::BlockImmortalized(block.clone()));
    }

    fn lca_changed(&self, block: &Block) {
        self.push(LedgerEvent::LcaChanged(block.clone()));
    }

    fn branch_rebased(&self, block: &Block, old_parent: &Hash, old_hash: &Hash, new_parent: &Hash) {
        self.push(LedgerEvent::BranchRebased {
            block: block.clone(),
            old_parent: old_parent.clone(),
            old_hash: old_hash.clone(),
            new_parent: new_parent.clone(),
        });
    }

    fn ledger_replaced(&self, top_block: &Hash, bedrock_count: usize) {
        self.push(LedgerEvent::LedgerReplaced {
            top_block: top_block.clone(),
            bedrock_count,
        });
    }
}
