//! Event Bus adapter
//!
//! Implements the LedgerObserver port by publishing `LedgerEvent`s on the
//! shared broadcast bus. Publishing never waits for subscribers.

use crate::ports::LedgerObserver;
use shared_bus::{EventPublisher, LedgerEvent};
use shared_types::{Block, Hash};
use std::sync::Arc;

/// Publishes ledger events to any [`EventPublisher`].
pub struct EventBusObserver {
    publisher: Arc<dyn EventPublisher>,
}

impl EventBusObserver {
    pub fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        Self { publisher }
    }

    fn publish(&self, event: LedgerEvent) {
        self.publisher.publish(event);
    }
}

impl LedgerObserver for EventBusObserver {
    fn block_added(&self, block: &Block, parent: &Hash) {
        self.publish(LedgerEvent::BlockAdded {
            block: block.clone(),
            parent: parent.clone(),
        });
    }

    fn block_pruned(&self, hash: &Hash) {
        self.publish(LedgerEvent::BlockPruned { hash: hash.clone() });
    }

    fn block_immortalized(&self, block: &Block) {
        self.publish(LedgerEvent::BlockImmortalized(block.clone()));
    }

    fn lca_changed(&self, block: &Block) {
        self.publish(LedgerEvent::LcaChanged(block.clone()));
    }

    fn branch_rebased(&self, block: &Block, old_parent: &Hash, old_hash: &Hash, new_parent: &Hash) {
        self.publish(LedgerEvent::BranchRebased {
            block: block.clone(),
            old_parent: old_parent.clone(),
            old_hash: old_hash.clone(),
            new_parent: new_parent.clone(),
        });
    }

    fn ledger_replaced(&self, top_block: &Hash, bedrock_count: usize) {
        self.publish(LedgerEvent::LedgerReplaced {
            top_block: top_block.clone(),
            bedrock_count,
        });
    }
}
