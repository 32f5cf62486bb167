//! # Ledger Events
//!
//! Structural changes of the block tree, published for observers (UIs,
//! explorers, tests). These are notifications only: nothing in the node
//! depends on them being delivered.

use serde::{Deserialize, Serialize};
use shared_types::entities::{Block, Hash};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    // =========================================================================
    // TREE
    // =========================================================================
    /// A block entered the tree.
    BlockAdded {
        /// The new block.
        block: Block,
        /// Hash it was chained after.
        parent: Hash,
    },

    /// A block was evicted together with a losing branch.
    BlockPruned {
        /// Hash of the evicted block.
        hash: Hash,
    },

    /// A block was re-parented and therefore re-hashed.
    BranchRebased {
        /// The block under its new identity.
        block: Block,
        old_parent: Hash,
        old_hash: Hash,
        new_parent: Hash,
    },

    // =========================================================================
    // FINALITY
    // =========================================================================
    /// A block was frozen into bedrock.
    BlockImmortalized(Block),

    /// The finality frontier moved to this block.
    LcaChanged(Block),

    // =========================================================================
    // SNAPSHOTS
    // =========================================================================
    /// The whole ledger was replaced by an adopted snapshot.
    LedgerReplaced {
        /// Canonical tip of the adopted ledger.
        top_block: Hash,
        /// Number of bedrock blocks in the adopted ledger.
        bedrock_count: usize,
    },
}

impl LedgerEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::BlockAdded { .. } | Self::BlockPruned { .. } | Self::BranchRebased { .. } => {
                EventTopic::Tree
            }
            Self::BlockImmortalized(_) | Self::LcaChanged(_) => EventTopic::Finality,
            Self::LedgerReplaced { .. } => EventTopic::Snapshot,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Blocks added, pruned or rebased.
    Tree,
    /// Immortalization and frontier moves.
    Finality,
    /// Snapshot adoption.
    Snapshot,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
