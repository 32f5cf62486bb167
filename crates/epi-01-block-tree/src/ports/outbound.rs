//! Driven ports (Outbound dependencies)

use shared_types::{Block, Hash};

/// Callback receiver for ledger events.
///
/// Called synchronously from inside ledger operations, in the order the
/// changes happen. Implementations must not block: hand the event off and
/// return.
pub trait LedgerObserver {
    /// A block entered the tree after `parent`.
    fn block_added(&self, block: &Block, parent: &Hash);

    /// A block was evicted together with the last branch containing it.
    fn block_pruned(&self, hash: &Hash);

    /// The former LCA was frozen into bedrock.
    fn block_immortalized(&self, block: &Block);

    /// The finality frontier moved to `block`.
    fn lca_changed(&self, block: &Block);

    /// A block was moved under `new_parent` and now lives under `block.hash`.
    fn branch_rebased(&self, block: &Block, old_parent: &Hash, old_hash: &Hash, new_parent: &Hash);

    /// The whole ledger was swapped for an adopted snapshot.
    fn ledger_replaced(&self, top_block: &Hash, bedrock_count: usize);
}
