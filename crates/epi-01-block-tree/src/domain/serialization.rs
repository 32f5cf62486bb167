//! # Serialization
//!
//! `decompile` flattens a ledger into `(block, predecessor)` records with
//! every parent ahead of its children; `compile` rebuilds a ledger from
//! such a list. The snapshot codec turns the list into the persisted JSON
//! array `[{problem, parameters, solution, hash, prevHash}, ...]`.
//!
//! The genesis sentinel is implied by every ledger and never emitted.

use super::{BlockTreeConfig, BlockTreeResult, Ledger, TreeBlock};
use shared_crypto::ChainHasher;
use shared_types::{null_hash, BlockRecord};
use std::sync::Arc;
use tracing::debug;

impl Ledger {
    /// Bedrocks, then the LCA, then tracked blocks in insertion order.
    pub fn decompile(&self) -> Vec<BlockRecord> {
        let mut records = Vec::with_capacity(self.bedrocks.len() + self.tree.len() + 1);
        let mut prev = null_hash();

        for block in self.bedrocks.iter().chain(std::iter::once(&self.lca.block)) {
            if !block.is_genesis() {
                records.push(block.clone().into_record(prev.clone()));
            }
            prev = block.hash.clone();
        }

        let mut tracked: Vec<&TreeBlock> = self.tree.values().collect();
        tracked.sort_by_key(|node| node.seq);
        records.extend(tracked.into_iter().map(|node| {
            let prev = node
                .preceding_hash
                .clone()
                .unwrap_or_else(|| self.lca.block.hash.clone());
            node.block.clone().into_record(prev)
        }));

        records
    }

    /// Rebuild a ledger from records in decompile order.
    ///
    /// Records are trusted: no hash or solution is checked here. Records
    /// whose predecessor is unknown at the time they are reached are skipped.
    pub fn compile(
        records: &[BlockRecord],
        config: BlockTreeConfig,
        hasher: Arc<dyn ChainHasher>,
    ) -> Ledger {
        let mut ledger = Ledger::new(config, hasher);
        ledger.bulk_loading = true;
        let accepted = records
            .iter()
            .filter(|record| ledger.add_record(record))
            .count();
        ledger.bulk_loading = false;
        ledger.update_and_prune(true);

        debug!(
            records = records.len(),
            accepted,
            bedrocks = ledger.bedrocks.len(),
            "[epi-01] Ledger compiled"
        );
        ledger
    }
}

/// Encode records as the persisted JSON array.
pub fn encode_snapshot(records: &[BlockRecord]) -> String {
    // Serializing plain string fields cannot fail.
    serde_json::to_string(records).unwrap_or_else(|_| "[]".to_string())
}

/// Decode the persisted JSON array.
pub fn decode_snapshot(payload: &str) -> BlockTreeResult<Vec<BlockRecord>> {
    Ok(serde_json::from_str(payload)?)
}
