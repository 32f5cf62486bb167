//! Arena entries of the block tree

use serde::{Deserialize, Serialize};
use shared_types::{Block, Hash};
use std::collections::BTreeSet;
use std::fmt;

/// Handle of one branch (root-exclusive path from the LCA to a tip).
///
/// Identifiers are never reused within a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BranchId(pub u64);

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "branch#{}", self.0)
    }
}

/// A block tracked by the tree, plus its links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeBlock {
    pub block: Block,
    /// `None` only for the LCA.
    pub preceding_hash: Option<Hash>,
    /// Child hashes in insertion order.
    pub children: Vec<Hash>,
    /// Branches this block belongs to. Empty for the LCA.
    pub member_branches: BTreeSet<BranchId>,
    /// Insertion sequence number; parents always have a lower value.
    pub seq: u64,
}

impl TreeBlock {
    pub fn new(block: Block, preceding_hash: Option<Hash>, seq: u64) -> Self {
        Self {
            block,
            preceding_hash,
            children: Vec::new(),
            member_branches: BTreeSet::new(),
            seq,
        }
    }

    pub fn hash(&self) -> &Hash {
        &self.block.hash
    }

    /// A tip has no children.
    pub fn is_tip(&self) -> bool {
        self.children.is_empty()
    }
}
