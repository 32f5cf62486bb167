//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Chain**: `Block`, `BlockRecord`, `Hash`, `NULL_HASH`
//! - **Work**: `WorkItem` (a problem instance identified by problem + parameters)

use serde::{Deserialize, Serialize};

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// A content-addressed block hash, rendered as text (base64 of the digest).
pub type Hash = String;

/// The genesis sentinel: base64 of 32 zero bytes.
///
/// Used as the predecessor of the very first block ever chained, and as the
/// hash of the empty block that is the initial finality frontier.
pub const NULL_HASH: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

/// Returns an owned copy of [`NULL_HASH`].
pub fn null_hash() -> Hash {
    NULL_HASH.to_string()
}

/// An immutable block: a solved problem instance and its derived hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Block {
    /// Problem identifier (registry key).
    pub problem: String,
    /// Problem parameters, encoded by the problem itself.
    pub parameters: String,
    /// Solution to the problem for `parameters`.
    pub solution: String,
    /// Content-addressing key.
    pub hash: Hash,
}

impl Block {
    /// The empty block whose hash is the genesis sentinel.
    pub fn genesis() -> Self {
        Self {
            hash: null_hash(),
            ..Default::default()
        }
    }

    /// Whether this is the genesis sentinel block.
    pub fn is_genesis(&self) -> bool {
        self.hash == NULL_HASH
    }

    /// Pair this block with the hash that preceded it.
    pub fn into_record(self, prev_hash: Hash) -> BlockRecord {
        BlockRecord {
            problem: self.problem,
            parameters: self.parameters,
            solution: self.solution,
            hash: self.hash,
            prev_hash,
        }
    }
}

/// A block paired with its predecessor hash.
///
/// This is the flat, transferable form used for persisted ledgers, full
/// ledger snapshots and block announcements. Field names follow the
/// persisted JSON format (`prevHash`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockRecord {
    pub problem: String,
    pub parameters: String,
    pub solution: String,
    pub hash: Hash,
    #[serde(rename = "prevHash")]
    pub prev_hash: Hash,
}

impl BlockRecord {
    /// Drop the predecessor link.
    pub fn block(&self) -> Block {
        Block {
            problem: self.problem.clone(),
            parameters: self.parameters.clone(),
            solution: self.solution.clone(),
            hash: self.hash.clone(),
        }
    }

    /// The work item this block solves.
    pub fn work_item(&self) -> WorkItem {
        WorkItem::new(&self.problem, &self.parameters)
    }
}

// =============================================================================
// CLUSTER B: WORK
// =============================================================================

/// A problem instance: what the solver works on and what cancellation targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkItem {
    pub problem: String,
    pub parameters: String,
}

impl WorkItem {
    pub fn new(problem: impl Into<String>, parameters: impl Into<String>) -> Self {
        Self {
            problem: problem.into(),
            parameters: parameters.into(),
        }
    }
}
