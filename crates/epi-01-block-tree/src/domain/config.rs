//! Block tree configuration

use super::{BlockTreeError, BlockTreeResult};
use serde::{Deserialize, Serialize};

/// Default finality depth.
pub const DEFAULT_BEDROCK_DELTA: usize = 1024;

/// Default pruning distance.
pub const DEFAULT_BRANCH_LENGTH_DELTA: usize = 1024;

/// Tuning for finality and pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockTreeConfig {
    /// The LCA may only advance while the longest branch is longer than this.
    pub bedrock_delta: usize,
    /// Branches this many blocks (or more) shorter than the longest are pruned.
    pub branch_length_delta: usize,
}

impl Default for BlockTreeConfig {
    fn default() -> Self {
        Self {
            bedrock_delta: DEFAULT_BEDROCK_DELTA,
            branch_length_delta: DEFAULT_BRANCH_LENGTH_DELTA,
        }
    }
}

impl BlockTreeConfig {
    pub fn new(bedrock_delta: usize, branch_length_delta: usize) -> Self {
        Self {
            bedrock_delta,
            branch_length_delta,
        }
    }

    /// A zero pruning distance would evict every branch except the longest,
    /// including ones of equal length.
    pub fn validate(&self) -> BlockTreeResult<()> {
        if self.branch_length_delta == 0 {
            return Err(BlockTreeError::InvalidConfig(
                "branch_length_delta must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
