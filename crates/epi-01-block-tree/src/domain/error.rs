//! Error types for the block tree

use shared_types::Hash;

/// Block tree error types
///
/// Structural rejections in `add_block` are silent no-ops and never surface
/// here; these errors cover operations that report failure to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockTreeError {
    #[error("Unknown block: {0}")]
    UnknownBlock(Hash),

    #[error("Unknown parent block: {0}")]
    UnknownParent(Hash),

    #[error("Block {0} is the finality frontier and cannot be moved")]
    FrozenFrontier(Hash),

    #[error("Rebasing {hash} onto {new_parent} would create a cycle")]
    WouldCycle { hash: Hash, new_parent: Hash },

    #[error("Recomputed hash {0} is already tracked")]
    HashCollision(Hash),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for block tree operations
pub type BlockTreeResult<T> = Result<T, BlockTreeError>;

impl From<serde_json::Error> for BlockTreeError {
    fn from(err: serde_json::Error) -> Self {
        BlockTreeError::InvalidSnapshot(err.to_string())
    }
}
