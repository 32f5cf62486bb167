//! Error types for the validator

use epi_01_block_tree::BlockTreeError;
use thiserror::Error;

/// Ledger store failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Ledger store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Persisted ledger is corrupt: {0}")]
    Corrupt(#[from] BlockTreeError),
}

/// Validator errors
///
/// Block and snapshot rejections are not errors at this level: they are
/// logged and dropped. Only failures the owner must act on surface here.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The ledger could not be written on shutdown.
    #[error("Failed to persist ledger: {0}")]
    Persistence(#[source] StoreError),

    #[error("Invalid validator configuration: {0}")]
    InvalidConfig(#[from] BlockTreeError),
}

/// Result type for validator operations
pub type ValidatorResult<T> = Result<T, ValidatorError>;
