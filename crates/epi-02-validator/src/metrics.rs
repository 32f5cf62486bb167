//! # Validator Metrics
//!
//! Prometheus metrics for monitoring block admission.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! epi-02-validator = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `validator_blocks_accepted_total` - Blocks added to the ledger (by origin)
//! - `validator_blocks_rejected_total` - Blocks refused (by reason)
//! - `validator_snapshots_adopted_total` - Full ledger snapshots adopted
//! - `validator_snapshots_rejected_total` - Full ledger snapshots discarded
//! - `validator_bedrock_blocks` - Current number of bedrock blocks

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter, IntCounterVec,
    IntGauge,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Blocks added to the ledger, labeled by origin (local/remote)
    pub static ref BLOCKS_ACCEPTED: IntCounterVec = register_int_counter_vec!(
        "validator_blocks_accepted_total",
        "Total number of blocks added to the ledger",
        &["origin"]
    )
    .expect("Failed to create BLOCKS_ACCEPTED metric");

    /// Blocks refused, labeled by rejection reason
    pub static ref BLOCKS_REJECTED: IntCounterVec = register_int_counter_vec!(
        "validator_blocks_rejected_total",
        "Total number of blocks rejected",
        &["reason"]
    )
    .expect("Failed to create BLOCKS_REJECTED metric");

    pub static ref SNAPSHOTS_ADOPTED: IntCounter = register_int_counter!(
        "validator_snapshots_adopted_total",
        "Total number of full ledger snapshots adopted"
    )
    .expect("Failed to create SNAPSHOTS_ADOPTED metric");

    pub static ref SNAPSHOTS_REJECTED: IntCounter = register_int_counter!(
        "validator_snapshots_rejected_total",
        "Total number of full ledger snapshots discarded"
    )
    .expect("Failed to create SNAPSHOTS_REJECTED metric");

    pub static ref BEDROCK_BLOCKS: IntGauge = register_int_gauge!(
        "validator_bedrock_blocks",
        "Current number of bedrock blocks"
    )
    .expect("Failed to create BEDROCK_BLOCKS metric");
}

#[cfg(feature = "metrics")]
pub fn record_block_accepted(origin: &str) {
    BLOCKS_ACCEPTED.with_label_values(&[origin]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_block_rejected(reason: &str) {
    BLOCKS_REJECTED.with_label_values(&[reason]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_snapshot_adopted() {
    SNAPSHOTS_ADOPTED.inc();
}

#[cfg(feature = "metrics")]
pub fn record_snapshot_rejected() {
    SNAPSHOTS_REJECTED.inc();
}

#[cfg(feature = "metrics")]
pub fn set_bedrock_blocks(count: usize) {
    BEDROCK_BLOCKS.set(count as i64);
}

// No-op implementations when metrics feature is disabled
#[cfg(not(feature = "metrics"))]
pub fn record_block_accepted(_origin: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_block_rejected(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_snapshot_adopted() {}

#[cfg(not(feature = "metrics"))]
pub fn record_snapshot_rejected() {}

#[cfg(not(feature = "metrics"))]
pub fn set_bedrock_blocks(_count: usize) {}
