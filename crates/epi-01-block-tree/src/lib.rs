//! # epi-01-block-tree
//!
//! The ledger's consensus engine: a tree of candidate blocks rooted at the
//! finality frontier (the LCA), with a frozen bedrock history behind it.
//!
//! ## Overview
//!
//! - **Branches**: every root-to-tip path above the LCA, kept as hash lists
//! - **Fork choice**: the longest branch wins; ties go to the tip inserted first
//! - **Pruning**: branches trailing the longest by `branch_length_delta` are evicted
//! - **Finality**: once every branch agrees on the next block and the longest
//!   branch exceeds `bedrock_delta`, the LCA moves forward and the old LCA
//!   becomes bedrock
//! - **Rebase**: a block can be re-parented, re-hashing it and its subtree
//!
//! ```text
//!   bedrock ── bedrock ── LCA ─┬─ B1 ── B2 ── B3   (longest, top block = B3)
//!                              └─ B1' ── B2'
//! ```
//!
//! The ledger does no I/O and spawns nothing. The owning component (the
//! validator) is responsible for concurrency.
//!
//! ## Example
//!
//! ```rust,ignore
//! use epi_01_block_tree::{BlockTreeConfig, Ledger};
//! use shared_crypto::Sha256ChainHasher;
//!
//! let mut ledger = Ledger::new(BlockTreeConfig::default(), Arc::new(Sha256ChainHasher::new()));
//! ledger.add_block(block, &ledger.top_block());
//!
//! let snapshot = ledger.decompile();
//! let restored = Ledger::compile(&snapshot, config, hasher);
//! assert_eq!(restored.top_block(), ledger.top_block());
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{EventBusObserver, NoOpObserver, RecordingObserver};
pub use domain::{
    decode_snapshot, encode_snapshot, BlockTreeConfig, BlockTreeError, BlockTreeResult, BranchId,
    Ledger, TreeBlock,
};
pub use ports::LedgerObserver;
