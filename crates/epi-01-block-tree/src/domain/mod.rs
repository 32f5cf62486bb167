//! Domain layer for the block tree
//!
//! - `tree_block`: arena entries and branch identifiers
//! - `ledger`: insertion, fork choice, pruning and finality
//! - `rebase`: re-parenting with subtree re-hashing
//! - `serialization`: decompile/compile and the snapshot JSON codec

mod config;
mod error;
mod ledger;
mod rebase;
mod serialization;
mod tree_block;

pub use config::*;
pub use error::*;
pub use ledger::*;
pub use serialization::*;
pub use tree_block::*;
