//! # Shared Crypto - Chain Hashing
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256 + base64 | Content-addressed block hashes |
//!
//! The ledger treats hashing as an injected capability: anything that
//! implements [`ChainHasher`] can chain blocks. [`Sha256ChainHasher`] is the
//! reference encoding every node on the network must agree on.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod hashing;

// Re-exports
pub use hashing::{ChainHasher, Sha256ChainHasher};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
