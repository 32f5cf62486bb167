//! # Chain Hashing
//!
//! `hash(prev, problem, parameters, solution) -> hash`
//!
//! The reference encoding feeds SHA-256 with the raw bytes of the previous
//! hash followed by the UTF-8 bytes of problem, parameters and solution, and
//! renders the digest as standard base64.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};
use shared_types::Hash;

/// Pure, deterministic chaining function used to derive block hashes.
pub trait ChainHasher: Send + Sync {
    /// Derive the hash of a block chained after `prev`.
    fn hash(&self, prev: &str, problem: &str, parameters: &str, solution: &str) -> Hash;
}

/// Reference SHA-256 chain hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256ChainHasher;

impl Sha256ChainHasher {
    /// Create a new hasher.
    pub fn new() -> Self {
        Self
    }

    /// Raw bytes of a previous hash.
    ///
    /// Hashes produced by this hasher are base64; anything that does not
    /// decode is used as its UTF-8 bytes.
    fn prev_bytes(prev: &str) -> Vec<u8> {
        STANDARD
            .decode(prev)
            .unwrap_or_else(|_| prev.as_bytes().to_vec())
    }
}

impl ChainHasher for Sha256ChainHasher {
    fn hash(&self, prev: &str, problem: &str, parameters: &str, solution: &str) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(Self::prev_bytes(prev));
        hasher.update(problem.as_bytes());
        hasher.update(parameters.as_bytes());
        hasher.update(solution.as_bytes());
        STANDARD.encode(hasher.finalize())
    }
}
