//! Block admission
//!
//! The sole gate for anything entering the ledger from outside the
//! persisted store: locally solved problems, remote blocks and snapshots.

use shared_crypto::ChainHasher;
use shared_types::{BlockRecord, ProblemRegistry, NULL_HASH};
use std::collections::HashSet;
use thiserror::Error;

/// Why a block was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("Unknown problem: {0}")]
    UnknownProblem(String),

    #[error("Solution does not solve {problem} for {parameters}")]
    IncorrectSolution { problem: String, parameters: String },

    #[error("Hash mismatch: declared {declared}, computed {computed}")]
    HashMismatch { declared: String, computed: String },

    #[error("Block {hash} follows unknown predecessor {prev_hash}")]
    UnknownPredecessor { hash: String, prev_hash: String },

    #[error("Block {0} appears twice")]
    DuplicateBlock(String),
}

impl AdmissionError {
    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            AdmissionError::UnknownProblem(_) => "unknown_problem",
            AdmissionError::IncorrectSolution { .. } => "incorrect_solution",
            AdmissionError::HashMismatch { .. } => "hash_mismatch",
            AdmissionError::UnknownPredecessor { .. } => "unknown_predecessor",
            AdmissionError::DuplicateBlock(_) => "duplicate_block",
        }
    }
}

/// Validate-then-adopt rule over a registry and a hasher.
pub struct Admission<'a> {
    registry: &'a ProblemRegistry,
    hasher: &'a dyn ChainHasher,
}

impl<'a> Admission<'a> {
    pub fn new(registry: &'a ProblemRegistry, hasher: &'a dyn ChainHasher) -> Self {
        Self { registry, hasher }
    }

    /// Check a solution against the registered problem.
    pub fn check_solution(
        &self,
        problem: &str,
        parameters: &str,
        solution: &str,
    ) -> Result<(), AdmissionError> {
        if !self.registry.contains(problem) {
            return Err(AdmissionError::UnknownProblem(problem.to_string()));
        }
        if !self.registry.check(problem, parameters, solution) {
            return Err(AdmissionError::IncorrectSolution {
                problem: problem.to_string(),
                parameters: parameters.to_string(),
            });
        }
        Ok(())
    }

    /// Full rule: the solution checks and the declared hash is reproducible.
    pub fn admit(&self, record: &BlockRecord) -> Result<(), AdmissionError> {
        self.check_solution(&record.problem, &record.parameters, &record.solution)?;

        let computed = self.hasher.hash(
            &record.prev_hash,
            &record.problem,
            &record.parameters,
            &record.solution,
        );
        if computed != record.hash {
            return Err(AdmissionError::HashMismatch {
                declared: record.hash.clone(),
                computed,
            });
        }
        Ok(())
    }

    /// Admit every record of a snapshot or report the first failure with
    /// its index.
    ///
    /// Records are replayed in order from genesis: each must follow a block
    /// seen earlier in the list, so compiling them drops nothing.
    pub fn admit_all(&self, records: &[BlockRecord]) -> Result<(), (usize, AdmissionError)> {
        let mut known: HashSet<&str> = HashSet::with_capacity(records.len() + 1);
        known.insert(NULL_HASH);

        records.iter().enumerate().try_for_each(|(index, record)| {
            if !known.contains(record.prev_hash.as_str()) {
                return Err((
                    index,
                    AdmissionError::UnknownPredecessor {
                        hash: record.hash.clone(),
                        prev_hash: record.prev_hash.clone(),
                    },
                ));
            }
            self.admit(record).map_err(|e| (index, e))?;
            if !known.insert(record.hash.as_str()) {
                return Err((index, AdmissionError::DuplicateBlock(record.hash.clone())));
            }
            Ok(())
        })
    }
}
