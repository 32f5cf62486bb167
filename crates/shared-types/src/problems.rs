//! # Problem Registry
//!
//! The set of problems a node knows how to solve and check, keyed by problem
//! identifier. Produced once by the solver at startup and handed to the
//! validator, which uses it as half of the block admission gate.
//!
//! Handlers work on the string encodings stored in blocks. Decoding into a
//! concrete parameter/solution type happens inside each handler.

use crate::errors::ProblemError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A problem that can be solved and whose solutions can be checked.
pub trait ProblemHandler: Send + Sync {
    /// Registry key, also stored in every block solving this problem.
    fn id(&self) -> &str;

    /// Solve the instance described by `parameters`.
    fn solve(&self, parameters: &str) -> Result<String, ProblemError>;

    /// Check that `solution` solves the instance described by `parameters`.
    ///
    /// Undecodable input is an incorrect solution, never an error.
    fn check(&self, parameters: &str, solution: &str) -> bool;
}

/// Immutable registry of problem handlers.
///
/// Cloning is cheap; all clones share the same handlers.
#[derive(Clone, Default)]
pub struct ProblemRegistry {
    handlers: Arc<HashMap<String, Arc<dyn ProblemHandler>>>,
}

impl ProblemRegistry {
    /// Build a registry from handlers. Later handlers replace earlier ones
    /// with the same identifier.
    pub fn from_handlers<I>(handlers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn ProblemHandler>>,
    {
        let handlers = handlers
            .into_iter()
            .map(|h| (h.id().to_string(), h))
            .collect();
        Self {
            handlers: Arc::new(handlers),
        }
    }

    pub fn get(&self, problem: &str) -> Option<&Arc<dyn ProblemHandler>> {
        self.handlers.get(problem)
    }

    pub fn contains(&self, problem: &str) -> bool {
        self.handlers.contains_key(problem)
    }

    /// Check a solution. Unknown problems never check.
    pub fn check(&self, problem: &str, parameters: &str, solution: &str) -> bool {
        self.get(problem)
            .map(|h| h.check(parameters, solution))
            .unwrap_or(false)
    }

    pub fn solve(&self, problem: &str, parameters: &str) -> Result<String, ProblemError> {
        self.get(problem)
            .ok_or_else(|| ProblemError::UnknownProblem(problem.to_string()))?
            .solve(parameters)
    }

    /// Registered identifiers, sorted.
    pub fn problem_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.handlers.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for ProblemRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProblemRegistry")
            .field("problems", &self.problem_ids())
            .finish()
    }
}
