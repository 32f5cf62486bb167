//! Domain layer for the solver

mod config;
mod factorization;
mod problem;
mod queue;

pub use config::*;
pub use factorization::*;
pub use problem::*;
pub use queue::*;

use shared_types::{ProblemHandler, ProblemRegistry};
use std::sync::Arc;

/// Registry of every problem this node can solve and check.
pub fn builtin_registry() -> ProblemRegistry {
    ProblemRegistry::from_handlers([
        Arc::new(TypedHandler::new(PrimeFactorization)) as Arc<dyn ProblemHandler>
    ])
}
