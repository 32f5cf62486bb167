//! # Detached Solver
//!
//! Solver gateway for a node running without a local solver: there is no
//! pending work to cancel, so cancellations are accepted and dropped.

use epi_02_validator::SolverGateway;
use shared_types::WorkItem;
use tracing::trace;

#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedSolver;

impl SolverGateway for DetachedSolver {
    fn cancel(&self, work: WorkItem) -> Result<(), String> {
        trace!(problem = %work.problem, "No local solver, nothing to cancel");
        Ok(())
    }
}
