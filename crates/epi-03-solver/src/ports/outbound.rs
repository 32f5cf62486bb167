//! Driven ports (Outbound dependencies)

use shared_types::ProblemRegistry;

/// Validator, as seen by the solver.
pub trait ValidatorGateway: Send + Sync {
    /// Hand over the registry. Sent once at startup.
    fn publish_registry(&self, registry: ProblemRegistry) -> Result<(), String>;

    fn problem_solved(
        &self,
        problem: String,
        parameters: String,
        solution: String,
    ) -> Result<(), String>;
}
