//! # Error Types
//!
//! Defines error types used across components.

use thiserror::Error;

/// Errors raised by problem handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemError {
    /// No handler is registered under this identifier.
    #[error("Unknown problem: {0}")]
    UnknownProblem(String),

    /// Parameters could not be decoded by the handler.
    #[error("Invalid parameters for {problem}: {reason}")]
    InvalidParameters { problem: String, reason: String },

    /// The handler could not produce a solution.
    #[error("Unsolvable instance of {problem}: {reason}")]
    Unsolvable { problem: String, reason: String },
}

/// Component lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentState {
    /// Created, not yet started.
    Uninitialized,
    /// Waiting for the inputs required to run.
    Initializing,
    /// Processing messages.
    Running,
    /// Exited its loop.
    Stopped,
}

impl std::fmt::Display for ComponentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ComponentState::Uninitialized => "uninitialized",
            ComponentState::Initializing => "initializing",
            ComponentState::Running => "running",
            ComponentState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}
