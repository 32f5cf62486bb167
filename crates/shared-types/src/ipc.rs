//! # Inter-Component Messages
//!
//! Every cross-component interaction is one of these immutable values,
//! delivered to the recipient's mailbox.
//!
//! ```text
//! Solver ──ProblemSolved / ProblemsRegistry──→ Validator
//! Network ──FullLedgerOffer / RemoteBlock────→ Validator
//! Validator ──BroadcastBlock / RequestFullLedger──→ Network
//! Validator ──Cancel──→ Solver
//! ```

use crate::entities::{BlockRecord, WorkItem};
use crate::problems::ProblemRegistry;

// =============================================================================
// VALIDATOR INBOX
// =============================================================================

/// Messages consumed by the validator.
#[derive(Debug, Clone)]
pub enum ValidatorMessage {
    /// The solver's problem registry. Sent once at startup.
    /// Sender: Solver
    ProblemsRegistry(ProblemRegistry),

    /// A full ledger snapshot in the persisted JSON format.
    /// Sender: Network
    FullLedgerOffer(String),

    /// A problem was solved locally.
    /// Sender: Solver
    ProblemSolved {
        problem: String,
        parameters: String,
        solution: String,
    },

    /// Someone on the network announced a block.
    /// Sender: Network
    RemoteBlock(BlockRecord),

    /// A peer asked for our full ledger.
    /// Sender: Network
    FullLedgerRequested,
}

impl ValidatorMessage {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidatorMessage::ProblemsRegistry(_) => "problems_registry",
            ValidatorMessage::FullLedgerOffer(_) => "full_ledger_offer",
            ValidatorMessage::ProblemSolved { .. } => "problem_solved",
            ValidatorMessage::RemoteBlock(_) => "remote_block",
            ValidatorMessage::FullLedgerRequested => "full_ledger_requested",
        }
    }
}

// =============================================================================
// NETWORK OUTBOX
// =============================================================================

/// Messages consumed by the network component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkMessage {
    /// Broadcast a newly accepted local block.
    /// Sender: Validator
    BroadcastBlock(BlockRecord),

    /// Ask peers for a full ledger snapshot.
    /// Sender: Validator
    RequestFullLedger,

    /// Our full ledger, in reply to `FullLedgerRequested`.
    /// Sender: Validator
    FullLedger(String),

    /// Tell peers about a problem instance worth solving.
    /// Sender: Runtime
    ProblemSubmitted(WorkItem),
}

// =============================================================================
// SOLVER INBOX
// =============================================================================

/// Messages consumed by the solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverMessage {
    /// Queue a problem instance for solving.
    /// Sender: Runtime
    Solve(WorkItem),

    /// Someone else already solved this instance; drop pending work on it.
    /// Sender: Validator
    Cancel(WorkItem),
}
