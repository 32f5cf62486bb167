//! # epi-03-solver
//!
//! Solves problem instances and hands the solutions to the validator.
//!
//! ## Overview
//!
//! - **Problems**: typed implementations behind the string-keyed
//!   [`ProblemHandler`](shared_types::ProblemHandler) interface; JSON
//!   decoding happens inside each handler
//! - **Registry**: published once to the validator at startup, immutable after
//! - **Queue**: de-duplicated FIFO of work items; cancellation drops queued
//!   work and discards an in-flight result
//!
//! ```text
//! Runtime ──Solve──→ ┌────────┐ ──ProblemsRegistry (once)──→ Validator
//! Validator ─Cancel─→ │ Solver │ ──ProblemSolved───────────→ Validator
//!                     └────────┘
//! ```
//!
//! ## Built-in problems
//!
//! | Identifier | Parameters | Solution |
//! |------------|------------|----------|
//! | `prime-integer-factorization` | `{"o": 242}` | `{"o": [2, 11, 11]}` |

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::MailboxValidatorGateway;
pub use domain::{
    builtin_registry, PrimeFactorization, SolverConfig, TypedHandler, TypedProblem, WorkQueue,
};
pub use ports::ValidatorGateway;
pub use service::SolverService;
