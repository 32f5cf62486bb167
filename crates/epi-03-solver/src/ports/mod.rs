//! Ports layer for the solver

pub mod outbound;

pub use outbound::*;
