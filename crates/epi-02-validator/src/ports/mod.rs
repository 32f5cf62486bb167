//! Ports layer (Hexagonal Architecture)
//!
//! Inbound traffic arrives through the validator's mailbox; these are the
//! driven ports the validator calls out through.

mod outbound;

pub use outbound::*;
