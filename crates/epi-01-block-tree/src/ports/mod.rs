//! Ports layer (Hexagonal Architecture)
//!
//! The ledger has no inbound port: its owner calls it directly. The only
//! driven port is the observer receiving structural change notifications.

mod outbound;

pub use outbound::*;
