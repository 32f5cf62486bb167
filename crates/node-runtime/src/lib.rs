//! # Node Runtime Library
//!
//! Wires the components of a node together. The `epi-node` binary is a thin
//! shell around [`NodeRuntime`].
//!
//! ## Threads
//!
//! ```text
//!              solve_problem()
//!                    │
//!        ┌───────────┴────────────┐
//!        ↓                        ↓
//!   epi-solver ──ProblemSolved──→ epi-validator ──BroadcastBlock──→ epi-network
//!        ↑    ←──────Cancel─────      │        ←──FullLedgerOffer──
//!        └──────────────────────      │
//!                                LedgerEvent
//!                                     ↓
//!                              InMemoryEventBus ──→ subscribe()
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, then `EPI_*` environment overrides)
//! 2. Validate it
//! 3. Create mailboxes and the event bus
//! 4. Spawn network, validator and solver threads
//! 5. The solver publishes its registry; the validator restores its ledger

pub mod adapters;
pub mod container;
pub mod runtime;

pub use adapters::{DetachedSolver, StandaloneNetwork};
pub use container::{ConfigError, NodeConfig};
pub use runtime::{NodeRuntime, RuntimeError};
