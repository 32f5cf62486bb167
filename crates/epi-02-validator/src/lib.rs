//! # epi-02-validator
//!
//! The validator owns the ledger. It is the only component allowed to
//! mutate it, and the sole admission gate for blocks entering it.
//!
//! ## Architecture
//!
//! ```text
//! Solver  ──ProblemsRegistry / ProblemSolved──→ ┌───────────┐ ──BroadcastBlock / RequestFullLedger──→ Network
//! Network ──FullLedgerOffer / RemoteBlock─────→ │ Validator │ ──Cancel──→ Solver
//!                                                └─────┬─────┘
//!                                                      │ LedgerObserver
//!                                                      ▼
//!                                                  Event Bus
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//! [UNINITIALIZED] ──→ [INITIALIZING] ──→ [RUNNING] ──shutdown / inbox closed──→ [STOPPED]
//!                      load ledger from store,         one message per iteration,
//!                      or request + await snapshot;    idle sleep otherwise
//!                      await problem registry
//! ```
//!
//! ## Admission Rule
//!
//! A block is valid iff its solution checks against the registered problem
//! and re-hashing `(prev, problem, parameters, solution)` reproduces its
//! declared hash. A snapshot is adopted only if every record is valid.
//!
//! ## Example
//!
//! ```rust,ignore
//! use epi_02_validator::{ValidatorDependencies, ValidatorService};
//!
//! let service = ValidatorService::new(deps, inbox, shutdown_rx);
//! let handle = service.spawn()?;
//! // ...
//! shutdown_tx.send(true)?;
//! handle.join().expect("validator panicked")?;
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::{FileLedgerStore, InMemoryLedgerStore, MailboxNetworkGateway, MailboxSolverGateway};
pub use domain::{Admission, AdmissionError, ValidatorConfig};
pub use error::{StoreError, ValidatorError, ValidatorResult};
pub use ports::{LedgerStore, NetworkGateway, SolverGateway};
pub use service::{ValidatorDependencies, ValidatorService};
