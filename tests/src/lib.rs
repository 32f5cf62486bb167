//! # Epichain Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs      # Solver → Validator → Network wiring, driven step by step
//!     └── node.rs       # Full NodeRuntime runs: solve, persist, restart
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p epi-tests
//! cargo test -p epi-tests integration::flows
//! ```

pub mod integration;
