//! # Adapters
//!
//! Collaborators the node hosts in place of external systems.

pub mod detached_solver;
pub mod standalone_network;

pub use detached_solver::DetachedSolver;
pub use standalone_network::StandaloneNetwork;
