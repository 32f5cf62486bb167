//! # Shared Types Crate
//!
//! This crate contains the domain entities, the inter-component messages and
//! the problem registry shared by every component of the node.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-component types are defined here.
//! - **Immutable Messages**: Every message crossing a thread boundary is an
//!   owned, immutable value. Components never share mutable state.
//! - **Content Addressing**: A block's hash is derived from its predecessor
//!   and its contents; it is never chosen by the producer.

pub mod entities;
pub mod errors;
pub mod ipc;
pub mod problems;

pub use entities::*;
pub use errors::*;
pub use ipc::*;
pub use problems::*;
