//! # Node Container
//!
//! Configuration for every component hosted by the node.

pub mod config;

pub use config::{ConfigError, NodeConfig};
