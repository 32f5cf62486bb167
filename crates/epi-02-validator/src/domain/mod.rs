//! Domain layer for the validator

mod admission;
mod config;

pub use admission::*;
pub use config::*;
