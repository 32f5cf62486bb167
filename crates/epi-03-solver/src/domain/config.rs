//! Solver configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_SOLVER_IDLE_MS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Sleep this long when there is nothing to do.
    pub idle_ms: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            idle_ms: DEFAULT_SOLVER_IDLE_MS,
        }
    }
}

impl SolverConfig {
    pub fn idle(&self) -> Duration {
        Duration::from_millis(self.idle_ms)
    }
}
