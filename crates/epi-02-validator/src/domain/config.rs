//! Validator configuration

use epi_01_block_tree::{BlockTreeConfig, BlockTreeResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default idle sleep between empty polls of the inbox.
pub const DEFAULT_IDLE_MS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Sleep this long when the inbox is empty.
    pub idle_ms: u64,
    /// Tuning for the owned ledger.
    pub block_tree: BlockTreeConfig,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            idle_ms: DEFAULT_IDLE_MS,
            block_tree: BlockTreeConfig::default(),
        }
    }
}

impl ValidatorConfig {
    pub fn idle(&self) -> Duration {
        Duration::from_millis(self.idle_ms)
    }

    pub fn validate(&self) -> BlockTreeResult<()> {
        self.block_tree.validate()
    }
}
