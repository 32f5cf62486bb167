//! # Node Configuration
//!
//! Unified configuration for all components and runtime parameters.
//!
//! ## Environment overrides
//!
//! | Variable | Field |
//! |----------|-------|
//! | `EPI_DATA_DIR` | `data_dir` |
//! | `EPI_BEDROCK_DELTA` | `validator.block_tree.bedrock_delta` |
//! | `EPI_BRANCH_LENGTH_DELTA` | `validator.block_tree.branch_length_delta` |
//! | `EPI_IDLE_MS` | `validator.idle_ms`, `solver.idle_ms` |
//! | `EPI_SOLVER_ENABLED` | `solver_enabled` |

use epi_01_block_tree::BlockTreeError;
use epi_02_validator::ValidatorConfig;
use epi_03_solver::SolverConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const ENV_DATA_DIR: &str = "EPI_DATA_DIR";
pub const ENV_BEDROCK_DELTA: &str = "EPI_BEDROCK_DELTA";
pub const ENV_BRANCH_LENGTH_DELTA: &str = "EPI_BRANCH_LENGTH_DELTA";
pub const ENV_IDLE_MS: &str = "EPI_IDLE_MS";
pub const ENV_SOLVER_ENABLED: &str = "EPI_SOLVER_ENABLED";

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Directory holding the persisted ledger.
    pub data_dir: PathBuf,
    /// Validator and block-tree configuration.
    pub validator: ValidatorConfig,
    /// Solver configuration.
    pub solver: SolverConfig,
    /// Run the local solver. Without it the node only validates.
    pub solver_enabled: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            validator: ValidatorConfig::default(),
            solver: SolverConfig::default(),
            solver_enabled: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] BlockTreeError),
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}

fn parse_flag(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue { key, value }),
    }
}

impl NodeConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up by variable name.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup(ENV_BEDROCK_DELTA) {
            self.validator.block_tree.bedrock_delta = parse(ENV_BEDROCK_DELTA, value)?;
        }
        if let Some(value) = lookup(ENV_BRANCH_LENGTH_DELTA) {
            self.validator.block_tree.branch_length_delta = parse(ENV_BRANCH_LENGTH_DELTA, value)?;
        }
        if let Some(value) = lookup(ENV_IDLE_MS) {
            let idle_ms = parse(ENV_IDLE_MS, value)?;
            self.validator.idle_ms = idle_ms;
            self.solver.idle_ms = idle_ms;
        }
        if let Some(value) = lookup(ENV_SOLVER_ENABLED) {
            self.solver_enabled = parse_flag(ENV_SOLVER_ENABLED, value)?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validator.validate()?;
        Ok(())
    }
}
