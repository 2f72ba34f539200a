//! # Table Configuration
//!
//! Durations and league rules the engine must not hard-code.
//!
//! ## Usage
//! ```rust
//! use table_core::config::TableConfig;
//!
//! let config = TableConfig::default();
//! let nba = TableConfig::nba();
//! assert!(nba.timing.quarter_secs > config.timing.quarter_secs);
//! ```

mod rules_config;
mod timing_config;

pub use rules_config::RulesConfig;
pub use timing_config::TimingConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use validator::Validate;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON config error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML config error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("Unsupported config format: {path}")]
    UnsupportedFormat { path: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, Default)]
pub struct TableConfig {
    #[serde(default)]
    #[validate]
    pub timing: TimingConfig,
    #[serde(default)]
    #[validate]
    pub rules: RulesConfig,
}

impl TableConfig {
    /// FIBA rules (default)
    pub fn fiba() -> Self {
        Self::default()
    }

    /// NBA rules: longer quarters, six fouls, more timeouts
    pub fn nba() -> Self {
        let mut cfg = Self::default();
        cfg.timing.quarter_secs = 720;
        cfg.timing.break_secs = 130;
        cfg.timing.timeout_secs = 75;
        cfg.rules.foul_limit = 6;
        cfg.rules.timeouts_first_half = 3;
        cfg.rules.timeouts_second_half = 4;
        cfg.rules.timeouts_per_overtime = 2;
        cfg.rules.team_fouls_for_bonus = 4;
        cfg.rules.break_after_quarters = vec![1, 2, 3];
        cfg
    }

    /// Load from a `.json`, `.yaml` or `.yml` file and validate.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let cfg: TableConfig = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&raw)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&raw)?,
            _ => return Err(ConfigError::UnsupportedFormat { path: path.display().to_string() }),
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

// ========== Tests ==========
