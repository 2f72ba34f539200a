//! Clock durations

use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Nominal durations of every countdown the table runs, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TimingConfig {
    /// Regulation quarter (default: 600)
    #[validate(range(min = 1, max = 3600))]
    pub quarter_secs: u32,
    /// Overtime period (default: 300)
    #[validate(range(min = 1, max = 3600))]
    pub overtime_secs: u32,
    /// Break between periods (default: 120)
    #[validate(range(min = 1, max = 3600))]
    pub break_secs: u32,
    /// Team timeout (default: 60)
    #[validate(range(min = 1, max = 600))]
    pub timeout_secs: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { quarter_secs: 600, overtime_secs: 300, break_secs: 120, timeout_secs: 60 }
    }
}

impl TimingConfig {
    pub fn quarter(&self) -> Duration {
        Duration::from_secs(self.quarter_secs.into())
    }

    pub fn overtime(&self) -> Duration {
        Duration::from_secs(self.overtime_secs.into())
    }

    pub fn break_time(&self) -> Duration {
        Duration::from_secs(self.break_secs.into())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.into())
    }
}
