//! League rules that the engine enforces

use crate::models::{Half, PeriodKey};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RulesConfig {
    /// Personal fouls that eject a player (default: 5)
    #[validate(range(min = 1, max = 10))]
    pub foul_limit: u32,
    /// Team timeouts in Q1-Q2 (default: 2)
    #[validate(range(max = 10))]
    pub timeouts_first_half: u32,
    /// Team timeouts in Q3-Q4 (default: 3)
    #[validate(range(max = 10))]
    pub timeouts_second_half: u32,
    /// Team timeouts in each overtime (default: 1)
    #[validate(range(max = 10))]
    pub timeouts_per_overtime: u32,
    /// Team fouls in a period after which the opponent shoots bonus free throws (default: 4)
    #[validate(range(min = 1, max = 20))]
    pub team_fouls_for_bonus: u32,
    /// Quarters followed by a DESCANSO (default: [1, 3])
    #[validate(custom = "validate_break_quarters")]
    pub break_after_quarters: Vec<u8>,
    /// Save a checkpoint to the attached repository at every period end (default: true)
    pub checkpoint_on_period_end: bool,
}

fn validate_break_quarters(quarters: &Vec<u8>) -> Result<(), ValidationError> {
    if quarters.iter().all(|q| (1..=3).contains(q)) {
        Ok(())
    } else {
        Err(ValidationError::new("break_after_quarters must only name quarters 1-3"))
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            foul_limit: 5,
            timeouts_first_half: 2,
            timeouts_second_half: 3,
            timeouts_per_overtime: 1,
            team_fouls_for_bonus: 4,
            break_after_quarters: vec![1, 3],
            checkpoint_on_period_end: true,
        }
    }
}

impl RulesConfig {
    pub fn timeout_allotment(&self, half: Half) -> u32 {
        match half {
            Half::First => self.timeouts_first_half,
            Half::Second => self.timeouts_second_half,
            Half::Overtime(_) => self.timeouts_per_overtime,
        }
    }

    /// Whether a DESCANSO follows the given period. Overtimes are always
    /// preceded by a break, so Q4 and every overtime count here too.
    pub fn break_follows(&self, period: PeriodKey) -> bool {
        match period {
            PeriodKey::Q4 | PeriodKey::Overtime(_) => true,
            other => other.quarter_number().is_some_and(|q| self.break_after_quarters.contains(&q)),
        }
    }
}
