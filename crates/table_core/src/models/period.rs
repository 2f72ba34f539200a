//! Period tags for the table-mode state machine.
//!
//! `PeriodKey` is used as a map key throughout the ledger, so it serializes as
//! a plain string (`"PRE"`, `"Q1"`, `"DESCANSO"`, `"OT2"`, `"FINISHED"`).

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered period tag. Derived ordering follows the declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PeriodKey {
    Pre,
    Q1,
    Q2,
    Q3,
    /// Break between periods
    Descanso,
    Q4,
    /// Overtime period, numbered from 1
    Overtime(u8),
    Finished,
}

/// Timeout allotments are granted per half; every overtime counts on its own.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Half {
    First,
    Second,
    Overtime(u8),
}

impl PeriodKey {
    /// Regulation quarter by number (1-4).
    pub fn quarter(n: u8) -> Option<Self> {
        match n {
            1 => Some(PeriodKey::Q1),
            2 => Some(PeriodKey::Q2),
            3 => Some(PeriodKey::Q3),
            4 => Some(PeriodKey::Q4),
            _ => None,
        }
    }

    pub fn quarter_number(&self) -> Option<u8> {
        match self {
            PeriodKey::Q1 => Some(1),
            PeriodKey::Q2 => Some(2),
            PeriodKey::Q3 => Some(3),
            PeriodKey::Q4 => Some(4),
            _ => None,
        }
    }

    pub fn is_quarter(&self) -> bool {
        self.quarter_number().is_some()
    }

    pub fn is_overtime(&self) -> bool {
        matches!(self, PeriodKey::Overtime(_))
    }

    /// Quarters and overtimes: the periods where the ball is live.
    pub fn is_playing_period(&self) -> bool {
        self.is_quarter() || self.is_overtime()
    }

    pub fn is_break(&self) -> bool {
        matches!(self, PeriodKey::Descanso)
    }

    pub fn half(&self) -> Option<Half> {
        match self {
            PeriodKey::Q1 | PeriodKey::Q2 => Some(Half::First),
            PeriodKey::Q3 | PeriodKey::Q4 => Some(Half::Second),
            PeriodKey::Overtime(n) => Some(Half::Overtime(*n)),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            PeriodKey::Pre => "PRE".to_string(),
            PeriodKey::Q1 => "Q1".to_string(),
            PeriodKey::Q2 => "Q2".to_string(),
            PeriodKey::Q3 => "Q3".to_string(),
            PeriodKey::Descanso => "DESCANSO".to_string(),
            PeriodKey::Q4 => "Q4".to_string(),
            PeriodKey::Overtime(n) => format!("OT{}", n),
            PeriodKey::Finished => "FINISHED".to_string(),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for PeriodKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRE" => Ok(PeriodKey::Pre),
            "Q1" => Ok(PeriodKey::Q1),
            "Q2" => Ok(PeriodKey::Q2),
            "Q3" => Ok(PeriodKey::Q3),
            "DESCANSO" => Ok(PeriodKey::Descanso),
            "Q4" => Ok(PeriodKey::Q4),
            "FINISHED" => Ok(PeriodKey::Finished),
            other => other
                .strip_prefix("OT")
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| *n >= 1)
                .map(PeriodKey::Overtime)
                .ok_or_else(|| format!("unknown period key: {}", other)),
        }
    }
}

impl From<PeriodKey> for String {
    fn from(key: PeriodKey) -> Self {
        key.label()
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl JsonSchema for PeriodKey {
    fn schema_name() -> String {
        "PeriodKey".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}
