//! Statistic counters shared by players and teams.
//!
//! `StatLine` carries only raw counters. Points are always derived from the
//! three shot buckets, so a line can never disagree with its own score.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shot buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum ShotKind {
    FreeThrow,
    TwoPointer,
    ThreePointer,
}

impl ShotKind {
    pub fn point_value(&self) -> u32 {
        match self {
            ShotKind::FreeThrow => 1,
            ShotKind::TwoPointer => 2,
            ShotKind::ThreePointer => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum ShotOutcome {
    Made,
    Missed,
}

/// A stat-mutating operator action.
///
/// Only shots carry an outcome; the other kinds are plain counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatAction {
    Shot { shot: ShotKind, outcome: ShotOutcome },
    Assist,
    Rebound,
    Foul,
}

impl StatAction {
    pub fn made(shot: ShotKind) -> Self {
        StatAction::Shot { shot, outcome: ShotOutcome::Made }
    }

    pub fn missed(shot: ShotKind) -> Self {
        StatAction::Shot { shot, outcome: ShotOutcome::Missed }
    }

    pub fn is_foul(&self) -> bool {
        matches!(self, StatAction::Foul)
    }

    /// Name of the counter this action moves
    pub fn counter_name(&self) -> &'static str {
        match self {
            StatAction::Shot { shot: ShotKind::FreeThrow, outcome: ShotOutcome::Made } => {
                "free_throws.made"
            }
            StatAction::Shot { shot: ShotKind::FreeThrow, outcome: ShotOutcome::Missed } => {
                "free_throws.missed"
            }
            StatAction::Shot { shot: ShotKind::TwoPointer, outcome: ShotOutcome::Made } => {
                "two_pointers.made"
            }
            StatAction::Shot { shot: ShotKind::TwoPointer, outcome: ShotOutcome::Missed } => {
                "two_pointers.missed"
            }
            StatAction::Shot { shot: ShotKind::ThreePointer, outcome: ShotOutcome::Made } => {
                "three_pointers.made"
            }
            StatAction::Shot { shot: ShotKind::ThreePointer, outcome: ShotOutcome::Missed } => {
                "three_pointers.missed"
            }
            StatAction::Assist => "assists",
            StatAction::Rebound => "rebounds",
            StatAction::Foul => "fouls_committed",
        }
    }
}

impl fmt::Display for StatAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.counter_name())
    }
}

/// A counter update would leave the line negative (or overflow).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterOutOfRange {
    pub counter: &'static str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ShotStat {
    pub made: u32,
    pub missed: u32,
}

impl ShotStat {
    pub fn attempts(&self) -> u32 {
        self.made + self.missed
    }

    /// Percentage of made shots, `None` without attempts
    pub fn percentage(&self) -> Option<f32> {
        percentage(self.made, self.attempts())
    }
}

fn percentage(made: u32, attempts: u32) -> Option<f32> {
    if attempts == 0 {
        None
    } else {
        Some(made as f32 / attempts as f32 * 100.0)
    }
}

fn shifted(value: u32, delta: i32, counter: &'static str) -> Result<u32, CounterOutOfRange> {
    value.checked_add_signed(delta).ok_or(CounterOutOfRange { counter })
}

/// Raw counters of one player or team over one period (or the whole match).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StatLine {
    pub free_throws: ShotStat,
    pub two_pointers: ShotStat,
    pub three_pointers: ShotStat,
    pub assists: u32,
    pub rebounds: u32,
    pub fouls_committed: u32,
    pub timeouts_used: u32,
}

impl StatLine {
    pub fn points(&self) -> u32 {
        self.free_throws.made + 2 * self.two_pointers.made + 3 * self.three_pointers.made
    }

    pub fn shot(&self, kind: ShotKind) -> &ShotStat {
        match kind {
            ShotKind::FreeThrow => &self.free_throws,
            ShotKind::TwoPointer => &self.two_pointers,
            ShotKind::ThreePointer => &self.three_pointers,
        }
    }

    fn shot_mut(&mut self, kind: ShotKind) -> &mut ShotStat {
        match kind {
            ShotKind::FreeThrow => &mut self.free_throws,
            ShotKind::TwoPointer => &mut self.two_pointers,
            ShotKind::ThreePointer => &mut self.three_pointers,
        }
    }

    /// Field goals (two and three pointers combined)
    pub fn field_goals(&self) -> ShotStat {
        ShotStat {
            made: self.two_pointers.made + self.three_pointers.made,
            missed: self.two_pointers.missed + self.three_pointers.missed,
        }
    }

    /// Copy of this line with `delta` applied to the counter `action` targets.
    pub fn with_delta(&self, action: StatAction, delta: i32) -> Result<StatLine, CounterOutOfRange> {
        let mut next = *self;
        let counter = action.counter_name();
        match action {
            StatAction::Shot { shot, outcome } => {
                let bucket = next.shot_mut(shot);
                match outcome {
                    ShotOutcome::Made => bucket.made = shifted(bucket.made, delta, counter)?,
                    ShotOutcome::Missed => bucket.missed = shifted(bucket.missed, delta, counter)?,
                }
            }
            StatAction::Assist => next.assists = shifted(next.assists, delta, counter)?,
            StatAction::Rebound => next.rebounds = shifted(next.rebounds, delta, counter)?,
            StatAction::Foul => {
                next.fouls_committed = shifted(next.fouls_committed, delta, counter)?
            }
        }
        Ok(next)
    }

    pub fn summary(&self) -> StatSummary {
        StatSummary::from(self)
    }
}

/// Presentation view of a `StatLine`: raw counters plus derived values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StatSummary {
    pub points: u32,
    pub free_throws: ShotStat,
    pub two_pointers: ShotStat,
    pub three_pointers: ShotStat,
    pub assists: u32,
    pub rebounds: u32,
    pub fouls_committed: u32,
    pub timeouts_used: u32,
    pub field_goal_pct: Option<f32>,
    pub two_point_pct: Option<f32>,
    pub three_point_pct: Option<f32>,
    pub free_throw_pct: Option<f32>,
}

impl From<&StatLine> for StatSummary {
    fn from(line: &StatLine) -> Self {
        Self {
            points: line.points(),
            free_throws: line.free_throws,
            two_pointers: line.two_pointers,
            three_pointers: line.three_pointers,
            assists: line.assists,
            rebounds: line.rebounds,
            fouls_committed: line.fouls_committed,
            timeouts_used: line.timeouts_used,
            field_goal_pct: line.field_goals().percentage(),
            two_point_pct: line.two_pointers.percentage(),
            three_point_pct: line.three_pointers.percentage(),
            free_throw_pct: line.free_throws.percentage(),
        }
    }
}

impl From<&StatSummary> for StatLine {
    /// Derived fields are dropped; points are recomputed on demand.
    fn from(summary: &StatSummary) -> Self {
        Self {
            free_throws: summary.free_throws,
            two_pointers: summary.two_pointers,
            three_pointers: summary.three_pointers,
            assists: summary.assists,
            rebounds: summary.rebounds,
            fouls_committed: summary.fouls_committed,
            timeouts_used: summary.timeouts_used,
        }
    }
}
