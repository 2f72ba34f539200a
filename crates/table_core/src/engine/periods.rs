//! Period sequencing: PRE, quarters, breaks, overtimes, FINISHED.
//!
//! Each period is first *ready* (current, clock loaded but not started) and
//! then *live*. Only `start` makes a period live; `end` moves to the next
//! period in the ready state.

use crate::config::{RulesConfig, TimingConfig};
use crate::error::{Result, TableError};
use crate::models::{Half, PeriodKey, PeriodSnapshot};
use std::time::Duration;

/// Outcome of ending a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodTransition {
    pub from: PeriodKey,
    pub to: PeriodKey,
    /// Set when a tie sent the match into another overtime
    pub overtime_scheduled: Option<PeriodKey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodStateMachine {
    current: PeriodKey,
    live: bool,
    after_break: Option<PeriodKey>,
}

impl Default for PeriodStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PeriodStateMachine {
    pub fn new() -> Self {
        Self { current: PeriodKey::Pre, live: false, after_break: None }
    }

    pub fn current(&self) -> PeriodKey {
        self.current
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn is_finished(&self) -> bool {
        self.current == PeriodKey::Finished
    }

    /// Period following the current break
    pub fn after_break(&self) -> Option<PeriodKey> {
        self.after_break
    }

    /// The only period `start` accepts right now.
    pub fn next_startable(&self) -> Option<PeriodKey> {
        if self.live {
            return None;
        }
        match self.current {
            PeriodKey::Pre => Some(PeriodKey::Q1),
            PeriodKey::Finished => None,
            other => Some(other),
        }
    }

    /// Stat commands need a live quarter or overtime.
    pub fn stats_allowed(&self) -> bool {
        self.live && self.current.is_playing_period()
    }

    /// Timeout allotment window requests count against. A break belongs to
    /// the period that follows it.
    pub fn timeout_window(&self) -> Option<Half> {
        match self.current {
            PeriodKey::Descanso => self.after_break.and_then(|p| p.half()),
            other => other.half(),
        }
    }

    pub fn start(&mut self, period: PeriodKey, lineups_ready: bool) -> Result<()> {
        let expected = match self.next_startable() {
            Some(p) => p,
            None if self.live => {
                return Err(TableError::precondition(format!(
                    "{} is still live and must end first",
                    self.current
                )))
            }
            None => return Err(TableError::precondition("the match is finished")),
        };
        if period != expected {
            return Err(TableError::precondition(format!(
                "cannot start {}: the next period is {}",
                period, expected
            )));
        }
        if period.is_playing_period() && !lineups_ready {
            return Err(TableError::precondition(format!(
                "both teams need a confirmed lineup before {}",
                period
            )));
        }

        self.current = period;
        self.live = true;
        Ok(())
    }

    /// End the live period. `tied` decides between FINISHED and another
    /// overtime when regulation or an overtime ends.
    pub fn end(&mut self, tied: bool, rules: &RulesConfig) -> Result<PeriodTransition> {
        if !self.live {
            return Err(TableError::precondition(format!("{} is not live", self.current)));
        }
        self.advance(tied, rules)
    }

    /// Manual end of a break, started or not.
    pub fn end_break(&mut self, rules: &RulesConfig) -> Result<PeriodTransition> {
        if self.current != PeriodKey::Descanso {
            return Err(TableError::precondition(format!(
                "only a break can be ended manually, current period is {}",
                self.current
            )));
        }
        self.advance(false, rules)
    }

    fn advance(&mut self, tied: bool, rules: &RulesConfig) -> Result<PeriodTransition> {
        let from = self.current;
        let mut overtime_scheduled = None;

        let (to, after_break) = match from {
            PeriodKey::Descanso => {
                let next = self.after_break.ok_or_else(|| {
                    TableError::precondition("break has no following period")
                })?;
                (next, None)
            }
            PeriodKey::Q1 | PeriodKey::Q2 | PeriodKey::Q3 => {
                let n = from.quarter_number().unwrap_or(1);
                let next = PeriodKey::quarter(n + 1).unwrap_or(PeriodKey::Q4);
                if rules.break_follows(from) {
                    (PeriodKey::Descanso, Some(next))
                } else {
                    (next, None)
                }
            }
            PeriodKey::Q4 | PeriodKey::Overtime(_) if tied => {
                let n = match from {
                    PeriodKey::Overtime(n) => n.checked_add(1).ok_or_else(|| {
                        TableError::precondition("overtime limit reached")
                    })?,
                    _ => 1,
                };
                let next = PeriodKey::Overtime(n);
                overtime_scheduled = Some(next);
                (PeriodKey::Descanso, Some(next))
            }
            PeriodKey::Q4 | PeriodKey::Overtime(_) => (PeriodKey::Finished, None),
            PeriodKey::Pre | PeriodKey::Finished => {
                return Err(TableError::precondition(format!("{} cannot be ended", from)));
            }
        };

        self.current = to;
        self.live = false;
        self.after_break = after_break;
        Ok(PeriodTransition { from, to, overtime_scheduled })
    }

    /// Operator override: jump straight to FINISHED from anywhere.
    pub fn abort(&mut self) -> PeriodKey {
        let from = self.current;
        self.current = PeriodKey::Finished;
        self.live = false;
        self.after_break = None;
        from
    }

    pub fn snapshot(&self) -> PeriodSnapshot {
        PeriodSnapshot { current: self.current, live: self.live, after_break: self.after_break }
    }

    pub fn restore(snapshot: &PeriodSnapshot) -> Self {
        Self { current: snapshot.current, live: snapshot.live, after_break: snapshot.after_break }
    }
}

/// Nominal clock duration of a period.
pub fn duration_for(period: PeriodKey, timing: &TimingConfig) -> Duration {
    match period {
        PeriodKey::Q1 | PeriodKey::Q2 | PeriodKey::Q3 | PeriodKey::Q4 => timing.quarter(),
        PeriodKey::Overtime(_) => timing.overtime(),
        PeriodKey::Descanso => timing.break_time(),
        PeriodKey::Pre | PeriodKey::Finished => Duration::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_period(psm: &mut PeriodStateMachine, tied: bool, rules: &RulesConfig) -> PeriodKey {
        let p = psm.next_startable().unwrap();
        psm.start(p, true).unwrap();
        psm.end(tied, rules).unwrap().to
    }

    #[test]
    fn test_regulation_sequence() {
        let rules = RulesConfig::default();
        let mut psm = PeriodStateMachine::new();
        let mut seen = vec![psm.current()];
        while !psm.is_finished() {
            seen.push(run_period(&mut psm, false, &rules));
        }
        assert_eq!(
            seen,
            vec![
                PeriodKey::Pre,
                PeriodKey::Descanso,
                PeriodKey::Q2,
                PeriodKey::Q3,
                PeriodKey::Descanso,
                PeriodKey::Q4,
                PeriodKey::Finished,
            ]
        );
    }

    #[test]
    fn test_tie_schedules_overtimes() {
        let rules = RulesConfig::default();
        let mut psm = PeriodStateMachine::new();
        for _ in 0..5 {
            run_period(&mut psm, false, &rules);
        }
        assert_eq!(psm.current(), PeriodKey::Q4);

        psm.start(PeriodKey::Q4, true).unwrap();
        let t = psm.end(true, &rules).unwrap();
        assert_eq!(t.to, PeriodKey::Descanso);
        assert_eq!(t.overtime_scheduled, Some(PeriodKey::Overtime(1)));
        assert_eq!(psm.after_break(), Some(PeriodKey::Overtime(1)));

        // Break, OT1 tied again, break, OT2 decided
        assert_eq!(run_period(&mut psm, false, &rules), PeriodKey::Overtime(1));
        assert_eq!(run_period(&mut psm, true, &rules), PeriodKey::Descanso);
        assert_eq!(psm.after_break(), Some(PeriodKey::Overtime(2)));
        assert_eq!(run_period(&mut psm, false, &rules), PeriodKey::Overtime(2));
        assert_eq!(run_period(&mut psm, false, &rules), PeriodKey::Finished);
    }

    #[test]
    fn test_start_requires_expected_period_and_lineups() {
        let mut psm = PeriodStateMachine::new();
        assert_eq!(psm.next_startable(), Some(PeriodKey::Q1));
        assert!(psm.start(PeriodKey::Q2, true).is_err());
        assert!(psm.start(PeriodKey::Q1, false).is_err());
        assert_eq!(psm.current(), PeriodKey::Pre);

        psm.start(PeriodKey::Q1, true).unwrap();
        assert!(psm.stats_allowed());
        assert_eq!(psm.next_startable(), None);
        assert!(psm.start(PeriodKey::Q1, true).is_err());
    }

    #[test]
    fn test_break_needs_no_lineups() {
        let rules = RulesConfig::default();
        let mut psm = PeriodStateMachine::new();
        run_period(&mut psm, false, &rules);
        psm.start(PeriodKey::Descanso, false).unwrap();
        assert!(!psm.stats_allowed());
    }

    #[test]
    fn test_manual_end_only_for_breaks() {
        let rules = RulesConfig::default();
        let mut psm = PeriodStateMachine::new();
        psm.start(PeriodKey::Q1, true).unwrap();
        assert!(psm.end_break(&rules).is_err());

        psm.end(false, &rules).unwrap();
        // A ready break can be skipped without starting it
        let t = psm.end_break(&rules).unwrap();
        assert_eq!(t.to, PeriodKey::Q2);
        assert!(!psm.is_live());
    }

    #[test]
    fn test_configured_breaks() {
        let rules = RulesConfig { break_after_quarters: vec![2], ..Default::default() };
        let mut psm = PeriodStateMachine::new();
        assert_eq!(run_period(&mut psm, false, &rules), PeriodKey::Q2);
        assert_eq!(run_period(&mut psm, false, &rules), PeriodKey::Descanso);
        assert_eq!(psm.after_break(), Some(PeriodKey::Q3));
    }

    #[test]
    fn test_abort_from_anywhere() {
        let mut psm = PeriodStateMachine::new();
        psm.start(PeriodKey::Q1, true).unwrap();
        assert_eq!(psm.abort(), PeriodKey::Q1);
        assert!(psm.is_finished());
        assert_eq!(psm.next_startable(), None);
        assert!(psm.end(false, &RulesConfig::default()).is_err());
    }

    #[test]
    fn test_timeout_window() {
        let rules = RulesConfig::default();
        let mut psm = PeriodStateMachine::new();
        assert_eq!(psm.timeout_window(), None);
        run_period(&mut psm, false, &rules);
        // Break after Q1 still counts as the first half
        assert_eq!(psm.timeout_window(), Some(Half::First));
        psm.end_break(&rules).unwrap();
        run_period(&mut psm, false, &rules);
        assert_eq!(psm.current(), PeriodKey::Q3);
        assert_eq!(psm.timeout_window(), Some(Half::Second));
    }

    #[test]
    fn test_durations() {
        let timing = TimingConfig::default();
        assert_eq!(duration_for(PeriodKey::Q3, &timing), Duration::from_secs(600));
        assert_eq!(duration_for(PeriodKey::Overtime(2), &timing), Duration::from_secs(300));
        assert_eq!(duration_for(PeriodKey::Descanso, &timing), Duration::from_secs(120));
        assert_eq!(duration_for(PeriodKey::Finished, &timing), Duration::ZERO);
    }
}
