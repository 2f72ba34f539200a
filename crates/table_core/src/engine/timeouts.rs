//! Timeout requests, allotments and arbitration between the two benches.

use crate::config::RulesConfig;
use crate::error::{Result, TableError};
use crate::models::{Half, Sides, TeamSide, TimeoutRequest, TimeoutSnapshot, TimeoutUsage};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeoutArbiter {
    pending: Sides<Option<TimeoutRequest>>,
    usage: Sides<Vec<TimeoutUsage>>,
    running: Option<TeamSide>,
}

impl TimeoutArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self, side: TeamSide) -> Option<&TimeoutRequest> {
        self.pending.get(side).as_ref()
    }

    pub fn running(&self) -> Option<TeamSide> {
        self.running
    }

    pub fn used(&self, side: TeamSide, half: Half) -> u32 {
        self.usage.get(side).iter().find(|u| u.half == half).map(|u| u.used).unwrap_or(0)
    }

    pub fn remaining(&self, side: TeamSide, half: Half, rules: &RulesConfig) -> u32 {
        rules.timeout_allotment(half).saturating_sub(self.used(side, half))
    }

    fn ensure_available(&self, side: TeamSide, half: Half, rules: &RulesConfig) -> Result<()> {
        let used = self.used(side, half);
        let allotted = rules.timeout_allotment(half);
        if used >= allotted {
            return Err(TableError::InsufficientTimeouts { side, used, allotted });
        }
        Ok(())
    }

    /// Register a request. `window` is `None` before tip-off and after the
    /// final buzzer.
    pub fn request(
        &mut self,
        side: TeamSide,
        window: Option<Half>,
        rules: &RulesConfig,
        requested_at: DateTime<Utc>,
    ) -> Result<()> {
        let half = window.ok_or_else(|| {
            TableError::precondition("timeouts can only be requested during the match")
        })?;
        if self.pending.get(side).is_some() {
            return Err(TableError::precondition(format!(
                "{} already has a timeout request outstanding",
                side
            )));
        }
        self.ensure_available(side, half, rules)?;

        *self.pending.get_mut(side) = Some(TimeoutRequest { side, requested_at });
        Ok(())
    }

    /// Grant the team's request and charge it to the allotment. The caller
    /// starts the timeout clock.
    pub fn acknowledge(
        &mut self,
        side: TeamSide,
        half: Half,
        rules: &RulesConfig,
    ) -> Result<TimeoutRequest> {
        if self.pending.get(side).is_none() {
            return Err(TableError::precondition(format!("{} has not requested a timeout", side)));
        }
        if let Some(running) = self.running {
            return Err(TableError::precondition(format!(
                "the {} timeout is still running",
                running
            )));
        }
        self.ensure_available(side, half, rules)?;

        let request = self.pending.get_mut(side).take().ok_or_else(|| {
            TableError::precondition(format!("{} has not requested a timeout", side))
        })?;
        let usage = self.usage.get_mut(side);
        match usage.iter_mut().find(|u| u.half == half) {
            Some(entry) => entry.used += 1,
            None => usage.push(TimeoutUsage { half, used: 1 }),
        }
        self.running = Some(side);
        Ok(request)
    }

    /// Withdraw a request without charging the allotment.
    pub fn cancel(&mut self, side: TeamSide) -> Result<TimeoutRequest> {
        self.pending.get_mut(side).take().ok_or_else(|| {
            TableError::precondition(format!("{} has no timeout request to cancel", side))
        })
    }

    pub fn finish_running(&mut self) -> Option<TeamSide> {
        self.running.take()
    }

    pub fn clear_pending(&mut self) {
        self.pending = Sides::default();
    }

    /// Earliest outstanding request; the local bench wins an exact tie.
    pub fn next_in_line(&self) -> Option<TeamSide> {
        match (&self.pending.local, &self.pending.visitor) {
            (Some(l), Some(v)) if v.requested_at < l.requested_at => Some(TeamSide::Visitor),
            (Some(_), _) => Some(TeamSide::Local),
            (None, Some(_)) => Some(TeamSide::Visitor),
            (None, None) => None,
        }
    }

    pub fn snapshot(&self) -> TimeoutSnapshot {
        TimeoutSnapshot {
            pending: self.pending.clone(),
            running: self.running,
            next_in_line: self.next_in_line(),
            usage: self.usage.clone(),
        }
    }

    pub fn restore(snapshot: &TimeoutSnapshot) -> Self {
        Self {
            pending: snapshot.pending.clone(),
            usage: snapshot.usage.clone(),
            running: snapshot.running,
        }
    }
}
