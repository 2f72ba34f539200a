//! Single countdown multiplexed between the period clock and the timeout clock.
//!
//! Remaining time is never decremented on a tick. A running countdown keeps the
//! instant it was (re)started and the time it had left at that instant; the
//! remaining time is derived from elapsed monotonic time whenever it is read.

use crate::models::{ClockMode, ClockSnapshot};
use std::time::{Duration, Instant};

/// A countdown reached zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockExpiry {
    Period,
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Countdown {
    Stopped { remaining: Duration },
    Running { anchor: Instant, remaining_at_anchor: Duration },
}

impl Countdown {
    fn remaining(&self, now: Instant) -> Duration {
        match *self {
            Countdown::Stopped { remaining } => remaining,
            Countdown::Running { anchor, remaining_at_anchor } => {
                remaining_at_anchor.saturating_sub(now.saturating_duration_since(anchor))
            }
        }
    }

    fn is_running(&self) -> bool {
        matches!(self, Countdown::Running { .. })
    }

    /// Instant at which a running countdown hits zero
    fn deadline(&self) -> Option<Instant> {
        match *self {
            Countdown::Running { anchor, remaining_at_anchor } => {
                anchor.checked_add(remaining_at_anchor)
            }
            Countdown::Stopped { .. } => None,
        }
    }
}

/// Period clock parked while a timeout runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SuspendedPeriod {
    remaining: Duration,
    was_running: bool,
    armed: bool,
}

#[derive(Debug, Clone)]
pub struct ClockEngine {
    mode: ClockMode,
    countdown: Countdown,
    /// Cleared once the current countdown has reported its expiry
    armed: bool,
    suspended: Option<SuspendedPeriod>,
}

impl Default for ClockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockEngine {
    pub fn new() -> Self {
        Self {
            mode: ClockMode::Period,
            countdown: Countdown::Stopped { remaining: Duration::ZERO },
            armed: false,
            suspended: None,
        }
    }

    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.countdown.is_running()
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.countdown.remaining(now)
    }

    /// Period time parked behind a running timeout
    pub fn suspended_period(&self) -> Option<Duration> {
        self.suspended.map(|s| s.remaining)
    }

    /// Load a stopped period countdown. Any timeout in progress is discarded.
    pub fn load(&mut self, duration: Duration) {
        self.mode = ClockMode::Period;
        self.countdown = Countdown::Stopped { remaining: duration };
        self.armed = !duration.is_zero();
        self.suspended = None;
    }

    pub fn reset_and_start(&mut self, duration: Duration, now: Instant) {
        self.load(duration);
        self.resume(now);
    }

    /// Returns `false` when the active countdown was not running.
    pub fn pause(&mut self, now: Instant) -> bool {
        if !self.countdown.is_running() {
            return false;
        }
        self.countdown = Countdown::Stopped { remaining: self.countdown.remaining(now) };
        true
    }

    /// Re-anchor the active countdown at `now`. Returns `false` when it is
    /// already running or has nothing left.
    pub fn resume(&mut self, now: Instant) -> bool {
        match self.countdown {
            Countdown::Stopped { remaining } if !remaining.is_zero() => {
                self.countdown = Countdown::Running { anchor: now, remaining_at_anchor: remaining };
                true
            }
            _ => false,
        }
    }

    /// Park the period clock and run a timeout countdown from `now`.
    /// Returns `false` when a timeout already holds the clock.
    pub fn switch_to_timeout(&mut self, duration: Duration, now: Instant) -> bool {
        if self.mode == ClockMode::Timeout {
            return false;
        }
        self.suspended = Some(SuspendedPeriod {
            remaining: self.countdown.remaining(now),
            was_running: self.countdown.is_running(),
            armed: self.armed,
        });
        self.mode = ClockMode::Timeout;
        self.countdown = Countdown::Running { anchor: now, remaining_at_anchor: duration };
        self.armed = true;
        true
    }

    /// Cut the running timeout short. The period clock comes back exactly as
    /// it was parked, re-anchored at `now`.
    pub fn end_timeout(&mut self, now: Instant) -> bool {
        if self.mode != ClockMode::Timeout {
            return false;
        }
        self.restore_period(now);
        true
    }

    fn restore_period(&mut self, anchor: Instant) {
        let parked = self.suspended.take().unwrap_or(SuspendedPeriod {
            remaining: Duration::ZERO,
            was_running: false,
            armed: false,
        });
        self.mode = ClockMode::Period;
        self.countdown = if parked.was_running && !parked.remaining.is_zero() {
            Countdown::Running { anchor, remaining_at_anchor: parked.remaining }
        } else {
            Countdown::Stopped { remaining: parked.remaining }
        };
        self.armed = parked.armed;
    }

    /// Report an expiry at most once per countdown.
    ///
    /// A timeout that expired restores the period clock anchored at the
    /// instant the timeout hit zero, so a late tick loses no period time. Call
    /// again until `None`: the restored period clock may itself have expired.
    pub fn tick(&mut self, now: Instant) -> Option<ClockExpiry> {
        if !self.armed || !self.countdown.remaining(now).is_zero() {
            return None;
        }
        self.armed = false;
        match self.mode {
            ClockMode::Period => {
                self.countdown = Countdown::Stopped { remaining: Duration::ZERO };
                Some(ClockExpiry::Period)
            }
            ClockMode::Timeout => {
                let expired_at = self.countdown.deadline().unwrap_or(now);
                self.restore_period(expired_at);
                Some(ClockExpiry::Timeout)
            }
        }
    }

    pub fn snapshot(&self, now: Instant) -> ClockSnapshot {
        let remaining_ms = duration_ms(self.countdown.remaining(now));
        ClockSnapshot {
            mode: self.mode,
            remaining_ms,
            remaining_seconds: ClockSnapshot::seconds_from_ms(remaining_ms),
            running: self.countdown.is_running(),
            suspended_period_ms: self.suspended.map(|s| duration_ms(s.remaining)),
            period_resumes_running: self.suspended.map(|s| s.was_running),
        }
    }

    /// Rebuild from a stored snapshot. The active countdown comes back paused.
    ///
    /// A countdown that belongs to a live period stays armed even at zero, so
    /// an expiry the snapshot was taken ahead of still fires on the next tick.
    pub fn restore(snapshot: &ClockSnapshot, period_live: bool) -> Self {
        let remaining = Duration::from_millis(snapshot.remaining_ms);
        // Timeouts only run inside a live period
        let suspended = snapshot.suspended_period_ms.map(|ms| SuspendedPeriod {
            remaining: Duration::from_millis(ms),
            was_running: snapshot.period_resumes_running.unwrap_or(false),
            armed: true,
        });
        let armed = match snapshot.mode {
            ClockMode::Timeout => true,
            ClockMode::Period => period_live || !remaining.is_zero(),
        };
        Self {
            mode: snapshot.mode,
            countdown: Countdown::Stopped { remaining },
            armed,
            suspended: if snapshot.mode == ClockMode::Timeout { suspended } else { None },
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
