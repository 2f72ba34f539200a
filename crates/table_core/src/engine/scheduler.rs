//! Time sources and wake-up planning for the driver that calls `tick`.

use super::clock::ClockEngine;
use chrono::{DateTime, Utc};
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time for the clock plus wall time for record timestamps.
pub trait TimeSource {
    fn now(&self) -> Instant;
    fn wall_clock(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall_clock(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-driven time. Clones share the same offset, so a test can keep one
/// handle while the controller owns another.
#[derive(Debug, Clone)]
pub struct ManualTimeSource {
    base: Instant,
    base_wall: DateTime<Utc>,
    offset: Rc<Cell<Duration>>,
}

impl Default for ManualTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    pub fn starting_at(base_wall: DateTime<Utc>) -> Self {
        Self { base: Instant::now(), base_wall, offset: Rc::new(Cell::new(Duration::ZERO)) }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    /// Move to an absolute offset from the start. Time never runs backwards.
    pub fn set_elapsed(&self, elapsed: Duration) {
        if elapsed > self.offset.get() {
            self.offset.set(elapsed);
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }

    fn wall_clock(&self) -> DateTime<Utc> {
        chrono::Duration::from_std(self.offset.get())
            .ok()
            .and_then(|d| self.base_wall.checked_add_signed(d))
            .unwrap_or(self.base_wall)
    }
}

/// How long the driver may sleep before a tick can change what the table
/// shows: the next whole-second boundary of the display, or the expiry if
/// that comes first. `None` while the clock is stopped.
pub fn next_wakeup(clock: &ClockEngine, now: Instant) -> Option<Duration> {
    if !clock.is_running() {
        return None;
    }
    let remaining = clock.remaining(now);
    let fraction = Duration::from_nanos(u64::from(remaining.subsec_nanos()));
    let until_display_change = if fraction.is_zero() { Duration::from_secs(1) } else { fraction };
    Some(until_display_change.min(remaining))
}
