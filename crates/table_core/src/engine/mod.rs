//! Table-mode engine components, leaf first: ledger, history, lineups,
//! timeouts, clock, periods, and the controller composing them.

pub mod clock;
pub mod command;
pub mod controller;
pub mod history;
pub mod ledger;
pub mod lineup;
pub mod periods;
pub mod scheduler;
pub mod timeouts;

#[cfg(test)]
mod proptests;

pub use clock::{ClockEngine, ClockExpiry};
pub use command::{Command, CommandOutcome};
pub use controller::MatchController;
pub use history::ActionHistory;
pub use ledger::{PlayerLedger, StatLedger, TeamLedger};
pub use lineup::{LineupManager, SubstitutionResult, LINEUP_SIZE};
pub use periods::{duration_for, PeriodStateMachine, PeriodTransition};
pub use scheduler::{next_wakeup, ManualTimeSource, SystemTimeSource, TimeSource};
pub use timeouts::TimeoutArbiter;
