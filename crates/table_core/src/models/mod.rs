pub mod action;
pub mod events;
pub mod period;
pub mod snapshot;
pub mod stats;
pub mod team;

pub use action::{ActionId, ActionRecord};
pub use events::{EventSeverity, MatchEvent};
pub use period::{Half, PeriodKey};
pub use snapshot::{
    ClockMode, ClockSnapshot, MatchSnapshot, PeriodSnapshot, PlayerSnapshot, TeamSnapshot,
    TimeoutRequest, TimeoutSnapshot, TimeoutUsage, SCHEMA_VERSION,
};
pub use stats::{CounterOutOfRange, ShotKind, ShotOutcome, ShotStat, StatAction, StatLine, StatSummary};
pub use team::{
    MatchFixture, MatchId, MatchStatus, PlayerId, PlayerIdentity, Sides, TeamRoster, TeamSide,
};
