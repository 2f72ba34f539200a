//! # table_core - Live Basketball Scorekeeping Engine
//!
//! The courtside "table mode" core: game and timeout clocks, per-player and
//! per-team statistics, lineups and an undo-capable action history, with
//! basketball consistency rules enforced on every operator command.
//!
//! ## Features
//! - Validate-then-apply commands; a rejected command changes nothing
//! - One monotonic countdown shared by the period and timeout clocks
//! - Immutable snapshot plus emitted events after every command
//! - Checkpoints to a pluggable repository (MessagePack + LZ4 + SHA-256 on disk)

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod store;

pub use config::{ConfigError, RulesConfig, TableConfig, TimingConfig};
pub use engine::{
    Command, CommandOutcome, ManualTimeSource, MatchController, SystemTimeSource, TimeSource,
};
pub use error::{Result, TableError};
pub use models::{
    ActionId, MatchEvent, MatchFixture, MatchId, MatchSnapshot, PeriodKey, PlayerId, ShotKind,
    ShotOutcome, StatAction, TeamSide, SCHEMA_VERSION,
};
pub use store::{
    FileRepository, InMemoryRepository, MatchRepository, RepositoryError, RosterProvider,
    StaticRosterProvider,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
