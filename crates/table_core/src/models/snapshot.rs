//! Immutable, fully described match state published after every command.
//!
//! The snapshot is also the persistence unit: a controller can be rebuilt
//! from one (see `MatchController::resume`).

use super::action::ActionRecord;
use super::period::{Half, PeriodKey};
use super::stats::StatSummary;
use super::team::{MatchId, PlayerId, PlayerIdentity, Sides, TeamSide};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot layout version, bumped on incompatible changes
pub const SCHEMA_VERSION: u32 = 1;

/// Which logical countdown the single clock is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClockMode {
    #[default]
    Period,
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClockSnapshot {
    pub mode: ClockMode,
    pub remaining_ms: u64,
    /// Display value, rounded up so the clock reads 0 only when expired
    pub remaining_seconds: u64,
    pub running: bool,
    /// Period time left while a timeout holds the clock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspended_period_ms: Option<u64>,
    /// Whether the period clock restarts when the timeout ends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_resumes_running: Option<bool>,
}

impl ClockSnapshot {
    pub fn seconds_from_ms(ms: u64) -> u64 {
        ms.div_ceil(1000)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PeriodSnapshot {
    pub current: PeriodKey,
    /// Started and not yet ended
    pub live: bool,
    /// Period that follows the current break
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_break: Option<PeriodKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TimeoutRequest {
    pub side: TeamSide,
    pub requested_at: DateTime<Utc>,
}

/// Timeouts a team consumed in one allotment window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TimeoutUsage {
    pub half: Half,
    pub used: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TimeoutSnapshot {
    pub pending: Sides<Option<TimeoutRequest>>,
    /// Team whose timeout is on the clock
    pub running: Option<TeamSide>,
    /// Earliest outstanding request
    pub next_in_line: Option<TeamSide>,
    pub usage: Sides<Vec<TimeoutUsage>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlayerSnapshot {
    pub identity: PlayerIdentity,
    pub has_played: bool,
    pub on_court: bool,
    pub ejected: bool,
    pub totals: StatSummary,
    pub periods: BTreeMap<PeriodKey, StatSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TeamSnapshot {
    pub name: String,
    pub lineup_confirmed: bool,
    pub on_court: Vec<PlayerId>,
    pub bench: Vec<PlayerId>,
    pub mandatory_exit_pending: bool,
    /// Ejected players still on court
    pub pending_exits: Vec<PlayerId>,
    /// Roster order
    pub players: Vec<PlayerSnapshot>,
    pub totals: StatSummary,
    pub periods: BTreeMap<PeriodKey, StatSummary>,
    pub team_fouls_this_period: u32,
    pub in_bonus: bool,
    /// Left in the current allotment window, `None` outside the match
    pub timeouts_remaining: Option<u32>,
}

impl TeamSnapshot {
    pub fn player(&self, id: &PlayerId) -> Option<&PlayerSnapshot> {
        self.players.iter().find(|p| &p.identity.id == id)
    }

    pub fn points_in(&self, period: PeriodKey) -> u32 {
        self.periods.get(&period).map(|s| s.points).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatchSnapshot {
    pub schema_version: u32,
    pub match_id: MatchId,
    /// Number of published snapshots, this one included
    pub revision: u64,
    pub taken_at: DateTime<Utc>,
    pub period: PeriodSnapshot,
    pub clock: ClockSnapshot,
    pub teams: Sides<TeamSnapshot>,
    pub score: Sides<u32>,
    pub timeouts: TimeoutSnapshot,
    pub history: Vec<ActionRecord>,
    pub can_apply_stat: bool,
    pub can_start_period: bool,
    pub can_end_period: bool,
    /// Period `start_period` currently accepts
    pub next_period: Option<PeriodKey>,
    pub finished: bool,
}

impl MatchSnapshot {
    pub fn team(&self, side: TeamSide) -> &TeamSnapshot {
        self.teams.get(side)
    }

    pub fn player(&self, side: TeamSide, id: &PlayerId) -> Option<&PlayerSnapshot> {
        self.team(side).player(id)
    }

    pub fn is_tied(&self) -> bool {
        self.score.local == self.score.visitor
    }

    /// Published JSON schema for presentation layers
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(MatchSnapshot)
    }
}
