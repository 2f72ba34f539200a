//! Side effects emitted by the engine for the presentation layer.

use super::action::ActionId;
use super::period::PeriodKey;
use super::snapshot::ClockMode;
use super::stats::StatAction;
use super::team::{PlayerId, Sides, TeamSide};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventSeverity {
    Info,
    /// Operator decisions or degraded collaborators; never a rejected command
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    PeriodStarted {
        period: PeriodKey,
    },
    PeriodEnded {
        period: PeriodKey,
        next: PeriodKey,
    },
    /// Regulation or an overtime ended tied
    OvertimeScheduled {
        period: PeriodKey,
    },
    MatchFinished {
        score: Sides<u32>,
    },
    /// Operator forced the match to FINISHED
    MatchAborted {
        period: PeriodKey,
    },
    ClockPaused {
        mode: ClockMode,
    },
    ClockResumed {
        mode: ClockMode,
    },
    LineupConfirmed {
        side: TeamSide,
        players: Vec<PlayerId>,
    },
    Substitution {
        side: TeamSide,
        player_out: PlayerId,
        player_in: PlayerId,
    },
    StatRecorded {
        action_id: ActionId,
        side: TeamSide,
        player: PlayerId,
        action: StatAction,
    },
    ActionUndone {
        action_id: ActionId,
        side: TeamSide,
        player: PlayerId,
        action: StatAction,
    },
    PlayerFouledOut {
        side: TeamSide,
        player: PlayerId,
        fouls: u32,
    },
    /// Undo brought an ejected player back under the foul limit
    PlayerReinstated {
        side: TeamSide,
        player: PlayerId,
    },
    MandatoryExitResolved {
        side: TeamSide,
        player: PlayerId,
    },
    /// Team fouls in the current period reached the bonus threshold
    TeamFoulLimitReached {
        side: TeamSide,
        period: PeriodKey,
        fouls: u32,
    },
    TimeoutRequested {
        side: TeamSide,
    },
    TimeoutCancelled {
        side: TeamSide,
    },
    TimeoutStarted {
        side: TeamSide,
        duration_secs: u32,
    },
    TimeoutEnded {
        side: TeamSide,
        /// Cut short by the operator
        early: bool,
    },
    PersistenceFailed {
        reason: String,
    },
}

impl MatchEvent {
    pub fn severity(&self) -> EventSeverity {
        match self {
            MatchEvent::MatchAborted { .. } | MatchEvent::PersistenceFailed { .. } => {
                EventSeverity::Warning
            }
            _ => EventSeverity::Info,
        }
    }
}
