//! Operator commands as data, for uniform dispatch through
//! `MatchController::execute`.

use crate::models::{ActionId, MatchEvent, MatchSnapshot, PeriodKey, PlayerId, StatAction, TeamSide};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    StartPeriod { period: PeriodKey },
    EndPeriodManually,
    AbortToFinished,
    PauseClock,
    ResumeClock,
    ConfirmLineup { side: TeamSide, players: Vec<PlayerId> },
    Substitute { side: TeamSide, player_out: PlayerId, player_in: PlayerId },
    ApplyStat { side: TeamSide, player: PlayerId, action: StatAction },
    UndoAction { action_id: ActionId },
    /// Undo the most recent matching record
    UndoLatest { side: TeamSide, player: PlayerId, action: StatAction },
    RequestTimeout { side: TeamSide },
    AcknowledgeTimeout { side: TeamSide },
    CancelTimeout { side: TeamSide },
    EndTimeout,
    Tick,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::StartPeriod { .. } => "start_period",
            Command::EndPeriodManually => "end_period_manually",
            Command::AbortToFinished => "abort_to_finished",
            Command::PauseClock => "pause_clock",
            Command::ResumeClock => "resume_clock",
            Command::ConfirmLineup { .. } => "confirm_lineup",
            Command::Substitute { .. } => "substitute",
            Command::ApplyStat { .. } => "apply_stat",
            Command::UndoAction { .. } => "undo_action",
            Command::UndoLatest { .. } => "undo_latest",
            Command::RequestTimeout { .. } => "request_timeout",
            Command::AcknowledgeTimeout { .. } => "acknowledge_timeout",
            Command::CancelTimeout { .. } => "cancel_timeout",
            Command::EndTimeout => "end_timeout",
            Command::Tick => "tick",
        }
    }
}

/// New snapshot plus the side effects the command produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CommandOutcome {
    pub snapshot: MatchSnapshot,
    pub events: Vec<MatchEvent>,
}

impl CommandOutcome {
    /// Id of the action a stat command appended to the history
    pub fn recorded_action(&self) -> Option<ActionId> {
        self.events.iter().find_map(|e| match e {
            MatchEvent::StatRecorded { action_id, .. } => Some(*action_id),
            _ => None,
        })
    }
}
