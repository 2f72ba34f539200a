use crate::models::{ActionId, PlayerId, TeamSide};
use crate::store::RosterError;
use thiserror::Error;

/// Typed rejection of an operator command.
///
/// Every variant is recoverable: the command was validated before anything was
/// applied, so the match state is exactly what it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Invalid lineup for {side}: {reason}")]
    InvalidLineup { side: TeamSide, reason: String },

    #[error("Player {0} has fouled out")]
    EjectedPlayer(PlayerId),

    #[error("Player {0} is not on court")]
    NotOnCourt(PlayerId),

    #[error("Player {player} is not on the {side} roster")]
    UnknownPlayer { side: TeamSide, player: PlayerId },

    #[error("The {side} team has no timeouts left ({used}/{allotted} used)")]
    InsufficientTimeouts { side: TeamSide, used: u32, allotted: u32 },

    #[error("Undo of action {action} would drive {counter} negative")]
    InconsistentUndo { action: ActionId, counter: &'static str },

    #[error("Action {0} not found in history")]
    ActionNotFound(ActionId),

    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Roster(#[from] RosterError),
}

impl TableError {
    pub fn precondition(msg: impl Into<String>) -> Self {
        TableError::Precondition(msg.into())
    }

    /// Faults that point at a damaged action history rather than an operator slip.
    pub fn is_history_fault(&self) -> bool {
        matches!(self, TableError::ActionNotFound(_) | TableError::InconsistentUndo { .. })
    }
}

pub type Result<T> = std::result::Result<T, TableError>;
