use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which bench a team sits on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Local,
    Visitor,
}

impl TeamSide {
    pub const BOTH: [TeamSide; 2] = [TeamSide::Local, TeamSide::Visitor];

    /// The other team
    #[inline]
    pub fn opponent(&self) -> Self {
        match self {
            TeamSide::Local => TeamSide::Visitor,
            TeamSide::Visitor => TeamSide::Local,
        }
    }

    #[inline]
    pub fn is_local(&self) -> bool {
        matches!(self, TeamSide::Local)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TeamSide::Local => "local",
            TeamSide::Visitor => "visitor",
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value held once per team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Sides<T> {
    pub local: T,
    pub visitor: T,
}

impl<T> Sides<T> {
    pub fn new(local: T, visitor: T) -> Self {
        Self { local, visitor }
    }

    pub fn get(&self, side: TeamSide) -> &T {
        match side {
            TeamSide::Local => &self.local,
            TeamSide::Visitor => &self.visitor,
        }
    }

    pub fn get_mut(&mut self, side: TeamSide) -> &mut T {
        match side {
            TeamSide::Local => &mut self.local,
            TeamSide::Visitor => &mut self.visitor,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(TeamSide, &T) -> U) -> Sides<U> {
        Sides { local: f(TeamSide::Local, &self.local), visitor: f(TeamSide::Visitor, &self.visitor) }
    }
}

/// Roster identifier of a player, as issued by the league backend.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identifier of a scheduled game.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct MatchId(pub String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only identity of a rostered player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PlayerIdentity {
    pub id: PlayerId,
    pub name: String,
    pub jersey_number: u8,
    /// Portrait reference in the backend storage bucket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait: Option<String>,
}

impl PlayerIdentity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, jersey_number: u8) -> Self {
        Self { id: PlayerId::new(id), name: name.into(), jersey_number, portrait: None }
    }

    pub fn with_portrait(mut self, portrait: impl Into<String>) -> Self {
        self.portrait = Some(portrait.into());
        self
    }
}

/// Fixed roster handed to the engine at match start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TeamRoster {
    pub team_name: String,
    pub players: Vec<PlayerIdentity>,
}

impl TeamRoster {
    pub fn new(team_name: impl Into<String>, players: Vec<PlayerIdentity>) -> Self {
        Self { team_name: team_name.into(), players }
    }

    pub fn contains(&self, player: &PlayerId) -> bool {
        self.players.iter().any(|p| &p.id == player)
    }

    pub fn find(&self, player: &PlayerId) -> Option<&PlayerIdentity> {
        self.players.iter().find(|p| &p.id == player)
    }
}

/// Backend status of a scheduled game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    InProgress,
    Finished,
}

/// Everything table mode needs to open a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatchFixture {
    pub match_id: MatchId,
    pub status: MatchStatus,
    pub local: TeamRoster,
    pub visitor: TeamRoster,
}

impl MatchFixture {
    pub fn pending(match_id: impl Into<String>, local: TeamRoster, visitor: TeamRoster) -> Self {
        Self { match_id: MatchId::new(match_id), status: MatchStatus::Pending, local, visitor }
    }

    pub fn roster(&self, side: TeamSide) -> &TeamRoster {
        match side {
            TeamSide::Local => &self.local,
            TeamSide::Visitor => &self.visitor,
        }
    }
}
