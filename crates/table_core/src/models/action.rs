use super::period::PeriodKey;
use super::stats::StatAction;
use super::team::{PlayerId, TeamSide};
use chrono::{DateTime, Utc};
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub Uuid);

impl ActionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ActionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl JsonSchema for ActionId {
    fn schema_name() -> String {
        "ActionId".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

/// One stat-mutating command, as it was applied.
///
/// Records are never edited. Undo removes the record after reversing its effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ActionRecord {
    pub id: ActionId,
    pub side: TeamSide,
    pub player: PlayerId,
    pub action: StatAction,
    pub delta: i32,
    /// Period the action was attributed to
    pub period: PeriodKey,
    pub recorded_at: DateTime<Utc>,
}

impl ActionRecord {
    pub fn new(
        side: TeamSide,
        player: PlayerId,
        action: StatAction,
        period: PeriodKey,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self { id: ActionId::new(), side, player, action, delta: 1, period, recorded_at }
    }
}
