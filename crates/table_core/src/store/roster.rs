//! Source of fixtures and rosters for table mode.

use crate::models::{MatchFixture, MatchId};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("Fixture {match_id} not found")]
    NotFound { match_id: MatchId },

    #[error("Roster provider unavailable: {0}")]
    Unavailable(String),
}

/// Read-only access to scheduled fixtures.
pub trait RosterProvider {
    fn fixture(&self, match_id: &MatchId) -> Result<MatchFixture, RosterError>;
}

/// Fixtures held in memory, e.g. loaded from a JSON file.
#[derive(Debug, Clone, Default)]
pub struct StaticRosterProvider {
    fixtures: HashMap<MatchId, MatchFixture>,
}

impl StaticRosterProvider {
    pub fn new(fixtures: impl IntoIterator<Item = MatchFixture>) -> Self {
        Self { fixtures: fixtures.into_iter().map(|f| (f.match_id.clone(), f)).collect() }
    }
}

impl RosterProvider for StaticRosterProvider {
    fn fixture(&self, match_id: &MatchId) -> Result<MatchFixture, RosterError> {
        self.fixtures
            .get(match_id)
            .cloned()
            .ok_or_else(|| RosterError::NotFound { match_id: match_id.clone() })
    }
}
