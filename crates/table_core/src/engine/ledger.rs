//! Stat counters at four aggregation levels: player-period, player-total,
//! team-period and team-total.
//!
//! Every update computes all four new lines first and commits them only when
//! each one is in range, so a rejected update leaves the ledger untouched.

use super::lineup::LineupManager;
use crate::error::{Result, TableError};
use crate::models::{
    ActionRecord, CounterOutOfRange, PeriodKey, PlayerId, PlayerIdentity, Sides, StatAction,
    StatLine, TeamSide,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerLedger {
    pub identity: PlayerIdentity,
    pub side: TeamSide,
    pub has_played: bool,
    pub periods: BTreeMap<PeriodKey, StatLine>,
    pub totals: StatLine,
}

impl PlayerLedger {
    pub fn new(identity: PlayerIdentity, side: TeamSide) -> Self {
        Self { identity, side, has_played: false, periods: BTreeMap::new(), totals: StatLine::default() }
    }

    pub fn period(&self, period: PeriodKey) -> StatLine {
        self.periods.get(&period).copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamLedger {
    pub periods: BTreeMap<PeriodKey, StatLine>,
    pub totals: StatLine,
}

impl TeamLedger {
    pub fn period(&self, period: PeriodKey) -> StatLine {
        self.periods.get(&period).copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatLedger {
    players: BTreeMap<PlayerId, PlayerLedger>,
    teams: Sides<TeamLedger>,
}

impl StatLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_player(&mut self, side: TeamSide, identity: PlayerIdentity) {
        self.players.insert(identity.id.clone(), PlayerLedger::new(identity, side));
    }

    pub fn insert_player(&mut self, player: PlayerLedger) {
        self.players.insert(player.identity.id.clone(), player);
    }

    pub fn set_team(&mut self, side: TeamSide, team: TeamLedger) {
        *self.teams.get_mut(side) = team;
    }

    pub fn player(&self, id: &PlayerId) -> Option<&PlayerLedger> {
        self.players.get(id)
    }

    pub fn team(&self, side: TeamSide) -> &TeamLedger {
        self.teams.get(side)
    }

    pub fn score(&self, side: TeamSide) -> u32 {
        self.teams.get(side).totals.points()
    }

    pub fn team_fouls(&self, side: TeamSide, period: PeriodKey) -> u32 {
        self.teams.get(side).period(period).fouls_committed
    }

    /// Flip `has_played` the first time a player takes the court. Returns
    /// `true` if it changed.
    pub fn mark_played(&mut self, id: &PlayerId) -> bool {
        match self.players.get_mut(id) {
            Some(player) if !player.has_played => {
                player.has_played = true;
                true
            }
            _ => false,
        }
    }

    /// Gated stat update from an operator command. Returns the player's new
    /// match totals.
    pub fn apply_delta(
        &mut self,
        lineup: &LineupManager,
        period: PeriodKey,
        side: TeamSide,
        player: &PlayerId,
        action: StatAction,
        delta: i32,
    ) -> Result<StatLine> {
        lineup.check_can_record(player)?;
        self.fold(side, player, action, delta, period, |e| {
            TableError::precondition(format!("{} for {} is out of range", e.counter, player))
        })
    }

    /// Apply the exact inverse of a recorded action. Lineup state is not
    /// consulted: the player may have left the court since.
    pub fn revert(&mut self, record: &ActionRecord) -> Result<StatLine> {
        self.fold(record.side, &record.player, record.action, -record.delta, record.period, |e| {
            TableError::InconsistentUndo { action: record.id, counter: e.counter }
        })
    }

    fn fold(
        &mut self,
        side: TeamSide,
        player: &PlayerId,
        action: StatAction,
        delta: i32,
        period: PeriodKey,
        out_of_range: impl FnOnce(CounterOutOfRange) -> TableError,
    ) -> Result<StatLine> {
        let entry = match self.players.get(player) {
            Some(entry) if entry.side == side => entry,
            _ => return Err(TableError::UnknownPlayer { side, player: player.clone() }),
        };
        let [player_period, player_totals, team_period, team_totals] =
            next_lines(entry, self.teams.get(side), action, delta, period).map_err(out_of_range)?;

        if let Some(entry) = self.players.get_mut(player) {
            store_period(&mut entry.periods, period, player_period);
            entry.totals = player_totals;
        }
        let team = self.teams.get_mut(side);
        store_period(&mut team.periods, period, team_period);
        team.totals = team_totals;
        Ok(player_totals)
    }

    /// Count a granted timeout against the team.
    pub fn record_timeout(&mut self, side: TeamSide, period: PeriodKey) {
        let team = self.teams.get_mut(side);
        let line = team.periods.entry(period).or_default();
        line.timeouts_used = line.timeouts_used.saturating_add(1);
        team.totals.timeouts_used = team.totals.timeouts_used.saturating_add(1);
    }
}

/// Empty lines are not kept, so an undo leaves no trace of the period.
fn store_period(periods: &mut BTreeMap<PeriodKey, StatLine>, period: PeriodKey, line: StatLine) {
    if line == StatLine::default() {
        periods.remove(&period);
    } else {
        periods.insert(period, line);
    }
}

fn next_lines(
    player: &PlayerLedger,
    team: &TeamLedger,
    action: StatAction,
    delta: i32,
    period: PeriodKey,
) -> std::result::Result<[StatLine; 4], CounterOutOfRange> {
    Ok([
        player.period(period).with_delta(action, delta)?,
        player.totals.with_delta(action, delta)?,
        team.period(period).with_delta(action, delta)?,
        team.totals.with_delta(action, delta)?,
    ])
}
