//! Match orchestrator for table mode.
//!
//! `MatchController` owns every component, validates each operator command
//! against the current period, clock and lineups, applies it, and publishes a
//! fresh `MatchSnapshot` with the events the command produced. A rejected
//! command leaves the match exactly as it was.
//!
//! Clock expiries are processed lazily: every command (and `tick`) first
//! brings the clock up to the current instant, so events caused by time
//! passing are published with the next outcome.

use super::clock::{ClockEngine, ClockExpiry};
use super::command::{Command, CommandOutcome};
use super::history::ActionHistory;
use super::ledger::{PlayerLedger, StatLedger, TeamLedger};
use super::lineup::{LineupManager, LINEUP_SIZE};
use super::periods::{duration_for, PeriodStateMachine, PeriodTransition};
use super::scheduler::{next_wakeup, SystemTimeSource, TimeSource};
use super::timeouts::TimeoutArbiter;
use crate::config::TableConfig;
use validator::Validate;
use crate::error::{Result, TableError};
use crate::models::{
    ActionId, ActionRecord, ClockMode, Half, MatchEvent, MatchFixture, MatchId, MatchSnapshot,
    MatchStatus, PeriodKey, PlayerId, PlayerSnapshot, Sides, StatAction, StatLine, StatSummary,
    TeamSide, TeamSnapshot, SCHEMA_VERSION,
};
use crate::store::{MatchRepository, RosterProvider};
use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct MatchController<T: TimeSource = SystemTimeSource> {
    match_id: MatchId,
    config: TableConfig,
    time: T,
    team_names: Sides<String>,
    periods: PeriodStateMachine,
    clock: ClockEngine,
    lineups: Sides<LineupManager>,
    ledger: StatLedger,
    timeouts: TimeoutArbiter,
    history: ActionHistory,
    /// Events not yet handed out with an outcome
    pending_events: Vec<MatchEvent>,
    repository: Option<Box<dyn MatchRepository>>,
    revision: u64,
}

impl MatchController<SystemTimeSource> {
    /// Open a pending fixture on the system clock.
    pub fn open_fixture(fixture: MatchFixture, config: TableConfig) -> Result<Self> {
        Self::open(fixture, config, SystemTimeSource)
    }
}

impl<T: TimeSource> MatchController<T> {
    // ========== Construction ==========

    pub fn open(fixture: MatchFixture, config: TableConfig, time: T) -> Result<Self> {
        if fixture.status != MatchStatus::Pending {
            return Err(TableError::precondition(format!(
                "match {} is not pending (status {:?})",
                fixture.match_id, fixture.status
            )));
        }
        validate_config(&config)?;
        validate_rosters(&fixture)?;

        let mut ledger = StatLedger::new();
        for side in TeamSide::BOTH {
            for player in &fixture.roster(side).players {
                ledger.add_player(side, player.clone());
            }
        }
        let lineup = |side: TeamSide| {
            let roster = fixture.roster(side).players.iter().map(|p| p.id.clone()).collect();
            LineupManager::new(side, roster)
        };
        let lineups = Sides::new(lineup(TeamSide::Local), lineup(TeamSide::Visitor));

        info!(
            match_id = %fixture.match_id,
            local = %fixture.local.team_name,
            visitor = %fixture.visitor.team_name,
            "Table mode opened"
        );

        Ok(Self {
            team_names: Sides::new(fixture.local.team_name.clone(), fixture.visitor.team_name.clone()),
            match_id: fixture.match_id,
            config,
            time,
            periods: PeriodStateMachine::new(),
            clock: ClockEngine::new(),
            lineups,
            ledger,
            timeouts: TimeoutArbiter::new(),
            history: ActionHistory::new(),
            pending_events: Vec::new(),
            repository: None,
            revision: 0,
        })
    }

    /// Fetch the fixture from a roster provider and open it.
    pub fn open_with(
        provider: &dyn RosterProvider,
        match_id: &MatchId,
        config: TableConfig,
        time: T,
    ) -> Result<Self> {
        let fixture = provider.fixture(match_id)?;
        Self::open(fixture, config, time)
    }

    /// Rebuild a controller from a stored snapshot. The clock comes back
    /// paused; the operator resumes it.
    ///
    /// A period whose time ran out before the snapshot was taken is ended
    /// right away. Its events are published with the first outcome.
    pub fn resume(snapshot: MatchSnapshot, config: TableConfig, time: T) -> Result<Self> {
        if snapshot.schema_version != SCHEMA_VERSION {
            return Err(TableError::precondition(format!(
                "snapshot version {} is not supported (expected {})",
                snapshot.schema_version, SCHEMA_VERSION
            )));
        }
        validate_config(&config)?;

        let mut ledger = StatLedger::new();
        for side in TeamSide::BOTH {
            let team = snapshot.teams.get(side);
            for player in &team.players {
                ledger.insert_player(PlayerLedger {
                    identity: player.identity.clone(),
                    side,
                    has_played: player.has_played,
                    periods: lines_from(&player.periods),
                    totals: StatLine::from(&player.totals),
                });
            }
            ledger.set_team(
                side,
                TeamLedger { periods: lines_from(&team.periods), totals: StatLine::from(&team.totals) },
            );
        }
        let lineups = Sides::new(
            restore_lineup(TeamSide::Local, &snapshot.teams.local),
            restore_lineup(TeamSide::Visitor, &snapshot.teams.visitor),
        );

        info!(
            match_id = %snapshot.match_id,
            revision = snapshot.revision,
            period = %snapshot.period.current,
            "Match resumed from snapshot"
        );

        let mut ctl = Self {
            team_names: snapshot.teams.map(|_, t| t.name.clone()),
            periods: PeriodStateMachine::restore(&snapshot.period),
            clock: ClockEngine::restore(&snapshot.clock, snapshot.period.live),
            timeouts: TimeoutArbiter::restore(&snapshot.timeouts),
            history: ActionHistory::from_records(snapshot.history),
            match_id: snapshot.match_id,
            revision: snapshot.revision,
            config,
            time,
            lineups,
            ledger,
            pending_events: Vec::new(),
            repository: None,
        };
        let now = ctl.time.now();
        ctl.sync_clock(now);
        Ok(ctl)
    }

    /// Attach the persistence collaborator used for checkpoints.
    pub fn with_repository(mut self, repository: impl MatchRepository + 'static) -> Self {
        self.repository = Some(Box::new(repository));
        self
    }

    // ========== Accessors ==========

    pub fn match_id(&self) -> &MatchId {
        &self.match_id
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn time(&self) -> &T {
        &self.time
    }

    pub fn current_period(&self) -> PeriodKey {
        self.periods.current()
    }

    pub fn is_finished(&self) -> bool {
        self.periods.is_finished()
    }

    pub fn clock(&self) -> &ClockEngine {
        &self.clock
    }

    pub fn lineup(&self, side: TeamSide) -> &LineupManager {
        self.lineups.get(side)
    }

    pub fn ledger(&self) -> &StatLedger {
        &self.ledger
    }

    pub fn history(&self) -> &ActionHistory {
        &self.history
    }

    pub fn timeouts(&self) -> &TimeoutArbiter {
        &self.timeouts
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Suggested sleep before the next `tick`
    pub fn next_wakeup(&self) -> Option<Duration> {
        next_wakeup(&self.clock, self.time.now())
    }

    /// Current state without processing clock expiries. A period whose time
    /// has run out still reads live at 0:00 until the next `tick` or command.
    pub fn snapshot(&self) -> MatchSnapshot {
        self.build_snapshot(self.time.now())
    }

    // ========== Commands ==========

    pub fn execute(&mut self, command: Command) -> Result<CommandOutcome> {
        debug!(command = command.name(), "Executing command");
        match command {
            Command::StartPeriod { period } => self.start_period(period),
            Command::EndPeriodManually => self.end_period_manually(),
            Command::AbortToFinished => self.abort_to_finished(),
            Command::PauseClock => self.pause_clock(),
            Command::ResumeClock => self.resume_clock(),
            Command::ConfirmLineup { side, players } => self.confirm_lineup(side, &players),
            Command::Substitute { side, player_out, player_in } => {
                self.substitute(side, &player_out, &player_in)
            }
            Command::ApplyStat { side, player, action } => self.apply_stat(side, &player, action),
            Command::UndoAction { action_id } => self.undo_action(action_id),
            Command::UndoLatest { side, player, action } => self.undo_latest(side, &player, action),
            Command::RequestTimeout { side } => self.request_timeout(side),
            Command::AcknowledgeTimeout { side } => self.acknowledge_timeout(side),
            Command::CancelTimeout { side } => self.cancel_timeout(side),
            Command::EndTimeout => self.end_timeout(),
            Command::Tick => Ok(self.tick()),
        }
    }

    /// Bring the clock up to date and publish.
    pub fn tick(&mut self) -> CommandOutcome {
        let now = self.time.now();
        self.sync_clock(now);
        self.publish(now)
    }

    pub fn start_period(&mut self, period: PeriodKey) -> Result<CommandOutcome> {
        self.run(|ctl, now| {
            if period.is_playing_period() && ctl.periods.next_startable() == Some(period) {
                if let Some(side) = ctl.side_with_pending_exit() {
                    return Err(TableError::precondition(format!(
                        "{} must substitute its fouled-out player before {}",
                        side, period
                    )));
                }
            }
            let ready = ctl.lineups_ready();
            ctl.periods.start(period, ready)?;

            let duration = duration_for(period, &ctl.config.timing);
            ctl.clock.reset_and_start(duration, now);
            info!(match_id = %ctl.match_id, %period, secs = duration.as_secs(), "Period started");
            ctl.emit(MatchEvent::PeriodStarted { period });
            Ok(())
        })
    }

    /// End the current break early, started or not.
    pub fn end_period_manually(&mut self) -> Result<CommandOutcome> {
        self.run(|ctl, now| {
            let transition = ctl.periods.end_break(&ctl.config.rules)?;
            ctl.after_transition(transition, now);
            Ok(())
        })
    }

    pub fn abort_to_finished(&mut self) -> Result<CommandOutcome> {
        self.run(|ctl, now| {
            if let Some(side) = ctl.timeouts.finish_running() {
                ctl.emit(MatchEvent::TimeoutEnded { side, early: true });
            }
            let from = ctl.periods.abort();
            ctl.clock.load(Duration::ZERO);
            warn!(match_id = %ctl.match_id, period = %from, "Match aborted to FINISHED by operator");
            ctl.emit(MatchEvent::MatchAborted { period: from });
            ctl.finish(now);
            Ok(())
        })
    }

    pub fn pause_clock(&mut self) -> Result<CommandOutcome> {
        self.run(|ctl, now| {
            if !ctl.clock.pause(now) {
                return Err(TableError::precondition("the clock is not running"));
            }
            let mode = ctl.clock.mode();
            info!(?mode, remaining_ms = ctl.clock.remaining(now).as_millis() as u64, "Clock paused");
            ctl.emit(MatchEvent::ClockPaused { mode });
            Ok(())
        })
    }

    pub fn resume_clock(&mut self) -> Result<CommandOutcome> {
        self.run(|ctl, now| {
            let mode = ctl.clock.mode();
            if mode == ClockMode::Period && !ctl.periods.is_live() {
                return Err(TableError::precondition(format!(
                    "{} has not been started",
                    ctl.periods.current()
                )));
            }
            if ctl.clock.is_running() {
                return Err(TableError::precondition("the clock is already running"));
            }
            if !ctl.clock.resume(now) {
                return Err(TableError::precondition("no time left on the clock"));
            }
            info!(?mode, "Clock resumed");
            ctl.emit(MatchEvent::ClockResumed { mode });
            Ok(())
        })
    }

    pub fn confirm_lineup(&mut self, side: TeamSide, players: &[PlayerId]) -> Result<CommandOutcome> {
        self.run(|ctl, _| {
            if ctl.periods.is_live() {
                return Err(TableError::precondition(format!(
                    "lineups cannot be confirmed while {} is live",
                    ctl.periods.current()
                )));
            }
            let lineup = ctl.lineups.get_mut(side);
            let exits = lineup.pending_exits();
            let on_court = lineup.confirm(players)?;
            for player in &on_court {
                ctl.ledger.mark_played(player);
            }
            info!(%side, players = ?on_court, "Lineup confirmed");
            ctl.emit(MatchEvent::LineupConfirmed { side, players: on_court });
            for player in exits {
                ctl.emit(MatchEvent::MandatoryExitResolved { side, player });
            }
            Ok(())
        })
    }

    pub fn substitute(
        &mut self,
        side: TeamSide,
        player_out: &PlayerId,
        player_in: &PlayerId,
    ) -> Result<CommandOutcome> {
        self.run(|ctl, _| {
            let result = ctl.lineups.get_mut(side).substitute(player_out, player_in)?;
            ctl.ledger.mark_played(&result.player_in);
            info!(%side, player_out = %result.player_out, player_in = %result.player_in, "Substitution");
            ctl.emit(MatchEvent::Substitution {
                side,
                player_out: result.player_out.clone(),
                player_in: result.player_in,
            });
            if result.resolved_exit {
                ctl.emit(MatchEvent::MandatoryExitResolved { side, player: result.player_out });
            }
            Ok(())
        })
    }

    pub fn apply_stat(
        &mut self,
        side: TeamSide,
        player: &PlayerId,
        action: StatAction,
    ) -> Result<CommandOutcome> {
        self.run(|ctl, _| {
            if let Some(reason) = ctl.stats_block_reason() {
                return Err(TableError::Precondition(reason));
            }
            let period = ctl.periods.current();
            let totals =
                ctl.ledger.apply_delta(ctl.lineups.get(side), period, side, player, action, 1)?;

            let record =
                ActionRecord::new(side, player.clone(), action, period, ctl.time.wall_clock());
            debug!(action_id = %record.id, %side, %player, %action, %period, "Stat recorded");
            ctl.emit(MatchEvent::StatRecorded {
                action_id: record.id,
                side,
                player: player.clone(),
                action,
            });
            ctl.history.record(record);

            if action.is_foul() {
                ctl.check_fouls(side, player, totals.fouls_committed, period);
            }
            Ok(())
        })
    }

    pub fn undo_action(&mut self, action_id: ActionId) -> Result<CommandOutcome> {
        self.run(|ctl, _| ctl.undo_record(action_id))
    }

    /// Undo the most recent record of `action` for `player`.
    pub fn undo_latest(
        &mut self,
        side: TeamSide,
        player: &PlayerId,
        action: StatAction,
    ) -> Result<CommandOutcome> {
        self.run(|ctl, _| {
            let action_id = ctl
                .history
                .latest_for(side, player, action)
                .map(|r| r.id)
                .ok_or_else(|| {
                    TableError::precondition(format!("no {} recorded for {}", action, player))
                })?;
            ctl.undo_record(action_id)
        })
    }

    pub fn request_timeout(&mut self, side: TeamSide) -> Result<CommandOutcome> {
        self.run(|ctl, _| {
            let window = ctl.periods.timeout_window();
            let requested_at = ctl.time.wall_clock();
            ctl.timeouts.request(side, window, &ctl.config.rules, requested_at)?;
            info!(%side, "Timeout requested");
            ctl.emit(MatchEvent::TimeoutRequested { side });
            Ok(())
        })
    }

    pub fn acknowledge_timeout(&mut self, side: TeamSide) -> Result<CommandOutcome> {
        self.run(|ctl, now| {
            let period = ctl.periods.current();
            let half = match period.half() {
                Some(half) if ctl.periods.stats_allowed() => half,
                _ => {
                    return Err(TableError::precondition(format!(
                        "timeouts only run during a live period, current period is {}",
                        period
                    )))
                }
            };
            if ctl.clock.mode() == ClockMode::Timeout {
                return Err(TableError::precondition("a timeout is already running"));
            }
            ctl.timeouts.acknowledge(side, half, &ctl.config.rules)?;

            ctl.clock.switch_to_timeout(ctl.config.timing.timeout(), now);
            ctl.ledger.record_timeout(side, period);
            info!(%side, %period, secs = ctl.config.timing.timeout_secs, "Timeout started");
            ctl.emit(MatchEvent::TimeoutStarted {
                side,
                duration_secs: ctl.config.timing.timeout_secs,
            });
            Ok(())
        })
    }

    pub fn cancel_timeout(&mut self, side: TeamSide) -> Result<CommandOutcome> {
        self.run(|ctl, _| {
            ctl.timeouts.cancel(side)?;
            info!(%side, "Timeout request cancelled");
            ctl.emit(MatchEvent::TimeoutCancelled { side });
            Ok(())
        })
    }

    /// Cut the running timeout short.
    pub fn end_timeout(&mut self) -> Result<CommandOutcome> {
        self.run(|ctl, now| {
            if !ctl.clock.end_timeout(now) {
                return Err(TableError::precondition("no timeout is running"));
            }
            if let Some(side) = ctl.timeouts.finish_running() {
                info!(%side, "Timeout ended early");
                ctl.emit(MatchEvent::TimeoutEnded { side, early: true });
            }
            Ok(())
        })
    }

    // ========== Internals ==========

    /// Sync the clock, reject commands on a finished match, apply, publish.
    fn run(
        &mut self,
        command: impl FnOnce(&mut Self, Instant) -> Result<()>,
    ) -> Result<CommandOutcome> {
        let now = self.time.now();
        self.sync_clock(now);
        if self.periods.is_finished() {
            return Err(TableError::precondition("the match is finished"));
        }
        command(self, now)?;
        Ok(self.publish(now))
    }

    fn publish(&mut self, now: Instant) -> CommandOutcome {
        self.revision += 1;
        CommandOutcome {
            snapshot: self.build_snapshot(now),
            events: std::mem::take(&mut self.pending_events),
        }
    }

    fn emit(&mut self, event: MatchEvent) {
        self.pending_events.push(event);
    }

    fn sync_clock(&mut self, now: Instant) {
        while let Some(expiry) = self.clock.tick(now) {
            match expiry {
                ClockExpiry::Period => self.on_period_expired(now),
                ClockExpiry::Timeout => {
                    if let Some(side) = self.timeouts.finish_running() {
                        info!(%side, "Timeout expired");
                        self.emit(MatchEvent::TimeoutEnded { side, early: false });
                    }
                }
            }
        }
    }

    fn on_period_expired(&mut self, now: Instant) {
        let tied = self.ledger.score(TeamSide::Local) == self.ledger.score(TeamSide::Visitor);
        match self.periods.end(tied, &self.config.rules) {
            Ok(transition) => self.after_transition(transition, now),
            Err(err) => warn!(%err, "Period clock expired outside a live period"),
        }
    }

    fn after_transition(&mut self, transition: PeriodTransition, now: Instant) {
        let PeriodTransition { from, to, overtime_scheduled } = transition;
        self.clock.load(duration_for(to, &self.config.timing));
        info!(match_id = %self.match_id, %from, %to, "Period ended");
        self.emit(MatchEvent::PeriodEnded { period: from, next: to });

        if let Some(overtime) = overtime_scheduled {
            info!(%overtime, "Tied after {}, overtime scheduled", from);
            self.emit(MatchEvent::OvertimeScheduled { period: overtime });
        }

        if to == PeriodKey::Finished {
            self.finish(now);
        } else if self.config.rules.checkpoint_on_period_end {
            self.persist(now);
        }
    }

    fn finish(&mut self, now: Instant) {
        self.timeouts.clear_pending();
        let score = self.score();
        info!(local = score.local, visitor = score.visitor, "Match finished");
        self.emit(MatchEvent::MatchFinished { score });
        self.persist(now);
    }

    /// Best-effort save. Failures become a warning event and never touch
    /// in-memory state.
    fn persist(&mut self, now: Instant) {
        if self.repository.is_none() {
            return;
        }
        // Saved ahead of `publish`, so it carries the revision about to go out
        let mut snapshot = self.build_snapshot(now);
        snapshot.revision = self.revision + 1;
        let result = match self.repository.as_mut() {
            Some(repository) => repository.save(&self.match_id, &snapshot),
            None => return,
        };
        match result {
            Ok(()) => debug!(revision = snapshot.revision, period = %snapshot.period.current, "Checkpoint saved"),
            Err(err) => {
                warn!(match_id = %self.match_id, %err, "Failed to persist match snapshot");
                self.emit(MatchEvent::PersistenceFailed { reason: err.to_string() });
            }
        }
    }

    fn undo_record(&mut self, action_id: ActionId) -> Result<()> {
        let record = self.history.undo(action_id, &mut self.ledger)?;
        debug!(%action_id, side = %record.side, player = %record.player, action = %record.action, "Action undone");
        self.emit(MatchEvent::ActionUndone {
            action_id,
            side: record.side,
            player: record.player.clone(),
            action: record.action,
        });

        if record.action.is_foul() {
            let fouls =
                self.ledger.player(&record.player).map(|p| p.totals.fouls_committed).unwrap_or(0);
            let lineup = self.lineups.get_mut(record.side);
            let reinstated = fouls < self.config.rules.foul_limit
                && lineup.is_ejected(&record.player)
                && lineup.reinstate(&record.player);
            if reinstated {
                info!(side = %record.side, player = %record.player, fouls, "Player reinstated after undo");
                self.emit(MatchEvent::PlayerReinstated { side: record.side, player: record.player });
            }
        }
        Ok(())
    }

    fn check_fouls(&mut self, side: TeamSide, player: &PlayerId, fouls: u32, period: PeriodKey) {
        let rules = &self.config.rules;
        if fouls >= rules.foul_limit && self.lineups.get_mut(side).eject(player) {
            warn!(%side, %player, fouls, "Player fouled out");
            self.emit(MatchEvent::PlayerFouledOut { side, player: player.clone(), fouls });
        }

        let team_fouls = self.ledger.team_fouls(side, period);
        if team_fouls == self.config.rules.team_fouls_for_bonus {
            info!(%side, %period, team_fouls, "Team foul limit reached");
            self.emit(MatchEvent::TeamFoulLimitReached { side, period, fouls: team_fouls });
        }
    }

    fn stats_block_reason(&self) -> Option<String> {
        if !self.periods.stats_allowed() {
            let period = self.periods.current();
            Some(if period.is_playing_period() {
                format!("stats are disabled until {} starts", period)
            } else {
                format!("stats are disabled during {}", period)
            })
        } else if self.clock.mode() == ClockMode::Timeout {
            Some("stats are disabled during a timeout".to_string())
        } else {
            None
        }
    }

    fn lineups_ready(&self) -> bool {
        TeamSide::BOTH.iter().all(|side| self.lineups.get(*side).is_confirmed())
    }

    fn side_with_pending_exit(&self) -> Option<TeamSide> {
        TeamSide::BOTH.into_iter().find(|side| self.lineups.get(*side).mandatory_exit_pending())
    }

    fn can_start_period(&self) -> bool {
        match self.periods.next_startable() {
            Some(p) if p.is_playing_period() => {
                self.lineups_ready() && self.side_with_pending_exit().is_none()
            }
            Some(_) => true,
            None => false,
        }
    }

    fn score(&self) -> Sides<u32> {
        Sides::new(self.ledger.score(TeamSide::Local), self.ledger.score(TeamSide::Visitor))
    }

    fn build_snapshot(&self, now: Instant) -> MatchSnapshot {
        let window = self.periods.timeout_window();
        MatchSnapshot {
            schema_version: SCHEMA_VERSION,
            match_id: self.match_id.clone(),
            revision: self.revision,
            taken_at: self.time.wall_clock(),
            period: self.periods.snapshot(),
            clock: self.clock.snapshot(now),
            teams: Sides::new(
                self.team_snapshot(TeamSide::Local, window),
                self.team_snapshot(TeamSide::Visitor, window),
            ),
            score: self.score(),
            timeouts: self.timeouts.snapshot(),
            history: self.history.records().to_vec(),
            can_apply_stat: self.stats_block_reason().is_none(),
            can_start_period: self.can_start_period(),
            can_end_period: self.periods.current() == PeriodKey::Descanso,
            next_period: self.periods.next_startable(),
            finished: self.periods.is_finished(),
        }
    }

    fn team_snapshot(&self, side: TeamSide, window: Option<Half>) -> TeamSnapshot {
        let lineup = self.lineups.get(side);
        let team = self.ledger.team(side);
        let period = self.periods.current();
        let rules = &self.config.rules;

        let players = lineup
            .roster()
            .iter()
            .filter_map(|id| self.ledger.player(id).map(|p| (id, p)))
            .map(|(id, p)| PlayerSnapshot {
                identity: p.identity.clone(),
                has_played: p.has_played,
                on_court: lineup.is_on_court(id),
                ejected: lineup.is_ejected(id),
                totals: p.totals.summary(),
                periods: summaries_from(&p.periods),
            })
            .collect();
        let team_fouls = self.ledger.team_fouls(side, period);

        TeamSnapshot {
            name: self.team_names.get(side).clone(),
            lineup_confirmed: lineup.is_confirmed(),
            on_court: lineup.on_court(),
            bench: lineup.bench(),
            mandatory_exit_pending: lineup.mandatory_exit_pending(),
            pending_exits: lineup.pending_exits(),
            players,
            totals: team.totals.summary(),
            periods: summaries_from(&team.periods),
            team_fouls_this_period: team_fouls,
            in_bonus: period.is_playing_period() && team_fouls >= rules.team_fouls_for_bonus,
            timeouts_remaining: window.map(|half| self.timeouts.remaining(side, half, rules)),
        }
    }
}

fn validate_config(config: &TableConfig) -> Result<()> {
    config.validate().map_err(|err| TableError::InvalidConfig(err.to_string()))
}

fn validate_rosters(fixture: &MatchFixture) -> Result<()> {
    let mut seen = BTreeSet::new();
    for side in TeamSide::BOTH {
        let roster = fixture.roster(side);
        if roster.players.len() < LINEUP_SIZE {
            return Err(TableError::InvalidRoster(format!(
                "{} roster has {} players, at least {} are needed",
                side,
                roster.players.len(),
                LINEUP_SIZE
            )));
        }
        for player in &roster.players {
            if !seen.insert(player.id.clone()) {
                return Err(TableError::InvalidRoster(format!(
                    "player id {} appears more than once",
                    player.id
                )));
            }
        }
    }
    Ok(())
}

fn restore_lineup(side: TeamSide, team: &TeamSnapshot) -> LineupManager {
    LineupManager::restore(
        side,
        team.players.iter().map(|p| p.identity.id.clone()).collect(),
        team.on_court.clone(),
        team.lineup_confirmed,
        team.players.iter().filter(|p| p.ejected).map(|p| p.identity.id.clone()).collect(),
        team.pending_exits.clone(),
    )
}

fn summaries_from(lines: &BTreeMap<PeriodKey, StatLine>) -> BTreeMap<PeriodKey, StatSummary> {
    lines.iter().map(|(period, line)| (*period, line.summary())).collect()
}

fn lines_from(summaries: &BTreeMap<PeriodKey, StatSummary>) -> BTreeMap<PeriodKey, StatLine> {
    summaries.iter().map(|(period, summary)| (*period, StatLine::from(summary))).collect()
}
