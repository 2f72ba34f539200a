//! Table Replay Library
//!
//! Replays a recorded operator session against the engine on a hand-driven
//! clock and renders the resulting box score.
//!
//! A script is a JSON document with the fixture and the timestamped commands:
//!
//! ```json
//! {
//!   "fixture": { "match_id": "m1", "status": "pending", "local": {...}, "visitor": {...} },
//!   "entries": [
//!     { "at_ms": 0, "command": "start_period", "period": "Q1" },
//!     { "at_ms": 4200, "command": "apply_stat", "side": "local", "player": "l4",
//!       "action": { "kind": "shot", "shot": "two_pointer", "outcome": "made" } }
//!   ]
//! }
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::time::Duration;
use table_core::engine::{Command, ManualTimeSource, MatchController};
use table_core::models::{MatchEvent, MatchFixture, MatchSnapshot, ShotStat, TeamSide};
use table_core::TableConfig;
use tracing::{debug, info, warn};

/// Recorded operator session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayScript {
    pub fixture: MatchFixture,
    #[serde(default)]
    pub entries: Vec<ScriptEntry>,
}

/// One command and the session time it was issued at
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptEntry {
    /// Milliseconds since the session was opened
    pub at_ms: u64,
    #[serde(flatten)]
    pub command: Command,
}

/// A command the engine refused during replay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedCommand {
    pub index: usize,
    pub at_ms: u64,
    pub command: String,
    pub reason: String,
}

/// What a replay produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayReport {
    pub snapshot: MatchSnapshot,
    pub applied: usize,
    pub rejected: Vec<RejectedCommand>,
    pub events: Vec<MatchEvent>,
}

impl ReplayReport {
    pub fn warnings(&self) -> impl Iterator<Item = &MatchEvent> {
        self.events.iter().filter(|e| e.severity() == table_core::models::EventSeverity::Warning)
    }
}

pub fn load_script(path: &Path) -> Result<ReplayScript> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse script: {}", path.display()))
}

/// Run every entry in order. Rejected commands are collected, not fatal;
/// a script whose timestamps run backwards is.
pub fn replay(script: &ReplayScript, config: TableConfig) -> Result<ReplayReport> {
    let time = ManualTimeSource::new();
    let mut ctl = MatchController::open(script.fixture.clone(), config, time.clone())
        .context("Failed to open the fixture")?;
    info!(match_id = %ctl.match_id(), entries = script.entries.len(), "Replaying script");

    let mut applied = 0;
    let mut rejected = Vec::new();
    let mut events = Vec::new();

    for (index, entry) in script.entries.iter().enumerate() {
        let at = Duration::from_millis(entry.at_ms);
        if at < time.elapsed() {
            bail!(
                "entry {} at {} ms is earlier than the previous entry ({} ms)",
                index,
                entry.at_ms,
                time.elapsed().as_millis()
            );
        }
        time.set_elapsed(at);

        let name = entry.command.name();
        match ctl.execute(entry.command.clone()) {
            Ok(outcome) => {
                debug!(index, command = name, revision = outcome.snapshot.revision, "Applied");
                applied += 1;
                events.extend(outcome.events);
            }
            Err(err) => {
                warn!(index, command = name, %err, "Command rejected");
                rejected.push(RejectedCommand {
                    index,
                    at_ms: entry.at_ms,
                    command: name.to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }

    let last = ctl.tick();
    events.extend(last.events);
    Ok(ReplayReport { snapshot: last.snapshot, applied, rejected, events })
}

fn shots(stat: &ShotStat) -> String {
    format!("{}-{}", stat.made, stat.attempts())
}

fn clock_text(remaining_seconds: u64) -> String {
    format!("{:02}:{:02}", remaining_seconds / 60, remaining_seconds % 60)
}

/// Plain-text box score, one table per team.
pub fn render_box_score(snapshot: &MatchSnapshot) -> String {
    let mut out = String::new();
    let local = snapshot.team(TeamSide::Local);
    let visitor = snapshot.team(TeamSide::Visitor);
    let _ = writeln!(
        out,
        "{} {} - {} {}   [{}{} {}]",
        local.name,
        snapshot.score.local,
        snapshot.score.visitor,
        visitor.name,
        snapshot.period.current,
        if snapshot.finished { " final" } else { "" },
        clock_text(snapshot.clock.remaining_seconds)
    );

    for side in TeamSide::BOTH {
        let team = snapshot.team(side);
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", team.name);
        let _ = writeln!(
            out,
            "{:>3}  {:<20} {:>4} {:>6} {:>6} {:>6} {:>4} {:>4} {:>3}",
            "#", "Player", "PTS", "FT", "2P", "3P", "AST", "REB", "PF"
        );
        for player in team.players.iter().filter(|p| p.has_played) {
            let t = &player.totals;
            let marker = match (player.on_court, player.ejected) {
                (_, true) => "x",
                (true, false) => "*",
                (false, false) => " ",
            };
            let _ = writeln!(
                out,
                "{:>3}{} {:<20} {:>4} {:>6} {:>6} {:>6} {:>4} {:>4} {:>3}",
                player.identity.jersey_number,
                marker,
                player.identity.name,
                t.points,
                shots(&t.free_throws),
                shots(&t.two_pointers),
                shots(&t.three_pointers),
                t.assists,
                t.rebounds,
                t.fouls_committed
            );
        }
        let t = &team.totals;
        let _ = writeln!(
            out,
            "{:>4} {:<20} {:>4} {:>6} {:>6} {:>6} {:>4} {:>4} {:>3}",
            "",
            "Team",
            t.points,
            shots(&t.free_throws),
            shots(&t.two_pointers),
            shots(&t.three_pointers),
            t.assists,
            t.rebounds,
            t.fouls_committed
        );
        let by_period: Vec<String> =
            team.periods.iter().map(|(period, s)| format!("{} {}", period, s.points)).collect();
        if !by_period.is_empty() {
            let _ = writeln!(out, "     by period: {}", by_period.join(", "));
        }
    }
    out
}
