//! On-court lineup of one team, readiness gating and foul-out exits.

use crate::error::{Result, TableError};
use crate::models::{PlayerId, TeamSide};
use std::collections::BTreeSet;

/// Players on court per team
pub const LINEUP_SIZE: usize = 5;

/// Result of a successful substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionResult {
    pub player_out: PlayerId,
    pub player_in: PlayerId,
    /// The outgoing player was an ejected player who had to leave
    pub resolved_exit: bool,
}

#[derive(Debug, Clone)]
pub struct LineupManager {
    side: TeamSide,
    /// Roster order, used for presentation
    roster: Vec<PlayerId>,
    on_court: BTreeSet<PlayerId>,
    confirmed: bool,
    ejected: BTreeSet<PlayerId>,
    /// Ejected players who are still on court
    pending_exits: BTreeSet<PlayerId>,
}

impl LineupManager {
    pub fn new(side: TeamSide, roster: Vec<PlayerId>) -> Self {
        Self {
            side,
            roster,
            on_court: BTreeSet::new(),
            confirmed: false,
            ejected: BTreeSet::new(),
            pending_exits: BTreeSet::new(),
        }
    }

    pub fn roster(&self) -> &[PlayerId] {
        &self.roster
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn contains(&self, player: &PlayerId) -> bool {
        self.roster.contains(player)
    }

    pub fn is_on_court(&self, player: &PlayerId) -> bool {
        self.on_court.contains(player)
    }

    pub fn is_ejected(&self, player: &PlayerId) -> bool {
        self.ejected.contains(player)
    }

    pub fn mandatory_exit_pending(&self) -> bool {
        !self.pending_exits.is_empty()
    }

    pub fn pending_exits(&self) -> Vec<PlayerId> {
        self.pending_exits.iter().cloned().collect()
    }

    /// On-court players in roster order
    pub fn on_court(&self) -> Vec<PlayerId> {
        self.roster.iter().filter(|p| self.on_court.contains(*p)).cloned().collect()
    }

    pub fn bench(&self) -> Vec<PlayerId> {
        self.roster.iter().filter(|p| !self.on_court.contains(*p)).cloned().collect()
    }

    /// Validate and install a starting lineup. Returns the distinct ids in
    /// roster order.
    pub fn confirm(&mut self, ids: &[PlayerId]) -> Result<Vec<PlayerId>> {
        let selected: BTreeSet<PlayerId> = ids.iter().cloned().collect();
        if selected.len() != LINEUP_SIZE {
            return Err(self.invalid(format!(
                "expected {} distinct players, got {}",
                LINEUP_SIZE,
                selected.len()
            )));
        }
        if let Some(unknown) = selected.iter().find(|p| !self.contains(p)) {
            return Err(self.invalid(format!("{} is not on the roster", unknown)));
        }
        if let Some(ejected) = selected.iter().find(|p| self.is_ejected(p)) {
            return Err(self.invalid(format!("{} has fouled out", ejected)));
        }

        self.on_court = selected;
        self.confirmed = true;
        // Every ejected player left the court with the new lineup
        self.pending_exits.clear();
        Ok(self.on_court())
    }

    fn invalid(&self, reason: String) -> TableError {
        TableError::InvalidLineup { side: self.side, reason }
    }

    pub fn substitute(&mut self, out: &PlayerId, incoming: &PlayerId) -> Result<SubstitutionResult> {
        if !self.confirmed {
            return Err(TableError::precondition(format!(
                "{} lineup must be confirmed before substitutions",
                self.side
            )));
        }
        if !self.is_on_court(out) {
            return Err(TableError::NotOnCourt(out.clone()));
        }
        if !self.contains(incoming) {
            return Err(TableError::UnknownPlayer { side: self.side, player: incoming.clone() });
        }
        if self.is_on_court(incoming) {
            return Err(TableError::precondition(format!("{} is already on court", incoming)));
        }
        if self.is_ejected(incoming) {
            return Err(TableError::EjectedPlayer(incoming.clone()));
        }
        if self.mandatory_exit_pending() && !self.pending_exits.contains(out) {
            let waiting = self.pending_exits.iter().next().map(|p| p.to_string()).unwrap_or_default();
            return Err(TableError::precondition(format!(
                "{} fouled out and must be substituted first",
                waiting
            )));
        }

        self.on_court.remove(out);
        self.on_court.insert(incoming.clone());
        let resolved_exit = self.pending_exits.remove(out);
        Ok(SubstitutionResult { player_out: out.clone(), player_in: incoming.clone(), resolved_exit })
    }

    /// Check a player may receive a stat increment.
    pub fn check_can_record(&self, player: &PlayerId) -> Result<()> {
        if !self.contains(player) {
            return Err(TableError::UnknownPlayer { side: self.side, player: player.clone() });
        }
        if self.is_ejected(player) {
            return Err(TableError::EjectedPlayer(player.clone()));
        }
        if !self.is_on_court(player) {
            return Err(TableError::NotOnCourt(player.clone()));
        }
        Ok(())
    }

    /// Flag a fouled-out player. Returns `true` only on the first call.
    pub fn eject(&mut self, player: &PlayerId) -> bool {
        if !self.ejected.insert(player.clone()) {
            return false;
        }
        if self.on_court.contains(player) {
            self.pending_exits.insert(player.clone());
        }
        true
    }

    /// Undo an ejection. Returns `true` if the player was ejected.
    pub fn reinstate(&mut self, player: &PlayerId) -> bool {
        self.pending_exits.remove(player);
        self.ejected.remove(player)
    }

    /// Rebuild from stored state.
    pub fn restore(
        side: TeamSide,
        roster: Vec<PlayerId>,
        on_court: Vec<PlayerId>,
        confirmed: bool,
        ejected: Vec<PlayerId>,
        pending_exits: Vec<PlayerId>,
    ) -> Self {
        Self {
            side,
            roster,
            on_court: on_court.into_iter().collect(),
            confirmed,
            ejected: ejected.into_iter().collect(),
            pending_exits: pending_exits.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<PlayerId> {
        names.iter().map(|n| PlayerId::from(*n)).collect()
    }

    fn manager() -> LineupManager {
        LineupManager::new(TeamSide::Local, ids(&["a", "b", "c", "d", "e", "f", "g"]))
    }

    fn confirmed() -> LineupManager {
        let mut m = manager();
        m.confirm(&ids(&["a", "b", "c", "d", "e"])).unwrap();
        m
    }

    #[test]
    fn test_confirm_requires_five_distinct_roster_players() {
        let mut m = manager();
        let err = m.confirm(&ids(&["a", "b", "c", "d"])).unwrap_err();
        assert!(matches!(err, TableError::InvalidLineup { .. }));

        // Duplicates collapse
        assert!(m.confirm(&ids(&["a", "a", "b", "c", "d"])).is_err());
        assert!(m.confirm(&ids(&["a", "b", "c", "d", "zz"])).is_err());
        assert!(!m.is_confirmed());

        let on_court = m.confirm(&ids(&["e", "d", "c", "b", "a"])).unwrap();
        assert_eq!(on_court, ids(&["a", "b", "c", "d", "e"]));
        assert_eq!(m.bench(), ids(&["f", "g"]));
    }

    #[test]
    fn test_substitute_swaps_one_player() {
        let mut m = confirmed();
        let result = m.substitute(&PlayerId::from("a"), &PlayerId::from("f")).unwrap();
        assert!(!result.resolved_exit);
        assert_eq!(m.on_court().len(), LINEUP_SIZE);
        assert!(m.is_on_court(&PlayerId::from("f")));
        assert!(!m.is_on_court(&PlayerId::from("a")));
    }

    #[test]
    fn test_substitute_rejections() {
        let mut m = manager();
        assert!(matches!(
            m.substitute(&PlayerId::from("a"), &PlayerId::from("f")),
            Err(TableError::Precondition(_))
        ));

        let mut m = confirmed();
        assert_eq!(
            m.substitute(&PlayerId::from("f"), &PlayerId::from("g")),
            Err(TableError::NotOnCourt(PlayerId::from("f")))
        );
        assert!(matches!(
            m.substitute(&PlayerId::from("a"), &PlayerId::from("x")),
            Err(TableError::UnknownPlayer { .. })
        ));
        assert!(m.substitute(&PlayerId::from("a"), &PlayerId::from("b")).is_err());
        assert_eq!(m.on_court(), ids(&["a", "b", "c", "d", "e"]));
    }

    #[test]
    fn test_ejection_forces_exit_first() {
        let mut m = confirmed();
        assert!(m.eject(&PlayerId::from("c")));
        assert!(!m.eject(&PlayerId::from("c")));
        assert!(m.mandatory_exit_pending());

        assert_eq!(
            m.check_can_record(&PlayerId::from("c")),
            Err(TableError::EjectedPlayer(PlayerId::from("c")))
        );
        assert!(m.check_can_record(&PlayerId::from("d")).is_ok());

        // Another swap must wait
        assert!(matches!(
            m.substitute(&PlayerId::from("d"), &PlayerId::from("f")),
            Err(TableError::Precondition(_))
        ));

        let result = m.substitute(&PlayerId::from("c"), &PlayerId::from("f")).unwrap();
        assert!(result.resolved_exit);
        assert!(!m.mandatory_exit_pending());

        // Ejected players never come back in
        assert_eq!(
            m.substitute(&PlayerId::from("f"), &PlayerId::from("c")),
            Err(TableError::EjectedPlayer(PlayerId::from("c")))
        );
    }

    #[test]
    fn test_reinstate_clears_exit() {
        let mut m = confirmed();
        m.eject(&PlayerId::from("a"));
        assert!(m.reinstate(&PlayerId::from("a")));
        assert!(!m.mandatory_exit_pending());
        assert!(m.check_can_record(&PlayerId::from("a")).is_ok());
        assert!(!m.reinstate(&PlayerId::from("a")));
    }

    #[test]
    fn test_reconfirm_clears_pending_exit() {
        let mut m = confirmed();
        m.eject(&PlayerId::from("b"));
        assert_eq!(m.pending_exits(), ids(&["b"]));

        let on_court = m.confirm(&ids(&["a", "c", "d", "e", "f"])).unwrap();
        assert!(!on_court.contains(&PlayerId::from("b")));
        assert!(!m.mandatory_exit_pending());
        assert!(m.is_ejected(&PlayerId::from("b")));
    }

    #[test]
    fn test_bench_player_cannot_record() {
        let m = confirmed();
        assert_eq!(
            m.check_can_record(&PlayerId::from("g")),
            Err(TableError::NotOnCourt(PlayerId::from("g")))
        );
    }
}
