//! Property tests over random operator sessions.

use super::*;
use crate::config::TableConfig;
use crate::models::{
    MatchFixture, MatchSnapshot, PeriodKey, PlayerId, PlayerIdentity, ShotKind, ShotOutcome, StatAction,
    StatSummary, TeamRoster, TeamSide,
};
use proptest::prelude::*;
use std::time::Duration;

const ACTIONS: [StatAction; 9] = [
    StatAction::Shot { shot: ShotKind::FreeThrow, outcome: ShotOutcome::Made },
    StatAction::Shot { shot: ShotKind::FreeThrow, outcome: ShotOutcome::Missed },
    StatAction::Shot { shot: ShotKind::TwoPointer, outcome: ShotOutcome::Made },
    StatAction::Shot { shot: ShotKind::TwoPointer, outcome: ShotOutcome::Missed },
    StatAction::Shot { shot: ShotKind::ThreePointer, outcome: ShotOutcome::Made },
    StatAction::Shot { shot: ShotKind::ThreePointer, outcome: ShotOutcome::Missed },
    StatAction::Assist,
    StatAction::Rebound,
    StatAction::Foul,
];

fn side_of(i: usize) -> (TeamSide, &'static str) {
    if i == 0 {
        (TeamSide::Local, "l")
    } else {
        (TeamSide::Visitor, "v")
    }
}

fn live_match() -> (MatchController<ManualTimeSource>, ManualTimeSource) {
    let roster = |prefix: &str| {
        TeamRoster::new(
            prefix,
            (1..=9).map(|i| PlayerIdentity::new(format!("{}{}", prefix, i), "P", i)).collect(),
        )
    };
    let time = ManualTimeSource::new();
    let mut ctl = MatchController::open(
        MatchFixture::pending("prop", roster("l"), roster("v")),
        TableConfig::default(),
        time.clone(),
    )
    .unwrap();
    for i in 0..2 {
        let (side, prefix) = side_of(i);
        let ids: Vec<PlayerId> = (1..=5).map(|n| PlayerId::new(format!("{}{}", prefix, n))).collect();
        ctl.confirm_lineup(side, &ids).unwrap();
    }
    ctl.start_period(PeriodKey::Q1).unwrap();
    (ctl, time)
}

fn player_sum(snapshot: &MatchSnapshot, side: TeamSide, f: impl Fn(&StatSummary) -> u32) -> u32 {
    snapshot.team(side).players.iter().map(|p| f(&p.totals)).sum()
}

/// (team, jersey 1-9, action index)
fn stat_entry() -> impl Strategy<Value = (usize, u8, usize)> {
    (0..2usize, 1..=9u8, 0..ACTIONS.len())
}

proptest! {
    #[test]
    fn prop_team_totals_equal_player_sums(entries in prop::collection::vec(stat_entry(), 1..80)) {
        let (mut ctl, _) = live_match();
        for (team, jersey, action) in entries {
            let (side, prefix) = side_of(team);
            // Bench players and fouled-out players are rejected, which is fine here
            let _ = ctl.apply_stat(side, &PlayerId::new(format!("{}{}", prefix, jersey)), ACTIONS[action]);
        }

        let snap = ctl.snapshot();
        for side in TeamSide::BOTH {
            let team = snap.team(side);
            prop_assert_eq!(team.totals.points, player_sum(&snap, side, |s| s.points));
            prop_assert_eq!(team.totals.assists, player_sum(&snap, side, |s| s.assists));
            prop_assert_eq!(team.totals.rebounds, player_sum(&snap, side, |s| s.rebounds));
            prop_assert_eq!(team.totals.fouls_committed, player_sum(&snap, side, |s| s.fouls_committed));
            prop_assert_eq!(*snap.score.get(side), team.totals.points);
            prop_assert_eq!(team.points_in(PeriodKey::Q1), team.totals.points);

            let t = &team.totals;
            prop_assert_eq!(
                t.points,
                t.free_throws.made + 2 * t.two_pointers.made + 3 * t.three_pointers.made
            );
        }
    }

    #[test]
    fn prop_undo_everything_restores_initial_state(
        entries in prop::collection::vec(stat_entry(), 1..40),
        order in prop::collection::vec(any::<prop::sample::Index>(), 40),
    ) {
        let (mut ctl, _) = live_match();
        let initial = ctl.snapshot();

        for (team, jersey, action) in entries {
            let (side, prefix) = side_of(team);
            let _ = ctl.apply_stat(side, &PlayerId::new(format!("{}{}", prefix, jersey)), ACTIONS[action]);
        }

        // Undo in a shuffled order
        let mut ids: Vec<_> = ctl.history().records().iter().map(|r| r.id).collect();
        let mut pick = order.into_iter();
        while !ids.is_empty() {
            let i = pick.next().map(|ix| ix.index(ids.len())).unwrap_or(0);
            let id = ids.remove(i);
            prop_assert!(ctl.undo_action(id).is_ok());
        }

        let snap = ctl.snapshot();
        prop_assert_eq!(&snap.teams, &initial.teams);
        prop_assert_eq!(snap.score, initial.score);
        prop_assert!(snap.history.is_empty());
    }

    #[test]
    fn prop_lineups_stay_at_five(subs in prop::collection::vec((0..2usize, 1..=9u8, 1..=9u8), 1..60)) {
        let (mut ctl, _) = live_match();
        for (team, outgoing, incoming) in subs {
            let (side, prefix) = side_of(team);
            let _ = ctl.substitute(
                side,
                &PlayerId::new(format!("{}{}", prefix, outgoing)),
                &PlayerId::new(format!("{}{}", prefix, incoming)),
            );
            for side in TeamSide::BOTH {
                prop_assert_eq!(ctl.lineup(side).on_court().len(), LINEUP_SIZE);
            }
        }

        let snap = ctl.snapshot();
        for side in TeamSide::BOTH {
            let team = snap.team(side);
            prop_assert_eq!(team.on_court.len() + team.bench.len(), team.players.len());
            for id in &team.on_court {
                prop_assert!(team.player(id).map(|p| p.has_played).unwrap_or(false));
            }
        }
    }

    #[test]
    fn prop_period_expires_exactly_once(steps in prop::collection::vec(1..120_000u64, 1..40)) {
        let (mut ctl, time) = live_match();
        let mut last_remaining = ctl.snapshot().clock.remaining_ms;
        let mut expiries = 0;

        for step in steps {
            time.advance(Duration::from_millis(step));
            let out = ctl.tick();
            expiries += out
                .events
                .iter()
                .filter(|e| matches!(e, crate::models::MatchEvent::PeriodEnded { period: PeriodKey::Q1, .. }))
                .count();
            if out.snapshot.period.current == PeriodKey::Q1 {
                prop_assert!(out.snapshot.clock.remaining_ms <= last_remaining);
                last_remaining = out.snapshot.clock.remaining_ms;
            }
        }

        let elapsed = time.elapsed();
        if elapsed >= Duration::from_secs(600) {
            prop_assert_eq!(expiries, 1);
            prop_assert_eq!(ctl.current_period(), PeriodKey::Descanso);
        } else {
            prop_assert_eq!(expiries, 0);
            prop_assert_eq!(
                ctl.snapshot().clock.remaining_ms,
                600_000 - elapsed.as_millis() as u64
            );
        }
    }
}
