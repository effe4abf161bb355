//! Win evaluation.
//!
//! Runs after every resolved action and after every elimination pass.
//! Precedence is fixed: a lone survivor wins outright before any directive
//! is considered; otherwise directives are checked per surviving seat in
//! seat order and the first satisfied one wins. At most one winner per
//! round.

use tracing::info;

use crate::core::{count_kind, EventPayload, LogViewer, PlayerId, Room, RoomStatus};
use crate::phase::Trigger;
use crate::roles::Directive;
use crate::rules::RuleSet;

/// Persistent score resource key, kept across rounds.
pub const SCORE_KEY: &str = "score";

/// Evaluate all win predicates against the current state.
#[must_use]
pub fn evaluate(room: &Room) -> Option<PlayerId> {
    // Highest precedence: exactly one seat left standing.
    let survivors: Vec<PlayerId> = room.survivors().collect();
    if survivors.len() == 1 {
        return Some(survivors[0]);
    }
    if survivors.is_empty() {
        return None;
    }

    // Then personal directives, seat order.
    for seat in survivors {
        let player = room.player(seat);
        if let Some(directive) = &player.directive {
            if directive_met(room, seat, directive) {
                return Some(seat);
            }
        }
    }
    None
}

fn directive_met(room: &Room, seat: PlayerId, directive: &Directive) -> bool {
    let player = room.player(seat);
    match directive {
        Directive::ResourceAtLeast { key, min } => player.resource(key) >= *min,
        Directive::ActionCount { key, min } => player.resource(key) >= *min,
        Directive::FirstCrash => room.players.iter().any(|p| p.flags.crashed),
        Directive::HandComposition { kind, min } => count_kind(&player.hand, kind) >= *min,
    }
}

/// Close out the round for a winner: bump their persistent score, reveal
/// every directive for the summary, freeze the room as finished.
pub fn declare_winner(room: &mut Room, rules: &RuleSet, winner: PlayerId) {
    let name = room.player(winner).name.clone();
    room.player_mut(winner).add_resource(SCORE_KEY, 1);
    let score = room.player(winner).resource(SCORE_KEY);

    for player in &mut room.players {
        player.directive_revealed = true;
    }

    room.status = RoomStatus::Finished;
    if let Some(next) = rules.phases.try_transition(&room.phase, Trigger::GameOver) {
        room.phase = next.to_string();
    }

    room.push_log(format!("{} wins the round", name), "win", LogViewer::All);
    room.push_event("round_won", winner, None, EventPayload::Amount(score));
    info!(room = %room.id, winner = %winner, score, "round finished");
}

/// Close out a round with no winner (e.g. resource exhaustion with no
/// satisfied predicate). Directives are still revealed for the summary.
pub fn finish_without_winner(room: &mut Room, rules: &RuleSet) {
    for player in &mut room.players {
        player.directive_revealed = true;
    }
    room.status = RoomStatus::Finished;
    if let Some(next) = rules.phases.try_transition(&room.phase, Trigger::GameOver) {
        room.phase = next.to_string();
    }
    room.push_log("the round ends with no winner", "win", LogViewer::All);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, GameRngState, Player, Settings};
    use crate::deck::{DeckSpec, KindSpec};
    use crate::phase::PhaseTable;
    use crate::rules::JudgementRules;

    fn rules() -> RuleSet {
        RuleSet {
            name: "test".into(),
            min_players: 2,
            max_players: 8,
            deck: DeckSpec::new(vec![KindSpec::new("goods", 10, 2)]),
            hand_size: 2,
            deal_max_per_kind: vec![],
            roles: vec![],
            forced_role: None,
            phases: PhaseTable::new("setup"),
            hazard_threshold: 2,
            forced_draw_on_turn_start: false,
            judgement: JudgementRules::default(),
            event_bonus_pct: 0,
            starting_resources: vec![],
        }
    }

    fn room(n: usize) -> Room {
        let mut room = Room::new("r", "u0", Settings {
            variant: "test".into(),
            long_game: false,
            rng: GameRngState::default(),
        });
        for i in 0..n {
            room.players.push(Player::new(format!("u{}", i), format!("P{}", i)));
        }
        room.status = RoomStatus::Playing;
        room
    }

    #[test]
    fn test_lone_survivor_wins() {
        let mut r = room(3);
        r.players[0].flags.eliminated = true;
        r.players[2].flags.eliminated = true;
        assert_eq!(evaluate(&r), Some(PlayerId::new(1)));
    }

    #[test]
    fn test_survivor_precedence_beats_directives() {
        // Seat 2's directive is satisfied, but seat 1 is the lone survivor.
        let mut r = room(3);
        r.players[0].flags.eliminated = true;
        r.players[2].flags.eliminated = true;
        r.players[2].directive =
            Some(Directive::ResourceAtLeast { key: "coins".into(), min: 0 });
        r.players[2].set_resource("coins", 100);

        assert_eq!(evaluate(&r), Some(PlayerId::new(1)));
    }

    #[test]
    fn test_directive_resource_threshold() {
        let mut r = room(3);
        r.players[1].directive =
            Some(Directive::ResourceAtLeast { key: "coins".into(), min: 30 });
        r.players[1].set_resource("coins", 29);
        assert_eq!(evaluate(&r), None);

        r.players[1].set_resource("coins", 30);
        assert_eq!(evaluate(&r), Some(PlayerId::new(1)));
    }

    #[test]
    fn test_directive_seat_order_tiebreak() {
        let mut r = room(3);
        for i in [0usize, 2] {
            r.players[i].directive =
                Some(Directive::ActionCount { key: "trades".into(), min: 1 });
            r.players[i].set_resource("trades", 1);
        }
        // Both satisfied: lowest seat wins.
        assert_eq!(evaluate(&r), Some(PlayerId::new(0)));
    }

    #[test]
    fn test_directive_first_crash() {
        let mut r = room(3);
        r.players[0].directive = Some(Directive::FirstCrash);
        assert_eq!(evaluate(&r), None);

        r.players[2].flags.crashed = true;
        assert_eq!(evaluate(&r), Some(PlayerId::new(0)));
    }

    #[test]
    fn test_directive_hand_composition() {
        let mut r = room(2);
        r.players[1].directive =
            Some(Directive::HandComposition { kind: "goods".into(), min: 3 });
        r.players[1].hand =
            vec![Card::new(0, "goods"), Card::new(1, "goods"), Card::new(2, "goods")];
        assert_eq!(evaluate(&r), Some(PlayerId::new(1)));
    }

    #[test]
    fn test_eliminated_directive_holder_cannot_win() {
        let mut r = room(3);
        r.players[0].directive =
            Some(Directive::ResourceAtLeast { key: "coins".into(), min: 1 });
        r.players[0].set_resource("coins", 50);
        r.players[0].flags.eliminated = true;
        assert_eq!(evaluate(&r), None);
    }

    #[test]
    fn test_declare_winner_scores_and_reveals() {
        let mut r = room(3);
        declare_winner(&mut r, &rules(), PlayerId::new(1));

        assert_eq!(r.status, RoomStatus::Finished);
        assert_eq!(r.players[1].resource(SCORE_KEY), 1);
        assert!(r.players.iter().all(|p| p.directive_revealed));
        assert_eq!(r.last_event.as_ref().unwrap().kind, "round_won");

        // Score persists and accumulates.
        r.status = RoomStatus::Playing;
        declare_winner(&mut r, &rules(), PlayerId::new(1));
        assert_eq!(r.players[1].resource(SCORE_KEY), 2);
    }

    #[test]
    fn test_finish_without_winner() {
        let mut r = room(2);
        finish_without_winner(&mut r, &rules());
        assert_eq!(r.status, RoomStatus::Finished);
        assert!(r.players.iter().all(|p| p.directive_revealed));
        assert!(r.players.iter().all(|p| p.resource(SCORE_KEY) == 0));
    }
}
