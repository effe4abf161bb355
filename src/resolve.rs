//! Action resolution.
//!
//! [`resolve`] is the single entry point for every player-driven mutation.
//! It validates the actor and payload against the current snapshot, then
//! computes a new room plus the targeted events and log entries the action
//! produced. Validation happens entirely before mutation: on any failure
//! the caller's snapshot is returned untouched (the resolver works on a
//! clone), so there is never a partial write.
//!
//! Reveal results only ever travel in targeted events or viewer-scoped log
//! entries; the public log gets a detail-free line.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::{
    count_kind, Card, Declaration, Event, EventPayload, GameRng, LogEntry, LogViewer, PlayerId,
    Room, RoomStatus,
};
use crate::deck;
use crate::error::{EngineError, ValidationError};
use crate::payout;
use crate::roles::ActionFamily;
use crate::rules::RuleSet;

/// Coarse action classification, used by phase legality tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Ready,
    Draw,
    Transfer,
    Declare,
    Reveal,
    Judgement,
    Ultimate,
}

/// Where a transfer sends the selected cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferDest {
    /// Commit to the declaration pool under a claimed kind.
    Pool { declared_kind: String },
    /// Hand them to another seat; `exchange` adds trade semantics, with
    /// one random card coming back.
    Player { target: PlayerId, exchange: bool },
}

/// What a reveal exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealMode {
    WholeHand,
    RandomCard,
}

/// An inspector's verdict on the pending declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Wave it through; the declarer collects.
    Accept,
    /// Look inside at normal stakes.
    Open,
    /// Look inside at raised stakes.
    Challenge,
}

/// A player's chosen action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    ToggleReady,
    Draw,
    Transfer {
        /// Indices into the actor's hand.
        card_indices: SmallVec<[usize; 4]>,
        dest: TransferDest,
    },
    Reveal {
        target: PlayerId,
        mode: RevealMode,
    },
    Judgement {
        verdict: Verdict,
    },
    /// One-per-round amplified power; reveals the actor's directive.
    Ultimate {
        target: Option<PlayerId>,
    },
}

impl Action {
    /// The coarse kind, for phase legality checks.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::ToggleReady => ActionKind::Ready,
            Action::Draw => ActionKind::Draw,
            Action::Transfer { dest: TransferDest::Pool { .. }, .. } => ActionKind::Declare,
            Action::Transfer { dest: TransferDest::Player { .. }, .. } => ActionKind::Transfer,
            Action::Reveal { .. } => ActionKind::Reveal,
            Action::Judgement { .. } => ActionKind::Judgement,
            Action::Ultimate { .. } => ActionKind::Ultimate,
        }
    }
}

/// Output of a resolved action: the next room state plus the events and log
/// entries this action produced (also already appended to the room).
#[derive(Clone, Debug)]
pub struct Resolution {
    pub room: Room,
    pub events: Vec<Event>,
    pub logs: Vec<LogEntry>,
}

/// Validate and resolve one action against a room snapshot.
pub fn resolve(
    room: &Room,
    rules: &RuleSet,
    actor: PlayerId,
    action: &Action,
    rng: &mut GameRng,
) -> Result<Resolution, EngineError> {
    validate(room, rules, actor, action)?;

    let mut next = room.clone();
    let log_start = next.logs.len();
    let mut events = Vec::new();

    match action {
        Action::ToggleReady => toggle_ready(&mut next, actor),
        Action::Draw => draw(&mut next, rules, actor, rng, &mut events)?,
        Action::Transfer { card_indices, dest } => {
            transfer(&mut next, rules, actor, card_indices, dest, rng, &mut events);
        }
        Action::Reveal { target, mode } => {
            reveal(&mut next, rules, actor, *target, *mode, rng, &mut events);
        }
        Action::Judgement { verdict } => judgement(&mut next, rules, actor, *verdict, &mut events),
        Action::Ultimate { target } => {
            if let Some(target) = *target {
                ultimate(&mut next, rules, actor, target, rng, &mut events);
            }
        }
    }

    debug_assert_eq!(room.card_count(), next.card_count(), "card closure violated");
    debug!(actor = %actor, kind = ?action.kind(), phase = %next.phase, "action resolved");

    let logs = next.logs.iter().skip(log_start).cloned().collect();
    Ok(Resolution { room: next, events, logs })
}

// === Validation ===

fn validate(
    room: &Room,
    rules: &RuleSet,
    actor: PlayerId,
    action: &Action,
) -> Result<(), ValidationError> {
    if room.status != RoomStatus::Playing {
        return Err(ValidationError::NotPlaying);
    }
    if rules.phases.spec(&room.phase).is_none() {
        return Err(ValidationError::UnknownPhase { phase: room.phase.clone() });
    }
    if !rules.phases.can_act(room, actor) {
        return Err(ValidationError::NotEligible { phase: room.phase.clone() });
    }
    if !rules.phases.is_legal(room, action.kind()) {
        return Err(ValidationError::WrongPhase { phase: room.phase.clone() });
    }

    match action {
        Action::ToggleReady | Action::Draw => Ok(()),
        Action::Transfer { card_indices, dest } => {
            validate_selection(room, actor, card_indices)?;
            match dest {
                TransferDest::Pool { .. } => {
                    if room.declaration.is_some() {
                        return Err(ValidationError::DeclarationPending);
                    }
                    Ok(())
                }
                TransferDest::Player { target, exchange } => {
                    validate_target(room, actor, *target)?;
                    if *exchange && room.player(*target).hand.is_empty() {
                        return Err(ValidationError::EmptyTargetHand);
                    }
                    Ok(())
                }
            }
        }
        Action::Reveal { target, mode } => {
            validate_target(room, actor, *target)?;
            if *mode == RevealMode::RandomCard && room.player(*target).hand.is_empty() {
                return Err(ValidationError::EmptyTargetHand);
            }
            Ok(())
        }
        Action::Judgement { .. } => {
            let decl = room.declaration.as_ref().ok_or(ValidationError::NoDeclaration)?;
            if decl.seat == actor {
                return Err(ValidationError::SelfTarget);
            }
            Ok(())
        }
        Action::Ultimate { target } => {
            let player = room.player(actor);
            if player.flags.ultimate_spent {
                return Err(ValidationError::UltimateSpent);
            }
            if rules.ultimate_for(player).is_none() {
                return Err(ValidationError::NoUltimate);
            }
            let target = target.ok_or(ValidationError::TargetRequired)?;
            validate_target(room, actor, target)
        }
    }
}

fn validate_selection(
    room: &Room,
    actor: PlayerId,
    indices: &[usize],
) -> Result<(), ValidationError> {
    if indices.is_empty() {
        return Err(ValidationError::EmptySelection);
    }
    let hand_len = room.player(actor).hand.len();
    for &index in indices {
        if index >= hand_len {
            return Err(ValidationError::BadCardIndex { index, hand_len });
        }
    }
    let mut sorted: Vec<usize> = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != indices.len() {
        return Err(ValidationError::DuplicateSelection);
    }
    Ok(())
}

fn validate_target(room: &Room, actor: PlayerId, target: PlayerId) -> Result<(), ValidationError> {
    if !room.has_seat(target) || !room.player(target).is_active() {
        return Err(ValidationError::InvalidTarget { seat: target.0 });
    }
    if target == actor {
        return Err(ValidationError::SelfTarget);
    }
    Ok(())
}

// === Mutations ===

/// Pass the turn, skipping seats the rules bar from holding it (the
/// forced-role seat acts through its own phase, never on the turn track).
fn pass_turn(room: &mut Room, rules: &RuleSet) {
    room.advance_turn_where(|p| rules.takes_turns(p));
}

fn toggle_ready(room: &mut Room, actor: PlayerId) {
    let player = room.player_mut(actor);
    player.ready = !player.ready;
    let text = if player.ready {
        format!("{} is ready", player.name)
    } else {
        format!("{} is no longer ready", player.name)
    };
    room.push_log(text, "phase", LogViewer::All);
}

fn draw(
    room: &mut Room,
    rules: &RuleSet,
    actor: PlayerId,
    rng: &mut GameRng,
    events: &mut Vec<Event>,
) -> Result<(), EngineError> {
    let card = deck::draw_with_reshuffle(&mut room.deck, &mut room.discard, rng)?;
    let name = room.player(actor).name.clone();
    room.player_mut(actor).hand.push(card.clone());

    room.push_log(format!("{} drew a card", name), "action", LogViewer::All);
    events.push(room.push_event("card_drawn", actor, Some(actor), EventPayload::Cards(vec![card])));
    pass_turn(room, rules);
    Ok(())
}

fn transfer(
    room: &mut Room,
    rules: &RuleSet,
    actor: PlayerId,
    indices: &[usize],
    dest: &TransferDest,
    rng: &mut GameRng,
    events: &mut Vec<Event>,
) {
    let actor_name = room.player(actor).name.clone();
    let selected = remove_cards(&mut room.player_mut(actor).hand, indices);

    match dest {
        TransferDest::Pool { declared_kind } => {
            let count = selected.len();
            room.pool.extend(selected);
            room.declaration =
                Some(Declaration { seat: actor, kind: declared_kind.clone(), count });
            room.player_mut(actor).add_resource("declarations", 1);
            room.push_log(
                format!("{} declares {} x {}", actor_name, count, declared_kind),
                "action",
                LogViewer::All,
            );
        }
        TransferDest::Player { target, exchange } => {
            let target_name = room.player(*target).name.clone();
            if *exchange {
                let pick = rng.gen_range_usize(0..room.player(*target).hand.len());
                let received = room.player_mut(*target).hand.remove(pick);
                room.player_mut(actor).hand.push(received.clone());
                events.push(room.push_event(
                    "trade_received",
                    actor,
                    Some(actor),
                    EventPayload::Cards(vec![received]),
                ));
            }
            let given_count = selected.len();
            room.player_mut(*target).hand.extend(selected.clone());
            events.push(room.push_event(
                "cards_received",
                actor,
                Some(*target),
                EventPayload::Cards(selected),
            ));
            room.player_mut(actor).add_resource("trades", 1);
            let verb = if *exchange { "traded" } else { "passed" };
            room.push_log(
                format!("{} {} {} card(s) with {}", actor_name, verb, given_count, target_name),
                "action",
                LogViewer::All,
            );
            pass_turn(room, rules);
        }
    }
}

fn reveal(
    room: &mut Room,
    rules: &RuleSet,
    actor: PlayerId,
    target: PlayerId,
    mode: RevealMode,
    rng: &mut GameRng,
    events: &mut Vec<Event>,
) {
    let actor_name = room.player(actor).name.clone();
    let target_name = room.player(target).name.clone();

    let (kind, cards) = match mode {
        RevealMode::WholeHand => ("hand_revealed", room.player(target).hand.clone()),
        RevealMode::RandomCard => {
            let hand = &room.player(target).hand;
            let pick = rng.gen_range_usize(0..hand.len());
            ("card_revealed", vec![hand[pick].clone()])
        }
    };

    events.push(room.push_event(kind, actor, Some(actor), EventPayload::Cards(cards.clone())));
    // Full detail only for the actor's eyes; the public line stays vague.
    room.push_log(
        format!("you saw {}: {}", target_name, describe(&cards)),
        "reveal",
        LogViewer::Player(actor),
    );
    room.push_log(
        format!("{} peeked at {}'s cards", actor_name, target_name),
        "action",
        LogViewer::All,
    );
    pass_turn(room, rules);
}

fn judgement(
    room: &mut Room,
    rules: &RuleSet,
    actor: PlayerId,
    verdict: Verdict,
    events: &mut Vec<Event>,
) {
    let decl = room.declaration.take().expect("validated");
    let declarer = decl.seat;
    let pool_cards = std::mem::take(&mut room.pool);

    let matches = count_kind(&pool_cards, &decl.kind);
    let mismatches = pool_cards.len() - matches;

    let inspector_name = room.player(actor).name.clone();
    let declarer_name = room.player(declarer).name.clone();
    let declarer_bonus = rules.payout_bonus_pct(room.player(declarer));
    let j = &rules.judgement;

    match verdict {
        Verdict::Accept => {
            let amount = payout::apply_modifiers(
                j.base_payout * pool_cards.len() as i64,
                declarer_bonus,
                rules.event_bonus_pct,
            );
            room.player_mut(declarer).add_resource("coins", amount);
            room.push_log(
                format!(
                    "{} waves the crate through; {} collects {}",
                    inspector_name, declarer_name, amount
                ),
                "judgement",
                LogViewer::All,
            );
            events.push(room.push_event(
                "declaration_accepted",
                actor,
                Some(declarer),
                EventPayload::Amount(amount),
            ));
        }
        Verdict::Open | Verdict::Challenge => {
            let stake_pct = if verdict == Verdict::Challenge { j.challenge_pct } else { 0 };
            if mismatches == 0 {
                let delivery = payout::apply_modifiers(
                    j.base_payout * pool_cards.len() as i64,
                    declarer_bonus,
                    rules.event_bonus_pct,
                );
                let penalty = payout::amplify(j.honest_penalty, stake_pct);
                room.player_mut(declarer).add_resource("coins", delivery + penalty);
                room.player_mut(actor).add_resource("coins", -penalty);
                room.push_log(
                    format!(
                        "{} opens the crate: all {} as declared; pays {} and the goods deliver for {}",
                        inspector_name,
                        decl.kind,
                        penalty,
                        delivery
                    ),
                    "judgement",
                    LogViewer::All,
                );
                events.push(room.push_event(
                    "inspection_passed",
                    actor,
                    Some(declarer),
                    EventPayload::Amount(delivery + penalty),
                ));
                mark_first_crash(room, actor);
            } else {
                let fine = payout::amplify(j.mismatch_fine * mismatches as i64, stake_pct);
                room.player_mut(declarer).add_resource("coins", -fine);
                room.player_mut(actor).add_resource("coins", fine);
                room.push_log(
                    format!(
                        "{} opens the crate: {} of {} mismatch the declared {}; {} fined {}",
                        inspector_name,
                        mismatches,
                        pool_cards.len(),
                        decl.kind,
                        declarer_name,
                        fine
                    ),
                    "judgement",
                    LogViewer::All,
                );
                events.push(room.push_event(
                    "inspection_failed",
                    actor,
                    Some(declarer),
                    EventPayload::Amount(fine),
                ));
                mark_first_crash(room, declarer);
            }
        }
    }

    // Judged cards leave circulation into the discard.
    room.discard.extend(pool_cards);
    pass_turn(room, rules);
}

fn ultimate(
    room: &mut Room,
    rules: &RuleSet,
    actor: PlayerId,
    target: PlayerId,
    rng: &mut GameRng,
    events: &mut Vec<Event>,
) {
    let spec = rules.ultimate_for(room.player(actor)).expect("validated").clone();
    let actor_name = room.player(actor).name.clone();
    let target_name = room.player(target).name.clone();

    // Irreversible side effect: the hidden directive goes public.
    {
        let player = room.player_mut(actor);
        player.flags.ultimate_spent = true;
        player.directive_revealed = true;
    }
    let directive_text = room
        .player(actor)
        .directive
        .as_ref()
        .map_or_else(|| "none".to_string(), |d| d.to_string());
    room.push_log(
        format!(
            "{} triggers their ultimate; their directive is now public: {}",
            actor_name, directive_text
        ),
        "ultimate",
        LogViewer::All,
    );

    match spec.family {
        ActionFamily::Transfer => {
            // Amplified forced transfer: seize cards from the target.
            let count = payout::amplify(1, spec.amplify_pct).max(1) as usize;
            let mut seized = Vec::new();
            for _ in 0..count {
                if room.player(target).hand.is_empty() {
                    break;
                }
                let pick = rng.gen_range_usize(0..room.player(target).hand.len());
                let card = room.player_mut(target).hand.remove(pick);
                room.player_mut(actor).hand.push(card.clone());
                seized.push(card);
            }
            room.push_log(
                format!("{} seized {} card(s) from {}", actor_name, seized.len(), target_name),
                "ultimate",
                LogViewer::All,
            );
            events.push(room.push_event(
                "ultimate_seizure",
                actor,
                Some(actor),
                EventPayload::Cards(seized),
            ));
        }
        ActionFamily::Reveal => {
            let cards = room.player(target).hand.clone();
            events.push(room.push_event(
                "hand_revealed",
                actor,
                Some(actor),
                EventPayload::Cards(cards.clone()),
            ));
            room.push_log(
                format!("you saw {}: {}", target_name, describe(&cards)),
                "reveal",
                LogViewer::Player(actor),
            );
            room.push_log(
                format!("{} exposed {}'s whole hand to themselves", actor_name, target_name),
                "ultimate",
                LogViewer::All,
            );
        }
        ActionFamily::Judgement => {
            let fine = payout::amplify(rules.judgement.mismatch_fine, spec.amplify_pct);
            room.player_mut(target).add_resource("coins", -fine);
            room.player_mut(actor).add_resource("coins", fine);
            room.push_log(
                format!("{} levies an instant fine of {} on {}", actor_name, fine, target_name),
                "ultimate",
                LogViewer::All,
            );
            events.push(room.push_event(
                "ultimate_fine",
                actor,
                Some(target),
                EventPayload::Amount(fine),
            ));
            mark_first_crash(room, target);
        }
    }
}

/// Remove cards at the given hand indices, preserving their original order.
fn remove_cards(hand: &mut Vec<Card>, indices: &[usize]) -> Vec<Card> {
    let mut sorted: Vec<usize> = indices.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    let mut removed: Vec<Card> = sorted.into_iter().map(|i| hand.remove(i)).collect();
    removed.reverse();
    removed
}

/// Flag the seat as the first crash when its coins went negative and nobody
/// has crashed yet.
fn mark_first_crash(room: &mut Room, seat: PlayerId) {
    if room.players.iter().any(|p| p.flags.crashed) {
        return;
    }
    if room.player(seat).resource("coins") < 0 {
        let name = room.player(seat).name.clone();
        room.player_mut(seat).flags.crashed = true;
        room.push_log(format!("{} has crashed", name), "crash", LogViewer::All);
    }
}

fn describe(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "an empty hand".to_string();
    }
    cards.iter().map(|c| c.kind.as_str()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameRngState, Player, Settings};
    use crate::deck::{DeckSpec, KindSpec};
    use crate::phase::{PhaseActor, PhaseSpec, PhaseTable, Trigger};
    use crate::roles::RoleDef;
    use crate::rules::JudgementRules;
    use smallvec::smallvec;

    fn test_rules() -> RuleSet {
        RuleSet {
            name: "test".into(),
            min_players: 2,
            max_players: 6,
            deck: DeckSpec::new(vec![
                KindSpec::new("goods", 10, 2),
                KindSpec::new("surge", 4, 1).hazard(),
            ]),
            hand_size: 3,
            deal_max_per_kind: vec![],
            roles: vec![
                RoleDef::new("inspector").unique(),
                RoleDef::new("trader"),
                RoleDef::new("broker").with_ultimate(ActionFamily::Transfer, 100),
            ],
            forced_role: Some("inspector".into()),
            phases: PhaseTable::new("setup")
                .with_phase(PhaseSpec::new("setup", PhaseActor::Nobody))
                .with_phase(
                    PhaseSpec::new("prep", PhaseActor::Everyone).allow(ActionKind::Ready),
                )
                .with_phase(
                    PhaseSpec::new("turn", PhaseActor::TurnPlayer)
                        .allow(ActionKind::Draw)
                        .allow(ActionKind::Transfer)
                        .allow(ActionKind::Declare)
                        .allow(ActionKind::Reveal)
                        .allow(ActionKind::Ultimate),
                )
                .with_phase(
                    PhaseSpec::new("inspect", PhaseActor::Role("inspector".into()))
                        .allow(ActionKind::Judgement),
                )
                .with_transition("setup", Trigger::Start, "prep")
                .with_transition("prep", Trigger::AllReady, "turn")
                .with_transition("turn", Trigger::ActionResolved, "inspect")
                .with_transition("inspect", Trigger::JudgementResolved, "turn"),
            hazard_threshold: 3,
            forced_draw_on_turn_start: false,
            judgement: JudgementRules::default(),
            event_bonus_pct: 0,
            starting_resources: vec![("coins".into(), 10)],
        }
    }

    fn playing_room(n: usize) -> Room {
        let mut room = Room::new("r", "u0", Settings {
            variant: "test".into(),
            long_game: false,
            rng: GameRngState::default(),
        });
        for i in 0..n {
            let mut p = Player::new(format!("u{}", i), format!("P{}", i));
            p.set_resource("coins", 10);
            p.role = Some("trader".into());
            room.players.push(p);
        }
        room.status = RoomStatus::Playing;
        room.phase = "turn".into();
        room.deck = vec![
            Card::new(100, "goods"),
            Card::new(101, "goods"),
            Card::new(102, "surge"),
        ];
        room
    }

    #[test]
    fn test_validation_failure_leaves_room_untouched() {
        let room = playing_room(3);
        let rules = test_rules();
        let mut rng = GameRng::new(1);

        // Seat 1 acting out of turn.
        let err = resolve(&room, &rules, PlayerId::new(1), &Action::Draw, &mut rng);
        assert!(matches!(
            err,
            Err(EngineError::Validation(ValidationError::NotEligible { .. }))
        ));
        // Untouched: caller still holds the original.
        assert_eq!(room.deck.len(), 3);
        assert!(room.logs.is_empty());
    }

    #[test]
    fn test_draw_moves_card_and_passes_turn() {
        let room = playing_room(3);
        let rules = test_rules();
        let mut rng = GameRng::new(1);

        let before = room.card_count();
        let res = resolve(&room, &rules, PlayerId::new(0), &Action::Draw, &mut rng).unwrap();

        assert_eq!(res.room.player(PlayerId::new(0)).hand.len(), 1);
        assert_eq!(res.room.deck.len(), 2);
        assert_eq!(res.room.card_count(), before);
        assert_eq!(res.room.turn_index, 1);
        assert_eq!(res.events.len(), 1);
        assert_eq!(res.events[0].kind, "card_drawn");
        assert!(res.events[0].is_for(PlayerId::new(0)));
    }

    #[test]
    fn test_transfer_bad_index_rejected() {
        let room = playing_room(3);
        let rules = test_rules();
        let mut rng = GameRng::new(1);

        let action = Action::Transfer {
            card_indices: smallvec![0],
            dest: TransferDest::Player { target: PlayerId::new(1), exchange: false },
        };
        let err = resolve(&room, &rules, PlayerId::new(0), &action, &mut rng);
        assert!(matches!(
            err,
            Err(EngineError::Validation(ValidationError::BadCardIndex { index: 0, hand_len: 0 }))
        ));
    }

    #[test]
    fn test_transfer_self_target_rejected() {
        let mut room = playing_room(3);
        room.players[0].hand.push(Card::new(1, "goods"));
        let rules = test_rules();
        let mut rng = GameRng::new(1);

        let action = Action::Transfer {
            card_indices: smallvec![0],
            dest: TransferDest::Player { target: PlayerId::new(0), exchange: false },
        };
        let err = resolve(&room, &rules, PlayerId::new(0), &action, &mut rng);
        assert!(matches!(err, Err(EngineError::Validation(ValidationError::SelfTarget))));
    }

    #[test]
    fn test_trade_exchanges_cards() {
        let mut room = playing_room(3);
        room.players[0].hand.push(Card::new(1, "goods"));
        room.players[1].hand.push(Card::new(2, "surge"));
        let rules = test_rules();
        let mut rng = GameRng::new(1);
        let before = room.card_count();

        let action = Action::Transfer {
            card_indices: smallvec![0],
            dest: TransferDest::Player { target: PlayerId::new(1), exchange: true },
        };
        let res = resolve(&room, &rules, PlayerId::new(0), &action, &mut rng).unwrap();

        // One given, one received: both hands stay at one card.
        assert_eq!(res.room.player(PlayerId::new(0)).hand.len(), 1);
        assert_eq!(res.room.player(PlayerId::new(1)).hand.len(), 1);
        assert_eq!(res.room.player(PlayerId::new(0)).hand[0].kind, "surge");
        assert_eq!(res.room.card_count(), before);
        assert_eq!(res.room.player(PlayerId::new(0)).resource("trades"), 1);

        // Both sides got a targeted event.
        let kinds: Vec<_> = res.events.iter().map(|e| e.kind.as_str()).collect();
        assert!(kinds.contains(&"trade_received"));
        assert!(kinds.contains(&"cards_received"));
    }

    #[test]
    fn test_pool_and_player_transfers_are_distinct_kinds() {
        let declare = Action::Transfer {
            card_indices: smallvec![0],
            dest: TransferDest::Pool { declared_kind: "goods".into() },
        };
        let pass = Action::Transfer {
            card_indices: smallvec![0],
            dest: TransferDest::Player { target: PlayerId::new(1), exchange: false },
        };
        assert_eq!(declare.kind(), ActionKind::Declare);
        assert_eq!(pass.kind(), ActionKind::Transfer);
    }

    #[test]
    fn test_declaration_illegal_where_only_player_transfers_are() {
        let mut room = playing_room(3);
        room.players[0].hand.push(Card::new(1, "goods"));
        let mut rules = test_rules();
        // Strip Declare from the turn phase: pool commits must bounce even
        // though player-to-player transfers stay legal.
        for spec in &mut rules.phases.phases {
            if spec.name == "turn" {
                spec.legal.retain(|k| *k != ActionKind::Declare);
            }
        }
        let mut rng = GameRng::new(1);

        let action = Action::Transfer {
            card_indices: smallvec![0],
            dest: TransferDest::Pool { declared_kind: "goods".into() },
        };
        let err = resolve(&room, &rules, PlayerId::new(0), &action, &mut rng);
        assert!(matches!(
            err,
            Err(EngineError::Validation(ValidationError::WrongPhase { .. }))
        ));
    }

    #[test]
    fn test_declaration_to_pool() {
        let mut room = playing_room(3);
        room.players[0].hand.extend([Card::new(1, "goods"), Card::new(2, "surge")]);
        let rules = test_rules();
        let mut rng = GameRng::new(1);

        let action = Action::Transfer {
            card_indices: smallvec![0, 1],
            dest: TransferDest::Pool { declared_kind: "goods".into() },
        };
        let res = resolve(&room, &rules, PlayerId::new(0), &action, &mut rng).unwrap();

        assert_eq!(res.room.pool.len(), 2);
        let decl = res.room.declaration.as_ref().unwrap();
        assert_eq!(decl.seat, PlayerId::new(0));
        assert_eq!(decl.kind, "goods");
        assert_eq!(decl.count, 2);
        // Declaring does not pass the turn; the inspector acts next.
        assert_eq!(res.room.turn_index, 0);

        // A second declaration is rejected while one is pending.
        let mut again = res.room.clone();
        again.players[0].hand.push(Card::new(3, "goods"));
        let err = resolve(&again, &rules, PlayerId::new(0), &action, &mut rng);
        assert!(matches!(
            err,
            Err(EngineError::Validation(ValidationError::DeclarationPending))
        ));
    }

    #[test]
    fn test_reveal_is_targeted_not_public() {
        let mut room = playing_room(3);
        room.players[1].hand.push(Card::new(1, "surge"));
        let rules = test_rules();
        let mut rng = GameRng::new(1);

        let action = Action::Reveal { target: PlayerId::new(1), mode: RevealMode::WholeHand };
        let res = resolve(&room, &rules, PlayerId::new(0), &action, &mut rng).unwrap();

        // The event carries detail, targeted at the actor only.
        assert_eq!(res.events.len(), 1);
        assert!(res.events[0].is_for(PlayerId::new(0)));
        assert!(!res.events[0].is_for(PlayerId::new(1)));
        assert_eq!(res.events[0].payload, EventPayload::Cards(vec![Card::new(1, "surge")]));

        // Public log lines never contain the card kind.
        for entry in res.logs.iter().filter(|l| l.viewer == LogViewer::All) {
            assert!(!entry.text.contains("surge"), "leak in: {}", entry.text);
        }
    }

    #[test]
    fn test_judgement_accept_pays_declarer() {
        let mut room = playing_room(3);
        room.phase = "inspect".into();
        room.players[2].role = Some("inspector".into());
        room.pool = vec![Card::new(1, "goods"), Card::new(2, "goods")];
        room.declaration =
            Some(Declaration { seat: PlayerId::new(0), kind: "goods".into(), count: 2 });
        let rules = test_rules();
        let mut rng = GameRng::new(1);

        let res = resolve(
            &room,
            &rules,
            PlayerId::new(2),
            &Action::Judgement { verdict: Verdict::Accept },
            &mut rng,
        )
        .unwrap();

        // base_payout 2 * 2 cards = 4 coins on top of the starting 10.
        assert_eq!(res.room.player(PlayerId::new(0)).resource("coins"), 14);
        assert!(res.room.declaration.is_none());
        assert!(res.room.pool.is_empty());
        assert_eq!(res.room.discard.len(), 2);
    }

    #[test]
    fn test_judgement_open_catches_mismatch() {
        let mut room = playing_room(3);
        room.phase = "inspect".into();
        room.players[2].role = Some("inspector".into());
        room.pool = vec![Card::new(1, "goods"), Card::new(2, "surge")];
        room.declaration =
            Some(Declaration { seat: PlayerId::new(0), kind: "goods".into(), count: 2 });
        let rules = test_rules();
        let mut rng = GameRng::new(1);

        let res = resolve(
            &room,
            &rules,
            PlayerId::new(2),
            &Action::Judgement { verdict: Verdict::Open },
            &mut rng,
        )
        .unwrap();

        // One mismatch at fine 3: declarer 10-3, inspector 10+3.
        assert_eq!(res.room.player(PlayerId::new(0)).resource("coins"), 7);
        assert_eq!(res.room.player(PlayerId::new(2)).resource("coins"), 13);
    }

    #[test]
    fn test_judgement_challenge_raises_stakes() {
        let mut room = playing_room(3);
        room.phase = "inspect".into();
        room.players[2].role = Some("inspector".into());
        room.pool = vec![Card::new(1, "goods")];
        room.declaration =
            Some(Declaration { seat: PlayerId::new(0), kind: "goods".into(), count: 1 });
        let rules = test_rules();
        let mut rng = GameRng::new(1);

        let res = resolve(
            &room,
            &rules,
            PlayerId::new(2),
            &Action::Judgement { verdict: Verdict::Challenge },
            &mut rng,
        )
        .unwrap();

        // Honest challenge: delivery 2 + penalty amplify(4, 50) = 6 to the
        // declarer, inspector pays 6.
        assert_eq!(res.room.player(PlayerId::new(0)).resource("coins"), 18);
        assert_eq!(res.room.player(PlayerId::new(2)).resource("coins"), 4);
    }

    #[test]
    fn test_judgement_without_declaration_rejected() {
        let mut room = playing_room(3);
        room.phase = "inspect".into();
        room.players[2].role = Some("inspector".into());
        let rules = test_rules();
        let mut rng = GameRng::new(1);

        let err = resolve(
            &room,
            &rules,
            PlayerId::new(2),
            &Action::Judgement { verdict: Verdict::Accept },
            &mut rng,
        );
        assert!(matches!(err, Err(EngineError::Validation(ValidationError::NoDeclaration))));
    }

    #[test]
    fn test_ultimate_spent_once_and_reveals_directive() {
        let mut room = playing_room(3);
        room.players[0].role = Some("broker".into());
        room.players[1].hand.extend([Card::new(1, "goods"), Card::new(2, "surge")]);
        let rules = test_rules();
        let mut rng = GameRng::new(1);

        let action = Action::Ultimate { target: Some(PlayerId::new(1)) };
        let res = resolve(&room, &rules, PlayerId::new(0), &action, &mut rng).unwrap();

        let actor = res.room.player(PlayerId::new(0));
        assert!(actor.flags.ultimate_spent);
        assert!(actor.directive_revealed);
        // amplify(1, 100) = 2 cards seized.
        assert_eq!(actor.hand.len(), 2);
        assert!(res.room.player(PlayerId::new(1)).hand.is_empty());

        // Second use is rejected.
        let err = resolve(&res.room, &rules, PlayerId::new(0), &action, &mut rng);
        assert!(matches!(err, Err(EngineError::Validation(ValidationError::UltimateSpent))));
    }

    #[test]
    fn test_ultimate_without_role_power_rejected() {
        let room = playing_room(3);
        let rules = test_rules();
        let mut rng = GameRng::new(1);

        let action = Action::Ultimate { target: Some(PlayerId::new(1)) };
        let err = resolve(&room, &rules, PlayerId::new(0), &action, &mut rng);
        assert!(matches!(err, Err(EngineError::Validation(ValidationError::NoUltimate))));
    }

    #[test]
    fn test_remove_cards_preserves_order() {
        let mut hand = vec![
            Card::new(0, "a"),
            Card::new(1, "b"),
            Card::new(2, "c"),
            Card::new(3, "d"),
        ];
        let removed = remove_cards(&mut hand, &[3, 0]);
        assert_eq!(removed, vec![Card::new(0, "a"), Card::new(3, "d")]);
        assert_eq!(hand, vec![Card::new(1, "b"), Card::new(2, "c")]);
    }
}
