//! Hazard-draw elimination game.
//!
//! Turns are mostly forced draws from a deck salted with surge cards; a
//! single surge in hand overloads the holder unless their role tolerates
//! more or a breaker absorbs it. Eliminations cascade, since the next seat
//! must draw immediately. Last active seat standing wins.

use crate::deck::{DeckSpec, KindSpec};
use crate::phase::{PhaseActor, PhaseSpec, PhaseTable, Trigger};
use crate::resolve::ActionKind;
use crate::roles::{ActionFamily, Directive, RoleDef};
use crate::rules::{JudgementRules, RuleSet};

/// Rule table for the hazard-draw game.
#[must_use]
pub fn overload() -> RuleSet {
    let deck = DeckSpec::new(vec![
        KindSpec::new("scrap", 10, 2),
        KindSpec::new("charge", 6, 2),
        KindSpec::new("shield", 4, 1),
        KindSpec::new("surge", 0, 1).hazard(),
    ]);

    let roles = vec![
        // Survives one surge more than anyone else.
        RoleDef::new("engineer").unique().hazard_tolerance(2),
        // Carries a breaker that absorbs the first overload.
        RoleDef::new("medic").unique().with_badge(),
        RoleDef::new("scavenger")
            .unique()
            .with_directive(Directive::HandComposition { kind: "scrap".into(), min: 5 }),
        RoleDef::new("saboteur").unique().with_ultimate(ActionFamily::Transfer, 100),
        RoleDef::new("drone"),
    ];

    let phases = PhaseTable::new("setup")
        .with_phase(PhaseSpec::new("setup", PhaseActor::Nobody))
        .with_phase(PhaseSpec::new("prep", PhaseActor::Everyone).allow(ActionKind::Ready))
        .with_phase(
            PhaseSpec::new("turn", PhaseActor::TurnPlayer)
                .allow(ActionKind::Draw)
                .allow(ActionKind::Transfer)
                .allow(ActionKind::Ultimate),
        )
        .with_phase(PhaseSpec::new("finished", PhaseActor::Nobody))
        .with_transition("setup", Trigger::Start, "prep")
        .with_transition("prep", Trigger::AllReady, "turn")
        .with_transition("turn", Trigger::ActionResolved, "turn")
        .with_transition("turn", Trigger::GameOver, "finished");

    RuleSet {
        name: "overload".into(),
        min_players: 2,
        max_players: 6,
        deck,
        hand_size: 4,
        // The opening deal never hands anyone a surge.
        deal_max_per_kind: vec![("surge".into(), 0)],
        roles,
        forced_role: None,
        phases,
        hazard_threshold: 1,
        forced_draw_on_turn_start: true,
        judgement: JudgementRules::default(),
        event_bonus_pct: 0,
        starting_resources: vec![("coins".into(), 3), ("trades".into(), 0)],
    }
}
