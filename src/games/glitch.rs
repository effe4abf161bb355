//! Hidden-directive trading game.
//!
//! Every seat gets a secret directive and works the table through draws,
//! one-for-one trades, and reveals; ice cards accumulate toward an
//! overload. Spending the role's glitch power amplifies one action and
//! makes the spender's directive public for the rest of the round.

use crate::deck::{DeckSpec, KindSpec};
use crate::phase::{PhaseActor, PhaseSpec, PhaseTable, Trigger};
use crate::resolve::ActionKind;
use crate::roles::{ActionFamily, Directive, RoleDef};
use crate::rules::{JudgementRules, RuleSet};

/// Rule table for the directive game.
#[must_use]
pub fn glitch() -> RuleSet {
    let deck = DeckSpec::new(vec![
        KindSpec::new("data", 10, 2),
        KindSpec::new("cred", 8, 2),
        KindSpec::new("keycode", 6, 1),
        KindSpec::new("ice", 2, 1).hazard(),
    ]);

    let roles = vec![
        RoleDef::new("runner")
            .unique()
            .with_directive(Directive::ResourceAtLeast { key: "coins".into(), min: 15 })
            .with_ultimate(ActionFamily::Reveal, 100),
        RoleDef::new("fixer")
            .unique()
            .payout_bonus_pct(25)
            .with_directive(Directive::ActionCount { key: "trades".into(), min: 4 }),
        RoleDef::new("ghost")
            .unique()
            .with_badge()
            .with_directive(Directive::FirstCrash),
        RoleDef::new("courier")
            .unique()
            .with_directive(Directive::HandComposition { kind: "keycode".into(), min: 4 }),
        RoleDef::new("auditor")
            .unique()
            .min_players(5)
            .with_directive(Directive::ResourceAtLeast { key: "coins".into(), min: 12 })
            .with_ultimate(ActionFamily::Judgement, 50),
        RoleDef::new("splicer")
            .with_directive(Directive::ResourceAtLeast { key: "coins".into(), min: 12 }),
    ];

    let phases = PhaseTable::new("setup")
        .with_phase(PhaseSpec::new("setup", PhaseActor::Nobody))
        .with_phase(PhaseSpec::new("prep", PhaseActor::Everyone).allow(ActionKind::Ready))
        .with_phase(
            PhaseSpec::new("turn", PhaseActor::TurnPlayer)
                .allow(ActionKind::Draw)
                .allow(ActionKind::Transfer)
                .allow(ActionKind::Reveal)
                .allow(ActionKind::Ultimate),
        )
        .with_phase(PhaseSpec::new("finished", PhaseActor::Nobody))
        .with_transition("setup", Trigger::Start, "prep")
        .with_transition("prep", Trigger::AllReady, "turn")
        .with_transition("turn", Trigger::ActionResolved, "turn")
        .with_transition("turn", Trigger::GameOver, "finished");

    RuleSet {
        name: "glitch".into(),
        min_players: 3,
        max_players: 7,
        deck,
        hand_size: 5,
        deal_max_per_kind: vec![("ice".into(), 1), ("keycode".into(), 3)],
        roles,
        forced_role: None,
        phases,
        hazard_threshold: 3,
        forced_draw_on_turn_start: false,
        judgement: JudgementRules::default(),
        event_bonus_pct: 10,
        starting_resources: vec![("coins".into(), 8), ("trades".into(), 0)],
    }
}
