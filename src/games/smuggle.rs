//! Declaration-and-inspection game.
//!
//! Each turn the declarer commits a face-down crate of cards with a
//! declared kind, and the rotating inspector accepts it, opens it, or
//! challenges it for raised stakes. Payouts and fines come straight from
//! the judgement constants; contraband kinds count toward the overload
//! threshold for anyone hoarding them.

use crate::deck::{DeckSpec, KindSpec};
use crate::phase::{PhaseActor, PhaseSpec, PhaseTable, Trigger};
use crate::resolve::ActionKind;
use crate::roles::{ActionFamily, Directive, RoleDef};
use crate::rules::{JudgementRules, RuleSet};

/// Rule table for the declaration game.
#[must_use]
pub fn smuggle() -> RuleSet {
    let deck = DeckSpec::new(vec![
        KindSpec::new("grain", 10, 2),
        KindSpec::new("cloth", 8, 2),
        KindSpec::new("spice", 6, 1),
        KindSpec::new("contraband", 0, 3).hazard(),
        KindSpec::new("relic", 2, 0).hazard(),
    ]);

    let roles = vec![
        // The forced rotating seat; judges declarations, has no directive.
        RoleDef::new("inspector").unique(),
        RoleDef::new("fence")
            .unique()
            .min_players(5)
            .payout_bonus_pct(25)
            .with_directive(Directive::ResourceAtLeast { key: "coins".into(), min: 30 }),
        RoleDef::new("informant")
            .unique()
            .min_players(6)
            .with_ultimate(ActionFamily::Reveal, 100)
            .with_directive(Directive::ResourceAtLeast { key: "coins".into(), min: 25 }),
        RoleDef::new("courier")
            .unique()
            .with_directive(Directive::ActionCount { key: "declarations".into(), min: 3 }),
        RoleDef::new("hoarder")
            .unique()
            .hazard_tolerance(6)
            .with_directive(Directive::HandComposition { kind: "contraband".into(), min: 4 }),
        RoleDef::new("trader")
            .with_directive(Directive::ResourceAtLeast { key: "coins".into(), min: 25 }),
    ];

    let phases = PhaseTable::new("setup")
        .with_phase(PhaseSpec::new("setup", PhaseActor::Nobody))
        .with_phase(PhaseSpec::new("prep", PhaseActor::Everyone).allow(ActionKind::Ready))
        .with_phase(
            PhaseSpec::new("declare", PhaseActor::TurnPlayer)
                .allow(ActionKind::Declare)
                .allow(ActionKind::Ultimate),
        )
        .with_phase(
            PhaseSpec::new("inspect", PhaseActor::Role("inspector".into()))
                .allow(ActionKind::Judgement)
                .allow(ActionKind::Ultimate),
        )
        .with_phase(PhaseSpec::new("finished", PhaseActor::Nobody))
        .with_transition("setup", Trigger::Start, "prep")
        .with_transition("prep", Trigger::AllReady, "declare")
        .with_transition("declare", Trigger::ActionResolved, "inspect")
        .with_transition("inspect", Trigger::JudgementResolved, "declare")
        .with_transition("declare", Trigger::GameOver, "finished")
        .with_transition("inspect", Trigger::GameOver, "finished");

    RuleSet {
        name: "smuggle".into(),
        min_players: 4,
        max_players: 8,
        deck,
        hand_size: 5,
        deal_max_per_kind: vec![("contraband".into(), 2)],
        roles,
        forced_role: Some("inspector".into()),
        phases,
        hazard_threshold: 4,
        forced_draw_on_turn_start: false,
        judgement: JudgementRules::default(),
        event_bonus_pct: 0,
        starting_resources: vec![("coins".into(), 10), ("declarations".into(), 0)],
    }
}
