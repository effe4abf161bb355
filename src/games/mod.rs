//! Shipped game variants.
//!
//! Each variant is pure data: a [`RuleSet`](crate::rules::RuleSet) built
//! from deck kinds, role definitions, and a phase graph. The engine,
//! resolver, elimination chain, and win evaluator never branch on the
//! variant name.

mod glitch;
mod overload;
mod smuggle;

pub use glitch::glitch;
pub use overload::overload;
pub use smuggle::smuggle;

use crate::rules::RuleSet;

/// Look up a shipped variant by its table name.
#[must_use]
pub fn by_name(name: &str) -> Option<RuleSet> {
    match name {
        "smuggle" => Some(smuggle()),
        "overload" => Some(overload()),
        "glitch" => Some(glitch()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name_round_trips_every_variant() {
        for name in ["smuggle", "overload", "glitch"] {
            let rules = by_name(name).unwrap();
            assert_eq!(rules.name, name);
        }
        assert!(by_name("poker").is_none());
    }

    #[test]
    fn test_every_variant_has_a_coherent_phase_graph() {
        for rules in [smuggle(), overload(), glitch()] {
            // The initial phase and every transition endpoint must exist.
            assert!(rules.phases.spec(&rules.phases.initial).is_some(), "{}", rules.name);
            for (from, _, to) in &rules.phases.transitions {
                assert!(rules.phases.spec(from).is_some(), "{}: {}", rules.name, from);
                assert!(rules.phases.spec(to).is_some(), "{}: {}", rules.name, to);
            }
        }
    }

    #[test]
    fn test_every_variant_deck_covers_a_full_deal() {
        for rules in [smuggle(), overload(), glitch()] {
            for players in rules.min_players..=rules.max_players {
                assert!(
                    rules.deck.total(players, false) >= rules.min_deck_size(),
                    "{} deck too small for {} players",
                    rules.name,
                    players
                );
            }
        }
    }

    #[test]
    fn test_forced_roles_exist_in_their_role_set() {
        for rules in [smuggle(), overload(), glitch()] {
            if let Some(forced) = &rules.forced_role {
                assert!(rules.role_def(forced).is_some(), "{}", rules.name);
            }
        }
    }
}
