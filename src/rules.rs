//! The per-game rule table.
//!
//! All three shipped variants (and any future one) are instances of
//! [`RuleSet`]: deck spec, roles, phase graph, thresholds, and payout
//! constants. The engine, resolver, elimination chain, and win evaluator
//! are parameterized by a `RuleSet` and contain no per-game branching.

use serde::{Deserialize, Serialize};

use crate::core::{count_kind, Card, Player};
use crate::deck::DeckSpec;
use crate::error::ValidationError;
use crate::phase::PhaseTable;
use crate::roles::{find_def, RoleDef, UltimateSpec};

/// Deterministic payout constants for judgement verdicts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgementRules {
    /// Per-card payout for a delivered declaration.
    pub base_payout: i64,
    /// Paid by the inspector to the declarer on an honest open.
    pub honest_penalty: i64,
    /// Paid by the declarer to the inspector per mismatching card.
    pub mismatch_fine: i64,
    /// Extra stake percentage when the verdict is a challenge.
    pub challenge_pct: i64,
}

impl Default for JudgementRules {
    fn default() -> Self {
        Self { base_payout: 2, honest_penalty: 4, mismatch_fine: 3, challenge_pct: 50 }
    }
}

/// One game variant, fully described as data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub name: String,
    pub min_players: usize,
    pub max_players: usize,
    pub deck: DeckSpec,
    /// Cards dealt to each seat at round start.
    pub hand_size: usize,
    /// Deal-time constraint: maximum copies of a kind a dealt hand may hold.
    pub deal_max_per_kind: Vec<(String, usize)>,
    pub roles: Vec<RoleDef>,
    /// Role forced onto a rotating seat each round (e.g. the inspector).
    pub forced_role: Option<String>,
    pub phases: PhaseTable,
    /// Hazard cards in hand at or above this count eliminate the holder.
    pub hazard_threshold: u32,
    /// The seat receiving the turn after an elimination must draw.
    pub forced_draw_on_turn_start: bool,
    pub judgement: JudgementRules,
    /// Global event bonus applied after role bonuses.
    pub event_bonus_pct: i64,
    /// Per-round starting resources; the persistent `score` is kept aside.
    pub starting_resources: Vec<(String, i64)>,
}

impl RuleSet {
    /// Check a table size against this game's bounds.
    pub fn validate_player_count(&self, have: usize) -> Result<(), ValidationError> {
        if have < self.min_players || have > self.max_players {
            return Err(ValidationError::PlayerCount {
                min: self.min_players,
                max: self.max_players,
                have,
            });
        }
        Ok(())
    }

    /// Look up a role definition.
    #[must_use]
    pub fn role_def(&self, name: &str) -> Option<&RoleDef> {
        find_def(&self.roles, name)
    }

    /// The payout bonus percentage granted by a player's role.
    #[must_use]
    pub fn payout_bonus_pct(&self, player: &Player) -> i64 {
        player
            .role
            .as_deref()
            .and_then(|r| self.role_def(r))
            .map_or(0, |d| d.payout_bonus_pct)
    }

    /// The hazard threshold for a player, honoring role tolerance overrides.
    #[must_use]
    pub fn hazard_threshold_for(&self, player: &Player) -> u32 {
        player
            .role
            .as_deref()
            .and_then(|r| self.role_def(r))
            .and_then(|d| d.hazard_tolerance)
            .unwrap_or(self.hazard_threshold)
    }

    /// The ultimate spec for a player's role, if any.
    #[must_use]
    pub fn ultimate_for(&self, player: &Player) -> Option<&UltimateSpec> {
        player.role.as_deref().and_then(|r| self.role_def(r)).and_then(|d| d.ultimate.as_ref())
    }

    /// Whether a seat takes regular turns. The forced-role seat (the
    /// rotating judge) acts through its own phase and never holds the turn.
    #[must_use]
    pub fn takes_turns(&self, player: &Player) -> bool {
        match (&self.forced_role, &player.role) {
            (Some(forced), Some(role)) => forced != role,
            _ => true,
        }
    }

    /// Deal-time reject predicate from `deal_max_per_kind`.
    #[must_use]
    pub fn deal_reject(&self, card: &Card, hand: &[Card]) -> bool {
        self.deal_max_per_kind
            .iter()
            .any(|(kind, max)| card.is_kind(kind) && count_kind(hand, kind) >= *max)
    }

    /// Minimum deck size this table needs: a full deal for the largest
    /// table plus a reshuffle buffer of one hand.
    #[must_use]
    pub fn min_deck_size(&self) -> usize {
        (self.max_players + 1) * self.hand_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::KindSpec;
    use crate::phase::PhaseTable;
    use crate::roles::RoleDef;

    fn rules() -> RuleSet {
        RuleSet {
            name: "test".into(),
            min_players: 3,
            max_players: 6,
            deck: DeckSpec::new(vec![
                KindSpec::new("goods", 10, 2),
                KindSpec::new("surge", 2, 1).hazard(),
            ]),
            hand_size: 3,
            deal_max_per_kind: vec![("surge".into(), 1)],
            roles: vec![
                RoleDef::new("engineer").hazard_tolerance(4).payout_bonus_pct(25),
                RoleDef::new("crew"),
            ],
            forced_role: None,
            phases: PhaseTable::new("setup"),
            hazard_threshold: 2,
            forced_draw_on_turn_start: false,
            judgement: JudgementRules::default(),
            event_bonus_pct: 0,
            starting_resources: vec![("coins".into(), 10)],
        }
    }

    #[test]
    fn test_player_count_bounds() {
        let r = rules();
        assert!(r.validate_player_count(3).is_ok());
        assert!(r.validate_player_count(6).is_ok());
        assert!(matches!(
            r.validate_player_count(2),
            Err(ValidationError::PlayerCount { min: 3, max: 6, have: 2 })
        ));
        assert!(r.validate_player_count(7).is_err());
    }

    #[test]
    fn test_role_threshold_override() {
        let r = rules();
        let mut p = Player::new("u", "P");
        assert_eq!(r.hazard_threshold_for(&p), 2);

        p.role = Some("engineer".into());
        assert_eq!(r.hazard_threshold_for(&p), 4);

        p.role = Some("crew".into());
        assert_eq!(r.hazard_threshold_for(&p), 2);
    }

    #[test]
    fn test_payout_bonus_lookup() {
        let r = rules();
        let mut p = Player::new("u", "P");
        assert_eq!(r.payout_bonus_pct(&p), 0);
        p.role = Some("engineer".into());
        assert_eq!(r.payout_bonus_pct(&p), 25);
    }

    #[test]
    fn test_deal_reject_predicate() {
        let r = rules();
        let surge = Card::new(0, "surge");
        let goods = Card::new(1, "goods");

        let empty: Vec<Card> = vec![];
        assert!(!r.deal_reject(&surge, &empty));

        let one_surge = vec![Card::new(9, "surge")];
        assert!(r.deal_reject(&surge, &one_surge));
        assert!(!r.deal_reject(&goods, &one_surge));
    }

    #[test]
    fn test_min_deck_size_covers_deal_plus_buffer() {
        let r = rules();
        assert_eq!(r.min_deck_size(), 21);
        // The configured deck comfortably covers it at max table size.
        assert!(r.deck.total(6, false) >= r.min_deck_size());
    }
}
