//! Role definitions and per-round assignment.
//!
//! Games describe their roles as a list of [`RoleDef`]s. Assignment builds a
//! pool (unique roles once each, repeatable roles cycled to fill the
//! table), shuffles it, and zips it onto seats. Some roles only enter the
//! pool at a minimum table size, and one role per game may be forced onto a
//! specific seat after assignment (the rotating inspector).

use serde::{Deserialize, Serialize};

use crate::core::{GameRng, Player, PlayerId};
use crate::error::ValidationError;

/// A hidden per-player win predicate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Directive {
    /// A resource total reaches a threshold.
    ResourceAtLeast { key: String, min: i64 },
    /// A counted action (trades, declarations, ...) reaches a threshold.
    ActionCount { key: String, min: i64 },
    /// Any player's currency has gone below zero.
    FirstCrash,
    /// The hand holds at least `min` cards of `kind`.
    HandComposition { kind: String, min: usize },
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Directive::ResourceAtLeast { key, min } => write!(f, "amass {} {}", min, key),
            Directive::ActionCount { key, min } => write!(f, "complete {} {}", min, key),
            Directive::FirstCrash => write!(f, "witness the first crash"),
            Directive::HandComposition { kind, min } => write!(f, "hold {} {}", min, kind),
        }
    }
}

/// Which action family an ultimate amplifies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionFamily {
    Transfer,
    Reveal,
    Judgement,
}

/// A role's one-time amplified power.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UltimateSpec {
    pub family: ActionFamily,
    /// Amplification in percent, applied multiplicatively to the base effect.
    pub amplify_pct: i64,
}

/// One role in a game's rule table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDef {
    pub name: String,
    /// Role enters the pool only at this table size.
    pub min_players: usize,
    /// At most one seat may hold this role.
    pub unique: bool,
    /// Overrides the game's base hazard threshold when higher tolerance.
    pub hazard_tolerance: Option<u32>,
    /// Percentage bonus applied to this seat's payouts.
    pub payout_bonus_pct: i64,
    /// Grants a one-use life token.
    pub grants_badge: bool,
    pub directive: Option<Directive>,
    pub ultimate: Option<UltimateSpec>,
}

impl RoleDef {
    /// Create a repeatable role with no constraints.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_players: 0,
            unique: false,
            hazard_tolerance: None,
            payout_bonus_pct: 0,
            grants_badge: false,
            directive: None,
            ultimate: None,
        }
    }

    /// Only enters the pool at this table size.
    #[must_use]
    pub fn min_players(mut self, min: usize) -> Self {
        self.min_players = min;
        self
    }

    /// At most one seat holds this role.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Override the hazard threshold for this role.
    #[must_use]
    pub fn hazard_tolerance(mut self, threshold: u32) -> Self {
        self.hazard_tolerance = Some(threshold);
        self
    }

    /// Payout bonus in percent.
    #[must_use]
    pub fn payout_bonus_pct(mut self, pct: i64) -> Self {
        self.payout_bonus_pct = pct;
        self
    }

    /// Grant a one-use life token.
    #[must_use]
    pub fn with_badge(mut self) -> Self {
        self.grants_badge = true;
        self
    }

    /// Attach a hidden directive.
    #[must_use]
    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directive = Some(directive);
        self
    }

    /// Attach an ultimate power.
    #[must_use]
    pub fn with_ultimate(mut self, family: ActionFamily, amplify_pct: i64) -> Self {
        self.ultimate = Some(UltimateSpec { family, amplify_pct });
        self
    }
}

/// Post-assignment constraints.
#[derive(Clone, Debug, Default)]
pub struct AssignConstraints {
    /// Force this role onto this seat after assignment. The forced seat
    /// carries no secondary role and no directive.
    pub forced: Option<(PlayerId, String)>,
}

/// Find a role definition by name.
#[must_use]
pub fn find_def<'a>(defs: &'a [RoleDef], name: &str) -> Option<&'a RoleDef> {
    defs.iter().find(|d| d.name == name)
}

/// Assign roles for a round.
///
/// Clears every prior-round assignment first, so re-running each round
/// never carries anything over.
pub fn assign(
    players: &mut [Player],
    defs: &[RoleDef],
    constraints: &AssignConstraints,
    rng: &mut GameRng,
) -> Result<(), ValidationError> {
    for player in players.iter_mut() {
        player.role = None;
        player.directive = None;
        player.directive_revealed = false;
        player.flags.badge = false;
    }

    // A seat-forced role never enters the shuffled pool, so it cannot end
    // up on a second seat.
    let forced_name = constraints.forced.as_ref().map(|(_, name)| name.as_str());
    let eligible: Vec<&RoleDef> = defs
        .iter()
        .filter(|d| d.min_players <= players.len() && Some(d.name.as_str()) != forced_name)
        .collect();
    let repeatable: Vec<&RoleDef> = eligible.iter().copied().filter(|d| !d.unique).collect();

    // Each eligible role once, then cycle the repeatable ones until every
    // seat is covered.
    let mut pool: Vec<&RoleDef> = eligible.clone();
    let mut cycle = 0usize;
    while pool.len() < players.len() {
        if repeatable.is_empty() {
            return Err(ValidationError::RolePoolTooSmall {
                seats: players.len(),
                pool: pool.len(),
            });
        }
        pool.push(repeatable[cycle % repeatable.len()]);
        cycle += 1;
    }

    rng.shuffle(&mut pool);

    for (player, def) in players.iter_mut().zip(pool.iter()) {
        player.role = Some(def.name.clone());
        player.directive = def.directive.clone();
        player.flags.badge = def.grants_badge;
    }

    if let Some((seat, role_name)) = &constraints.forced {
        let def = find_def(defs, role_name)
            .ok_or_else(|| ValidationError::UnknownRole { name: role_name.clone() })?;
        let player = &mut players[seat.index()];
        player.role = Some(def.name.clone());
        player.directive = None;
        player.flags.badge = def.grants_badge;
    }

    Ok(())
}
