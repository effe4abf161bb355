//! Seats and per-seat player records.
//!
//! [`PlayerId`] is a seat index; the engine addresses players by seat.
//! Clients address players by `uid`, which the room resolves to a seat.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::card::Card;
use crate::roles::Directive;

/// Seat index, 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new seat id.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Raw seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all seats for a `player_count`-seat room.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "seat {}", self.0)
    }
}

/// Boolean status flags on a seat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerFlags {
    /// Out of the current round; hand already moved to discard.
    pub eliminated: bool,
    /// Badge / life-token granted by some roles.
    pub badge: bool,
    /// The one-per-round ultimate has been used.
    pub ultimate_spent: bool,
    /// This seat's currency went below zero first.
    pub crashed: bool,
}

/// One seat's full mutable record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// External identity; clients address players by uid.
    pub uid: String,
    /// Display name.
    pub name: String,
    /// Private hand.
    pub hand: Vec<Card>,
    /// Public role name, if assigned.
    pub role: Option<String>,
    /// Hidden win condition, revealed by an ultimate or at round end.
    pub directive: Option<Directive>,
    /// Whether the directive is publicly visible.
    pub directive_revealed: bool,
    /// Currency / chips / counters. Keys are game-defined.
    pub resources: FxHashMap<String, i64>,
    /// Status flags.
    pub flags: PlayerFlags,
    /// Ready toggle for simultaneous phases.
    pub ready: bool,
}

impl Player {
    /// Create a fresh, unseated player record.
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            hand: Vec::new(),
            role: None,
            directive: None,
            directive_revealed: false,
            resources: FxHashMap::default(),
            flags: PlayerFlags::default(),
            ready: false,
        }
    }

    /// Still in the round.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.flags.eliminated
    }

    /// Get a resource value, defaulting to 0.
    #[must_use]
    pub fn resource(&self, key: &str) -> i64 {
        self.resources.get(key).copied().unwrap_or(0)
    }

    /// Set a resource value.
    pub fn set_resource(&mut self, key: impl Into<String>, value: i64) {
        self.resources.insert(key.into(), value);
    }

    /// Adjust a resource by a delta.
    pub fn add_resource(&mut self, key: &str, delta: i64) {
        let current = self.resource(key);
        self.resources.insert(key.to_string(), current + delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_all() {
        let seats: Vec<_> = PlayerId::all(4).collect();
        assert_eq!(seats.len(), 4);
        assert_eq!(seats[0], PlayerId::new(0));
        assert_eq!(seats[3], PlayerId::new(3));
        assert_eq!(format!("{}", seats[1]), "seat 1");
    }

    #[test]
    fn test_new_player_defaults() {
        let p = Player::new("u1", "Ada");
        assert!(p.is_active());
        assert!(p.hand.is_empty());
        assert!(p.role.is_none());
        assert!(!p.ready);
        assert_eq!(p.resource("coins"), 0);
    }

    #[test]
    fn test_resources() {
        let mut p = Player::new("u1", "Ada");
        p.set_resource("coins", 10);
        p.add_resource("coins", -3);
        assert_eq!(p.resource("coins"), 7);

        p.add_resource("trades", 1);
        assert_eq!(p.resource("trades"), 1);
    }

    #[test]
    fn test_eliminated_is_not_active() {
        let mut p = Player::new("u1", "Ada");
        p.flags.eliminated = true;
        assert!(!p.is_active());
    }
}
