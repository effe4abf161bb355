//! Card tokens.
//!
//! A card is an opaque typed token: a deck-unique id plus a kind string.
//! Kinds serialize as plain strings so the room document stays portable
//! across independently-deployed clients. The deck is a closed system:
//! cards move between deck, hands, the declaration pool, and discard, but
//! are never created or destroyed except at re-deal.

use serde::{Deserialize, Serialize};

/// One card in circulation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Unique within one built deck.
    pub id: u32,
    /// Kind identifier, defined by the game's deck spec.
    pub kind: String,
}

impl Card {
    /// Create a new card.
    pub fn new(id: u32, kind: impl Into<String>) -> Self {
        Self { id, kind: kind.into() }
    }

    /// Check the card's kind.
    #[must_use]
    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

/// Count cards of a kind in a slice.
#[must_use]
pub fn count_kind(cards: &[Card], kind: &str) -> usize {
    cards.iter().filter(|c| c.is_kind(kind)).count()
}
