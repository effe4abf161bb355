//! Deck construction, shuffling, and constrained drawing.
//!
//! A deck is an ordered `Vec<Card>` whose top is the end of the vec. Games
//! describe their decks with a [`DeckSpec`]: per-kind counts that scale with
//! player count, optionally doubled for long games. The built deck is a
//! closed multiset; everything that happens afterwards moves cards between
//! deck, hands, pool, and discard.

use serde::{Deserialize, Serialize};

use crate::core::{Card, GameRng};
use crate::error::EngineError;

/// One card kind in a deck spec.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindSpec {
    pub name: String,
    /// Fixed count regardless of player count.
    pub base: u32,
    /// Additional copies per seated player.
    pub per_player: u32,
    /// Counts toward the elimination threshold when held in hand.
    pub hazard: bool,
}

impl KindSpec {
    /// Create a new kind spec.
    pub fn new(name: impl Into<String>, base: u32, per_player: u32) -> Self {
        Self { name: name.into(), base, per_player, hazard: false }
    }

    /// Mark this kind as a hazard.
    #[must_use]
    pub fn hazard(mut self) -> Self {
        self.hazard = true;
        self
    }
}

/// Deck description for one game variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSpec {
    pub kinds: Vec<KindSpec>,
    /// Multiplier applied to every count when the room plays a long game.
    pub long_multiplier: u32,
}

impl DeckSpec {
    /// Create a spec with the default long-game multiplier of 2.
    pub fn new(kinds: Vec<KindSpec>) -> Self {
        Self { kinds, long_multiplier: 2 }
    }

    /// Copies of one kind for a given table size.
    #[must_use]
    pub fn count_for(&self, kind: &KindSpec, player_count: usize, long_game: bool) -> usize {
        let count = kind.base as usize + kind.per_player as usize * player_count;
        if long_game {
            count * self.long_multiplier as usize
        } else {
            count
        }
    }

    /// Total deck size for a given table.
    #[must_use]
    pub fn total(&self, player_count: usize, long_game: bool) -> usize {
        self.kinds.iter().map(|k| self.count_for(k, player_count, long_game)).sum()
    }

    /// Whether a kind name is a hazard in this spec.
    #[must_use]
    pub fn is_hazard(&self, kind: &str) -> bool {
        self.kinds.iter().any(|k| k.hazard && k.name == kind)
    }

    /// Count hazard cards in a hand.
    #[must_use]
    pub fn hazard_count(&self, hand: &[Card]) -> usize {
        hand.iter().filter(|c| self.is_hazard(&c.kind)).count()
    }
}

/// Build the full card multiset for a table, unshuffled. Card ids are
/// sequential and unique within the built deck.
#[must_use]
pub fn build(spec: &DeckSpec, player_count: usize, long_game: bool) -> Vec<Card> {
    let mut cards = Vec::with_capacity(spec.total(player_count, long_game));
    let mut next_id = 0u32;
    for kind in &spec.kinds {
        for _ in 0..spec.count_for(kind, player_count, long_game) {
            cards.push(Card::new(next_id, kind.name.clone()));
            next_id += 1;
        }
    }
    cards
}

/// Uniform random permutation.
pub fn shuffle(cards: &mut [Card], rng: &mut GameRng) {
    rng.shuffle(cards);
}

/// Draw from the top of the deck, skipping cards the reject predicate
/// refuses for the current hand.
///
/// Rejected cards are set aside and returned to the bottom of the deck
/// before the call returns, in the order they were rejected. Never loops
/// while an acceptable card remains; returns `None` only when the deck
/// holds no acceptable card.
pub fn draw_constrained(
    deck: &mut Vec<Card>,
    hand: &[Card],
    reject: impl Fn(&Card, &[Card]) -> bool,
) -> Option<Card> {
    let mut set_aside = Vec::new();
    let mut drawn = None;

    while let Some(card) = deck.pop() {
        if reject(&card, hand) {
            set_aside.push(card);
        } else {
            drawn = Some(card);
            break;
        }
    }

    // Rejected cards go back under the deck.
    deck.splice(0..0, set_aside);
    drawn
}

/// Turn the discard pile into a freshly shuffled deck.
///
/// Only legal when the deck is empty. Errors with
/// [`EngineError::ResourceExhaustion`] when the discard is empty too.
pub fn reshuffle_from_discard(
    deck: &mut Vec<Card>,
    discard: &mut Vec<Card>,
    rng: &mut GameRng,
) -> Result<(), EngineError> {
    if discard.is_empty() {
        return Err(EngineError::ResourceExhaustion);
    }
    deck.append(discard);
    shuffle(deck, rng);
    tracing::debug!(deck_len = deck.len(), "reshuffled discard into deck");
    Ok(())
}

/// Draw one card, reshuffling the discard in first if the deck is empty.
pub fn draw_with_reshuffle(
    deck: &mut Vec<Card>,
    discard: &mut Vec<Card>,
    rng: &mut GameRng,
) -> Result<Card, EngineError> {
    if deck.is_empty() {
        reshuffle_from_discard(deck, discard, rng)?;
    }
    deck.pop().ok_or(EngineError::ResourceExhaustion)
}
