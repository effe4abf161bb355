//! Deterministic random number generation.
//!
//! Every source of randomness in the engine (deck shuffles, role pools,
//! random trade picks) goes through [`GameRng`]. The RNG state is carried
//! inside the room document ([`GameRngState`] in `Settings`), so whichever
//! client resolves the next action continues the exact same stream. This is
//! what makes rounds replayable and property tests reproducible.
//!
//! Uses ChaCha8: fast, high quality, and its stream position serializes as a
//! single counter, so capturing state is O(1) no matter how many values have
//! been drawn.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Seedable RNG backing all in-engine randomness.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed), seed }
    }

    /// The seed this RNG was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random `usize` in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place (Fisher–Yates via `rand`).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Capture the stream state for persisting in the room document.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState { seed: self.seed, word_pos: self.inner.get_word_pos() }
    }

    /// Restore an RNG from a persisted state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self { inner, seed: state.seed }
    }
}

/// Serializable RNG stream position, stored in the room document so every
/// client resolves randomness from the same point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed.
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter).
    pub word_pos: u128,
}

impl Default for GameRngState {
    fn default() -> Self {
        GameRng::new(0).state()
    }
}
