//! Deterministic random number generation for dealing.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces the same shuffles
//! - **Per-round streams**: A match forks one independent stream per round,
//!   so any round can be replayed from its seed alone
//! - **Serializable**: State capture and restore for snapshots
//!
//! ```
//! use domino_engine::core::GameRng;
//!
//! let mut match_rng = GameRng::new(42);
//! let mut round_one = match_rng.fork();
//! let mut round_two = match_rng.fork();
//!
//! let mut a: Vec<u8> = (0..28).collect();
//! let mut b = a.clone();
//! round_one.shuffle(&mut a);
//! round_two.shuffle(&mut b);
//! assert_ne!(a, b);
//! ```

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic RNG backed by ChaCha8.
///
/// ChaCha8 keeps cryptographic-quality output while staying cheap enough to
/// fork once per round.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Create an RNG seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::rngs::OsRng.next_u64())
    }

    /// The seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork an independent stream (one per round).
    ///
    /// Each fork produces a different but deterministic sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self::new(fork_seed)
    }

    /// Draw a fresh 64-bit seed from this stream.
    pub fn next_seed(&mut self) -> u64 {
        self.inner.gen()
    }

    /// Uniform shuffle in place (Fisher–Yates).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

/// Serializable RNG state for snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position
    pub word_pos: u128,
    /// Forks taken so far
    pub fork_counter: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shuffled(rng: &mut GameRng) -> Vec<u8> {
        let mut data: Vec<u8> = (0..28).collect();
        rng.shuffle(&mut data);
        data
    }

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);
        assert_eq!(shuffled(&mut rng1), shuffled(&mut rng2));
    }

    #[test]
    fn test_different_seeds() {
        assert_ne!(shuffled(&mut GameRng::new(1)), shuffled(&mut GameRng::new(2)));
    }

    #[test]
    fn test_forks_are_independent_and_deterministic() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        let mut a1 = rng1.fork();
        let mut b1 = rng1.fork();
        let mut a2 = rng2.fork();

        assert_eq!(a1.seed(), a2.seed());
        assert_ne!(a1.seed(), b1.seed());
        assert_eq!(shuffled(&mut a1), shuffled(&mut a2));
        assert_ne!(shuffled(&mut b1), shuffled(&mut GameRng::new(42)));
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = GameRng::new(7);
        let mut data = shuffled(&mut rng);
        assert_ne!(data, (0..28).collect::<Vec<u8>>());
        data.sort_unstable();
        assert_eq!(data, (0..28).collect::<Vec<u8>>());
    }

    #[test]
    fn test_state_restore() {
        let mut rng = GameRng::new(42);
        let _ = shuffled(&mut rng);
        let _ = rng.fork();

        let state = rng.state();
        let expected = shuffled(&mut rng);

        let mut restored = GameRng::from_state(&state);
        assert_eq!(shuffled(&mut restored), expected);
        assert_eq!(restored.state().fork_counter, 1);
    }

    #[test]
    fn test_state_serde() {
        let state = GameRngState {
            seed: 42,
            word_pos: 12345,
            fork_counter: 5,
        };
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: GameRngState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
