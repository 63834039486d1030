//! Tile-set generation, shuffling and hand evaluation.

use crate::core::{GameRng, Tile, MAX_PIP};

/// Number of tiles in a double-six set.
pub const FULL_SET_SIZE: usize = 28;

/// Total pips in a double-six set.
pub const FULL_SET_PIPS: u32 = 168;

/// The canonical double-six set in deterministic order (0|0, 0|1, ... 6|6).
#[must_use]
pub fn full_set() -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(FULL_SET_SIZE);
    for low in 0..=MAX_PIP {
        for high in low..=MAX_PIP {
            tiles.push(Tile::new(low, high));
        }
    }
    tiles
}

/// Shuffle tiles with the round's random stream.
pub fn shuffle(tiles: &mut [Tile], rng: &mut GameRng) {
    rng.shuffle(tiles);
}

/// Score of a hand: the pip sum, except that a hand holding only 0|0
/// scores 10.
#[must_use]
pub fn hand_score(hand: &[Tile]) -> u32 {
    match hand {
        [only] if *only == Tile::double(0) => 10,
        _ => hand.iter().map(|t| t.pips()).sum(),
    }
}

/// Fairness heuristic for a freshly dealt hand.
///
/// Flags hands with five or more doubles, or with five or more tiles
/// sharing one value while the matching double is missing.
#[must_use]
pub fn should_reshuffle_hand(hand: &[Tile]) -> bool {
    let doubles = hand.iter().filter(|t| t.is_double()).count();
    if doubles >= 5 {
        return true;
    }

    (0..=MAX_PIP).any(|value| {
        let carrying = hand.iter().filter(|t| t.has(value)).count();
        carrying >= 5 && !hand.contains(&Tile::double(value))
    })
}
