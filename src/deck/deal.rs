//! Dealing hands and the boneyard.
//!
//! A deal shuffles the full set, hands out `tiles_per_player` tiles to each
//! seat in position order and leaves the remainder in the boneyard. Deals
//! that fail an acceptance check are redone with a fresh shuffle, up to a
//! fixed number of attempts; after the cap the last deal is accepted as is.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::set::{full_set, should_reshuffle_hand, shuffle};
use crate::core::{GameRng, SeatMap, Tile};

/// Boneyard tiles that can never be drawn, by table size.
#[must_use]
pub const fn untouchable_count(seat_count: usize) -> usize {
    match seat_count {
        2 => 2,
        3 => 1,
        _ => 0,
    }
}

/// Tiles taken per draw, by table size. Four-player tables never draw.
#[must_use]
pub const fn draw_count(seat_count: usize) -> usize {
    match seat_count {
        2 => 2,
        3 => 1,
        _ => 0,
    }
}

/// Undealt tiles. The trailing `untouchable` tiles are never drawable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boneyard {
    tiles: Vec<Tile>,
    untouchable: usize,
}

impl Boneyard {
    /// Create a boneyard for a table of `seat_count`.
    #[must_use]
    pub fn new(tiles: Vec<Tile>, seat_count: usize) -> Self {
        Self {
            tiles,
            untouchable: untouchable_count(seat_count),
        }
    }

    /// Create a boneyard whose last `untouchable` tiles are never drawn.
    #[must_use]
    pub fn with_untouchable(tiles: Vec<Tile>, untouchable: usize) -> Self {
        Self { tiles, untouchable }
    }

    /// All remaining tiles, drawable prefix first.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Remaining tile count, untouchable tail included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no tiles remain at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// The prefix that may still be drawn.
    #[must_use]
    pub fn drawable(&self) -> &[Tile] {
        let end = self.tiles.len().saturating_sub(self.untouchable);
        &self.tiles[..end]
    }

    /// The tail that is never drawn or revealed during play.
    #[must_use]
    pub fn untouchable(&self) -> &[Tile] {
        let start = self.tiles.len().saturating_sub(self.untouchable);
        &self.tiles[start..]
    }

    /// Take up to `count` tiles from the front of the drawable prefix.
    pub fn draw(&mut self, count: usize) -> Vec<Tile> {
        let n = count.min(self.drawable().len());
        self.tiles.drain(..n).collect()
    }
}

/// The result of dealing a round.
#[derive(Clone, Debug)]
pub struct Deal {
    /// Hands by seat.
    pub hands: SeatMap<Vec<Tile>>,
    /// Remainder of the shuffled set.
    pub boneyard: Boneyard,
    /// Deals performed, including the accepted one.
    pub attempts: u32,
    /// Whether the accepted deal passed the acceptance check.
    pub accepted: bool,
}

impl Deal {
    /// Whether any hand trips the fairness heuristic.
    #[must_use]
    pub fn has_unfair_hand(&self) -> bool {
        self.hands.values().any(|hand| should_reshuffle_hand(hand))
    }
}

/// Shuffle and deal once.
#[must_use]
pub fn deal_once(seat_count: usize, tiles_per_player: usize, rng: &mut GameRng) -> Deal {
    let mut tiles = full_set();
    shuffle(&mut tiles, rng);

    let boneyard_tiles = tiles.split_off((seat_count * tiles_per_player).min(tiles.len()));
    let mut chunks = tiles.chunks(tiles_per_player);
    let hands = SeatMap::new(seat_count, |_| chunks.next().map(<[Tile]>::to_vec).unwrap_or_default());

    Deal {
        hands,
        boneyard: Boneyard::new(boneyard_tiles, seat_count),
        attempts: 1,
        accepted: true,
    }
}

/// Deal until `accept` passes or `max_attempts` deals have been made.
///
/// Exhausting the cap is not an error: the last deal is returned with
/// `accepted == false`.
pub fn deal_with(
    seat_count: usize,
    tiles_per_player: usize,
    max_attempts: u32,
    rng: &mut GameRng,
    accept: impl Fn(&Deal) -> bool,
) -> Deal {
    let mut attempt = 1;
    loop {
        let mut deal = deal_once(seat_count, tiles_per_player, rng);
        deal.attempts = attempt;
        if accept(&deal) {
            debug!("deal accepted after {attempt} attempt(s)");
            return deal;
        }
        if attempt >= max_attempts {
            warn!("deal cap of {max_attempts} reached; accepting last deal");
            deal.accepted = false;
            return deal;
        }
        attempt += 1;
    }
}

/// Deal until no hand trips the fairness heuristic.
pub fn deal_fair(seat_count: usize, tiles_per_player: usize, max_attempts: u32, rng: &mut GameRng) -> Deal {
    deal_with(seat_count, tiles_per_player, max_attempts, rng, |d| !d.has_unfair_hand())
}
