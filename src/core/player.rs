//! Participants, seats and per-seat storage.
//!
//! ## Seat
//!
//! A participant's `position` at the table. Seats drive turn order, team
//! membership (`position mod 2` in team games) and the cosmetic colour.
//!
//! ## SeatMap
//!
//! Per-seat data backed by a `Vec`, indexed by `Seat`.
//!
//! ## Participant
//!
//! Stable identity plus the running score counters kept across rounds.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Stable external identity of a participant (assigned by the session layer).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(pub u64);

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Participant {}", self.0)
    }
}

/// Table position, 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Seat(pub u8);

impl Seat {
    /// Create a seat.
    #[must_use]
    pub const fn new(position: u8) -> Self {
        Self(position)
    }

    /// Raw index into per-seat storage.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat that plays after this one.
    #[must_use]
    pub const fn next(self, seat_count: usize) -> Self {
        Self(((self.0 as usize + 1) % seat_count) as u8)
    }

    /// Team derived from the position (only meaningful in team games).
    #[must_use]
    pub const fn team(self) -> Team {
        Team(self.0 % 2)
    }

    /// Deterministic colour for this position.
    #[must_use]
    pub const fn color(self) -> Color {
        match self.0 % 4 {
            0 => Color::Red,
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        }
    }

    /// Iterate over all seats for a table of `seat_count`.
    pub fn all(seat_count: usize) -> impl Iterator<Item = Seat> {
        (0..seat_count as u8).map(Seat)
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Team index (0 or 1) in four-player team games.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team(pub u8);

impl Team {
    /// The opposing team.
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }
}

/// Cosmetic participant colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
}

/// Per-seat data storage with O(1) access.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatMap<T> {
    data: Vec<T>,
}

impl<T> SeatMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(seat_count: usize, factory: impl FnMut(Seat) -> T) -> Self {
        assert!(seat_count > 0, "Must have at least 1 seat");
        Self {
            data: Seat::all(seat_count).map(factory).collect(),
        }
    }

    /// Create a map with default values.
    pub fn with_default(seat_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(seat_count, |_| T::default())
    }

    /// Wrap an existing per-seat vector.
    #[must_use]
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Number of seats.
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.data.len()
    }

    /// Iterate over (Seat, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (Seat(i as u8), v))
    }

    /// Iterate over values in seat order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T> Index<Seat> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &Self::Output {
        &self.data[seat.index()]
    }
}

impl<T> IndexMut<Seat> for SeatMap<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut Self::Output {
        &mut self.data[seat.index()]
    }
}

/// A seated participant and their running counters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Stable identity.
    pub id: ParticipantId,
    /// Turn order position.
    pub seat: Seat,
    /// Cosmetic colour, derived from the seat.
    pub color: Color,
    /// Team, set only in team games.
    pub team: Option<Team>,
    /// Running match score. In team games both members mirror the team total.
    pub total_score: u32,
    /// Points earned during the current round.
    pub round_score: u32,
    /// Consecutive round wins by a margin under the anti-stalling threshold.
    pub consecutive_low_wins: u32,
    /// Lobby start vote.
    pub has_voted_to_start: bool,
}

impl Participant {
    /// Seat a new participant.
    #[must_use]
    pub fn new(id: ParticipantId, seat: Seat, team_mode: bool) -> Self {
        Self {
            id,
            seat,
            color: seat.color(),
            team: team_mode.then(|| seat.team()),
            total_score: 0,
            round_score: 0,
            consecutive_low_wins: 0,
            has_voted_to_start: false,
        }
    }
}
