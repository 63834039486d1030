//! Domino tiles.
//!
//! A `Tile` is an unordered pair of pip values in `0..=6`. Construction
//! normalizes the pair so that `Tile::new(2, 3) == Tile::new(3, 2)`; the
//! stored order carries no meaning. Orientation on the board is tracked
//! separately by the board engines.
//!
//! ```
//! use domino_engine::core::Tile;
//!
//! let t = Tile::new(5, 2);
//! assert_eq!(t, Tile::new(2, 5));
//! assert_eq!(t.low(), 2);
//! assert_eq!(t.high(), 5);
//! assert_eq!(t.other(5), Some(2));
//! assert!(!t.is_double());
//! ```

use serde::{Deserialize, Serialize};

/// Highest pip value in a double-six set.
pub const MAX_PIP: u8 = 6;

/// A domino tile with two pip values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tile {
    low: u8,
    high: u8,
}

impl Tile {
    /// Create a tile. Values are normalized so the smaller pip comes first.
    ///
    /// Panics if either value exceeds [`MAX_PIP`]; use [`Tile::try_new`] at
    /// input boundaries.
    #[must_use]
    pub const fn new(a: u8, b: u8) -> Self {
        assert!(a <= MAX_PIP && b <= MAX_PIP, "pip value out of range");
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// Create a tile from untrusted input.
    #[must_use]
    pub const fn try_new(a: u8, b: u8) -> Option<Self> {
        if a > MAX_PIP || b > MAX_PIP {
            None
        } else {
            Some(Self::new(a, b))
        }
    }

    /// Create the double with the given value.
    #[must_use]
    pub const fn double(value: u8) -> Self {
        Self::new(value, value)
    }

    /// The smaller pip value.
    #[must_use]
    pub const fn low(self) -> u8 {
        self.low
    }

    /// The larger pip value.
    #[must_use]
    pub const fn high(self) -> u8 {
        self.high
    }

    /// Whether both halves carry the same value.
    #[must_use]
    pub const fn is_double(self) -> bool {
        self.low == self.high
    }

    /// Sum of both pip values.
    #[must_use]
    pub const fn pips(self) -> u32 {
        self.low as u32 + self.high as u32
    }

    /// Whether either half shows `value`.
    #[must_use]
    pub const fn has(self, value: u8) -> bool {
        self.low == value || self.high == value
    }

    /// The value on the opposite half from `value`, if the tile carries it.
    #[must_use]
    pub const fn other(self, value: u8) -> Option<u8> {
        if self.low == value {
            Some(self.high)
        } else if self.high == value {
            Some(self.low)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.low, self.high)
    }
}
