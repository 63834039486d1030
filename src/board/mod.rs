//! Board engines.
//!
//! The two variants use structurally different boards:
//!
//! - [`LinearBoard`]: a two-ended line (block-scoring variant)
//! - [`BranchingBoard`]: a line whose closed doubles open extra spurs
//!   (telephone variant)
//!
//! Both implement [`BoardEngine`], the small capability interface the round
//! controller is generic over. [`Board`] is the tagged union a match selects
//! once at creation.
//!
//! ## Empty boards
//!
//! Any tile may open an empty board; `Left` and `Right` are both accepted
//! for the opening placement. Whether a *specific* opening tile is required
//! is a round-level rule, answered by [`BoardEngine::required_first_tile`].

mod branching;
mod linear;

pub use branching::{BranchingBoard, Junction, Node, Spur};
pub use linear::{LinearBoard, PlacedTile};

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::core::{EngineError, Seat, SeatMap, Tile, Variant};

/// An open end a tile can be placed against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
    /// First spur of the active junction (telephone only).
    Top,
    /// Second spur of the active junction (telephone only).
    Bottom,
}

impl Side {
    /// Every side, in listing order.
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Top, Side::Bottom];
}

/// Two doubles placed in one turn, with the board total they produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboPlay {
    pub first: (Tile, Side),
    pub second: (Tile, Side),
    pub total: u32,
}

impl ComboPlay {
    /// Points paid for the combo.
    #[must_use]
    pub fn payout(&self) -> u32 {
        self.total / 5
    }
}

/// Capability interface over a board topology.
pub trait BoardEngine {
    /// Number of tiles on the board.
    fn tile_count(&self) -> usize;

    /// Every tile on the board, in placement order.
    fn tiles(&self) -> Vec<Tile>;

    /// Currently open ends and the value each one needs.
    fn open_ends(&self) -> SmallVec<[(Side, u8); 4]>;

    /// Whether `tile` may be placed on `side`.
    fn is_legal(&self, tile: Tile, side: Side) -> bool;

    /// Place `tile` on `side`.
    fn apply(&mut self, tile: Tile, side: Side) -> Result<(), EngineError>;

    /// Current board total, recomputed from the open ends.
    fn board_points(&self) -> u32;

    /// Opening tiles in priority order for a match's first round.
    fn opening_priority(&self) -> &'static [Tile];

    // === Provided ===

    /// Whether nothing has been played yet.
    fn is_empty(&self) -> bool {
        self.tile_count() == 0
    }

    /// Sides `tile` can be placed on. An empty board lists `Left` only.
    fn legal_sides(&self, tile: Tile) -> SmallVec<[Side; 4]> {
        if self.is_empty() {
            return smallvec![Side::Left];
        }
        Side::ALL
            .iter()
            .copied()
            .filter(|&side| self.is_legal(tile, side))
            .collect()
    }

    /// A scoring two-double play of `a` and `b`, if the board supports
    /// combos and one exists.
    fn find_combo(&self, _a: Tile, _b: Tile) -> Option<ComboPlay> {
        None
    }

    /// Every scoring combo among the doubles in `hand`.
    fn combos_for_hand(&self, hand: &[Tile]) -> Vec<ComboPlay> {
        let doubles: SmallVec<[Tile; 7]> = hand.iter().copied().filter(|t| t.is_double()).collect();
        let mut combos = Vec::new();
        for (i, &a) in doubles.iter().enumerate() {
            for &b in &doubles[i + 1..] {
                combos.extend(self.find_combo(a, b));
            }
        }
        combos
    }

    /// Whether `tile` fits anywhere.
    fn can_play(&self, tile: Tile) -> bool {
        !self.legal_sides(tile).is_empty()
    }

    /// Points the mover earns for the placement that produced this board.
    ///
    /// Only totals divisible by five score.
    fn placement_award(&self) -> u32 {
        let total = self.board_points();
        if total > 0 && total % 5 == 0 {
            total
        } else {
            0
        }
    }

    /// The first tile in [`opening_priority`](Self::opening_priority) that was
    /// dealt to someone, and its holder. `None` when every candidate is in
    /// the boneyard.
    fn required_first_tile(&self, hands: &SeatMap<Vec<Tile>>) -> Option<(Tile, Seat)> {
        self.opening_priority().iter().find_map(|&tile| {
            hands
                .iter()
                .find(|(_, hand)| hand.contains(&tile))
                .map(|(seat, _)| (tile, seat))
        })
    }
}

/// Doubles 1|1 through 6|6, the block-scoring opening order.
pub(crate) const DOUBLES_OPENING: [Tile; 6] = [
    Tile::double(1),
    Tile::double(2),
    Tile::double(3),
    Tile::double(4),
    Tile::double(5),
    Tile::double(6),
];

/// 2|3 first, then doubles 1|1 through 6|6.
pub(crate) const TELEPHONE_OPENING: [Tile; 7] = [
    Tile::new(2, 3),
    Tile::double(1),
    Tile::double(2),
    Tile::double(3),
    Tile::double(4),
    Tile::double(5),
    Tile::double(6),
];

/// The board of a match, selected by variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Board {
    Linear(LinearBoard),
    Branching(BranchingBoard),
}

impl Board {
    /// An empty board for `variant`.
    #[must_use]
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::BlockScoring => Board::Linear(LinearBoard::new()),
            Variant::Telephone => Board::Branching(BranchingBoard::new()),
        }
    }


    fn engine(&self) -> &dyn BoardEngine {
        match self {
            Board::Linear(b) => b,
            Board::Branching(b) => b,
        }
    }

    fn engine_mut(&mut self) -> &mut dyn BoardEngine {
        match self {
            Board::Linear(b) => b,
            Board::Branching(b) => b,
        }
    }
}

impl BoardEngine for Board {
    fn tile_count(&self) -> usize {
        self.engine().tile_count()
    }

    fn tiles(&self) -> Vec<Tile> {
        self.engine().tiles()
    }

    fn open_ends(&self) -> SmallVec<[(Side, u8); 4]> {
        self.engine().open_ends()
    }

    fn is_legal(&self, tile: Tile, side: Side) -> bool {
        self.engine().is_legal(tile, side)
    }

    fn apply(&mut self, tile: Tile, side: Side) -> Result<(), EngineError> {
        self.engine_mut().apply(tile, side)
    }

    fn board_points(&self) -> u32 {
        self.engine().board_points()
    }

    fn opening_priority(&self) -> &'static [Tile] {
        self.engine().opening_priority()
    }

    fn placement_award(&self) -> u32 {
        self.engine().placement_award()
    }

    fn find_combo(&self, a: Tile, b: Tile) -> Option<ComboPlay> {
        self.engine().find_combo(a, b)
    }
}
