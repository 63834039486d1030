//! Two-ended line board for the block-scoring variant.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{BoardEngine, Side, DOUBLES_OPENING};
use crate::core::{EngineError, Tile};

/// A tile as laid on the line, oriented left-to-right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedTile {
    pub tile: Tile,
    pub left: u8,
    pub right: u8,
}

/// Sequential board with a left and a right open end.
///
/// Both ends are `None` until the first tile is placed. A placed tile is
/// flipped so its matching pip touches the end it extends; its other pip
/// becomes the new open end.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearBoard {
    line: Vector<PlacedTile>,
    left_end: Option<u8>,
    right_end: Option<u8>,
}

impl LinearBoard {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The line from left to right.
    #[must_use]
    pub fn line(&self) -> &Vector<PlacedTile> {
        &self.line
    }

    /// Open value on the left.
    #[must_use]
    pub fn left_end(&self) -> Option<u8> {
        self.left_end
    }

    /// Open value on the right.
    #[must_use]
    pub fn right_end(&self) -> Option<u8> {
        self.right_end
    }

    fn end_tile(&self, side: Side) -> Option<&PlacedTile> {
        match side {
            Side::Left => self.line.front(),
            Side::Right => self.line.back(),
            Side::Top | Side::Bottom => None,
        }
    }
}

impl BoardEngine for LinearBoard {
    fn tile_count(&self) -> usize {
        self.line.len()
    }

    fn tiles(&self) -> Vec<Tile> {
        self.line.iter().map(|p| p.tile).collect()
    }

    fn open_ends(&self) -> SmallVec<[(Side, u8); 4]> {
        let mut ends = SmallVec::new();
        if let Some(v) = self.left_end {
            ends.push((Side::Left, v));
        }
        if let Some(v) = self.right_end {
            ends.push((Side::Right, v));
        }
        ends
    }

    fn is_legal(&self, tile: Tile, side: Side) -> bool {
        match side {
            Side::Left if self.line.is_empty() => true,
            Side::Right if self.line.is_empty() => true,
            Side::Left => self.left_end.is_some_and(|v| tile.has(v)),
            Side::Right => self.right_end.is_some_and(|v| tile.has(v)),
            Side::Top | Side::Bottom => false,
        }
    }

    fn apply(&mut self, tile: Tile, side: Side) -> Result<(), EngineError> {
        if !self.is_legal(tile, side) {
            return Err(EngineError::illegal(format!("{tile} does not fit the {side:?} end")));
        }

        if self.line.is_empty() {
            self.line.push_back(PlacedTile { tile, left: tile.low(), right: tile.high() });
            self.left_end = Some(tile.low());
            self.right_end = Some(tile.high());
            return Ok(());
        }

        match side {
            Side::Left => {
                let end = self.left_end.unwrap_or_default();
                let outer = tile.other(end).unwrap_or(end);
                self.line.push_front(PlacedTile { tile, left: outer, right: end });
                self.left_end = Some(outer);
            }
            Side::Right => {
                let end = self.right_end.unwrap_or_default();
                let outer = tile.other(end).unwrap_or(end);
                self.line.push_back(PlacedTile { tile, left: end, right: outer });
                self.right_end = Some(outer);
            }
            Side::Top | Side::Bottom => return Err(EngineError::illegal("the line has no spurs")),
        }
        Ok(())
    }

    /// Open-end total, with a double at an end counted twice. Shown to
    /// clients only; the line never scores during play.
    fn board_points(&self) -> u32 {
        if self.line.len() == 1 {
            return self.line.front().map_or(0, |p| p.tile.pips());
        }
        [Side::Left, Side::Right]
            .iter()
            .filter_map(|&side| self.end_tile(side).map(|p| (side, p)))
            .map(|(side, p)| {
                let value = u32::from(if side == Side::Left { p.left } else { p.right });
                if p.tile.is_double() { value * 2 } else { value }
            })
            .sum()
    }

    fn opening_priority(&self) -> &'static [Tile] {
        &DOUBLES_OPENING
    }

    fn placement_award(&self) -> u32 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(plays: &[(Tile, Side)]) -> LinearBoard {
        let mut board = LinearBoard::new();
        for &(tile, side) in plays {
            board.apply(tile, side).unwrap();
        }
        board
    }

    #[test]
    fn test_first_tile_sets_both_ends() {
        let board = board_with(&[(Tile::double(4), Side::Left)]);
        assert_eq!(board.left_end(), Some(4));
        assert_eq!(board.right_end(), Some(4));
        assert_eq!(board.tile_count(), 1);
    }

    #[test]
    fn test_orientation_flips_to_match() {
        let board = board_with(&[
            (Tile::double(4), Side::Left),
            (Tile::new(4, 1), Side::Left),
            (Tile::new(6, 4), Side::Right),
        ]);

        assert_eq!(board.left_end(), Some(1));
        assert_eq!(board.right_end(), Some(6));

        let line: Vec<_> = board.line().iter().map(|p| (p.left, p.right)).collect();
        assert_eq!(line, vec![(1, 4), (4, 4), (4, 6)]);
    }

    #[test]
    fn test_rejects_non_matching() {
        let mut board = board_with(&[(Tile::new(2, 5), Side::Left)]);
        assert!(!board.is_legal(Tile::new(1, 3), Side::Left));
        assert!(board.apply(Tile::new(1, 3), Side::Right).is_err());
        assert!(!board.is_legal(Tile::new(2, 2), Side::Right));
        assert!(board.is_legal(Tile::new(2, 2), Side::Left));
        assert!(!board.is_legal(Tile::new(5, 5), Side::Top));
        assert_eq!(board.tile_count(), 1);
    }

    #[test]
    fn test_legal_sides_both_ends() {
        let board = board_with(&[(Tile::new(3, 6), Side::Left)]);
        assert_eq!(board.legal_sides(Tile::new(3, 6)).as_slice(), &[Side::Left, Side::Right]);
        assert_eq!(board.legal_sides(Tile::new(0, 6)).as_slice(), &[Side::Right]);
        assert!(!board.can_play(Tile::new(0, 1)));
    }

    #[test]
    fn test_board_points_never_award() {
        let board = board_with(&[(Tile::new(2, 3), Side::Left), (Tile::new(3, 3), Side::Right)]);
        assert_eq!(board.board_points(), 2 + 6);
        assert_eq!(board.placement_award(), 0);
    }

    #[test]
    fn test_open_ends_and_tiles() {
        let board = board_with(&[(Tile::new(0, 5), Side::Right), (Tile::new(5, 5), Side::Right)]);
        assert_eq!(board.open_ends().as_slice(), &[(Side::Left, 0), (Side::Right, 5)]);
        assert_eq!(board.tiles(), vec![Tile::new(0, 5), Tile::double(5)]);
    }
}
