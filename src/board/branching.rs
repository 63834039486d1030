//! Branching "telephone" board.
//!
//! The first tile is the root of a line that grows `Left` and `Right` as in
//! the linear board. A double in the line *closes* once both of its line
//! sides have a neighbour; a closed double becomes a junction with two
//! extra spurs, `Top` and `Bottom`, each opening on the double's value.
//!
//! ## Junction rules
//!
//! - Exactly one junction is active at a time. Doubles that close while the
//!   active junction still has an unstarted spur wait in a FIFO queue.
//! - The active junction is *saturated* once both spurs are started. A
//!   waiting double then takes over as the active junction, and the old
//!   spurs stop being open ends. Without a waiting double the saturated
//!   junction keeps its spurs open.
//! - The first tile on a spur must not be a double.
//!
//! ## Storage
//!
//! Tiles live in an arena indexed by placement order. Line tips, spur tips
//! and junctions refer to arena slots by index.
//!
//! ## Board points
//!
//! Sum of the open ends, with an end whose terminal tile is a double
//! counted twice. An unstarted spur counts the junction value once. A lone
//! root tile counts its pips.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{BoardEngine, ComboPlay, Side, TELEPHONE_OPENING};
use crate::core::{EngineError, Tile};

/// Conventional opening tile that never scores on placement.
const OPENING_TILE: Tile = Tile::new(2, 3);

/// A placed tile in the arena.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// The tile.
    pub tile: Tile,
    /// Line neighbours so far (doubles close at two).
    neighbours: u8,
    /// Whether this double has closed.
    pub closed: bool,
}

/// One open end of the line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Arm {
    value: u8,
    tip: usize,
}

/// One spur of a junction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spur {
    /// Value the next tile must match.
    pub value: u8,
    /// Arena index of the last spur tile; `None` until started.
    pub tip: Option<usize>,
}

impl Spur {
    fn new(value: u8) -> Self {
        Self { value, tip: None }
    }

    /// Whether a tile has been placed on this spur.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.tip.is_some()
    }
}

/// A closed double acting as a branch point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Junction {
    /// Arena index of the double.
    pub node: usize,
    /// The double's value.
    pub value: u8,
    pub top: Spur,
    pub bottom: Spur,
}

impl Junction {
    fn new(node: usize, value: u8) -> Self {
        Self {
            node,
            value,
            top: Spur::new(value),
            bottom: Spur::new(value),
        }
    }

    /// Both spurs started.
    #[must_use]
    pub fn is_saturated(&self) -> bool {
        self.top.is_started() && self.bottom.is_started()
    }

    fn spur(&self, side: Side) -> Option<&Spur> {
        match side {
            Side::Top => Some(&self.top),
            Side::Bottom => Some(&self.bottom),
            Side::Left | Side::Right => None,
        }
    }

    fn spur_mut(&mut self, side: Side) -> Option<&mut Spur> {
        match side {
            Side::Top => Some(&mut self.top),
            Side::Bottom => Some(&mut self.bottom),
            Side::Left | Side::Right => None,
        }
    }
}

/// Tree-shaped board for the telephone variant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchingBoard {
    nodes: Vec<Node>,
    left: Option<Arm>,
    right: Option<Arm>,
    active: Option<Junction>,
    waiting: VecDeque<usize>,
    retired: Vec<Junction>,
}

impl BranchingBoard {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arena of placed tiles.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Open value on the left of the line.
    #[must_use]
    pub fn left_end(&self) -> Option<u8> {
        self.left.map(|a| a.value)
    }

    /// Open value on the right of the line.
    #[must_use]
    pub fn right_end(&self) -> Option<u8> {
        self.right.map(|a| a.value)
    }

    /// The junction whose spurs are open.
    #[must_use]
    pub fn active_junction(&self) -> Option<&Junction> {
        self.active.as_ref()
    }

    /// Closed doubles waiting to become the active junction.
    pub fn waiting_junctions(&self) -> impl Iterator<Item = usize> + '_ {
        self.waiting.iter().copied()
    }

    /// Junctions whose spurs were closed off by a successor.
    #[must_use]
    pub fn retired_junctions(&self) -> &[Junction] {
        &self.retired
    }

    /// Append a node; every tile but the first is attached to one neighbour.
    fn push_node(&mut self, tile: Tile, attached: bool) -> usize {
        self.nodes.push(Node { tile, neighbours: u8::from(attached), closed: false });
        self.nodes.len() - 1
    }

    /// Record a new line neighbour on `index`, closing it if it is a double.
    fn touch(&mut self, index: usize) {
        let node = &mut self.nodes[index];
        node.neighbours += 1;
        if node.tile.is_double() && !node.closed && node.neighbours >= 2 {
            node.closed = true;
            let value = node.tile.low();
            self.on_closed(index, value);
        }
    }

    fn on_closed(&mut self, index: usize, value: u8) {
        let busy = self.active.is_some_and(|j| !j.is_saturated());
        if busy {
            self.waiting.push_back(index);
        } else {
            self.activate(index, value);
        }
    }

    fn activate(&mut self, index: usize, value: u8) {
        if let Some(previous) = self.active.replace(Junction::new(index, value)) {
            self.retired.push(previous);
        }
    }

    fn promote_waiting(&mut self) {
        let saturated = self.active.is_some_and(|j| j.is_saturated());
        if saturated {
            if let Some(next) = self.waiting.pop_front() {
                let value = self.nodes[next].tile.low();
                self.activate(next, value);
            }
        }
    }

    /// Terminal value an end contributes.
    fn end_points(&self, tip: usize, value: u8) -> u32 {
        let value = u32::from(value);
        if self.nodes[tip].tile.is_double() {
            value * 2
        } else {
            value
        }
    }
}

impl BoardEngine for BranchingBoard {
    fn tile_count(&self) -> usize {
        self.nodes.len()
    }

    fn tiles(&self) -> Vec<Tile> {
        self.nodes.iter().map(|n| n.tile).collect()
    }

    fn open_ends(&self) -> SmallVec<[(Side, u8); 4]> {
        let mut ends = SmallVec::new();
        if let Some(arm) = self.left {
            ends.push((Side::Left, arm.value));
        }
        if let Some(arm) = self.right {
            ends.push((Side::Right, arm.value));
        }
        if let Some(j) = &self.active {
            ends.push((Side::Top, j.top.value));
            ends.push((Side::Bottom, j.bottom.value));
        }
        ends
    }

    fn is_legal(&self, tile: Tile, side: Side) -> bool {
        if self.nodes.is_empty() {
            return matches!(side, Side::Left | Side::Right);
        }
        match side {
            Side::Left => self.left.is_some_and(|a| tile.has(a.value)),
            Side::Right => self.right.is_some_and(|a| tile.has(a.value)),
            Side::Top | Side::Bottom => self
                .active
                .as_ref()
                .and_then(|j| j.spur(side))
                .is_some_and(|spur| tile.has(spur.value) && (spur.is_started() || !tile.is_double())),
        }
    }

    fn apply(&mut self, tile: Tile, side: Side) -> Result<(), EngineError> {
        if !self.is_legal(tile, side) {
            return Err(EngineError::illegal(format!("{tile} does not fit the {side:?} end")));
        }

        if self.nodes.is_empty() {
            let root = self.push_node(tile, false);
            self.left = Some(Arm { value: tile.low(), tip: root });
            self.right = Some(Arm { value: tile.high(), tip: root });
            return Ok(());
        }

        match side {
            Side::Left | Side::Right => {
                let arm = if side == Side::Left { self.left } else { self.right };
                let Some(arm) = arm else {
                    return Err(EngineError::illegal("line end is not open"));
                };
                let outer = tile.other(arm.value).unwrap_or(arm.value);
                let index = self.push_node(tile, true);
                let new_arm = Some(Arm { value: outer, tip: index });
                if side == Side::Left {
                    self.left = new_arm;
                } else {
                    self.right = new_arm;
                }
                self.touch(arm.tip);
            }
            Side::Top | Side::Bottom => {
                let Some(junction) = self.active else {
                    return Err(EngineError::illegal("no active junction"));
                };
                let Some(spur) = junction.spur(side).copied() else {
                    return Err(EngineError::illegal("not a spur"));
                };
                let outer = tile.other(spur.value).unwrap_or(spur.value);
                let index = self.push_node(tile, true);
                if let Some(active) = self.active.as_mut() {
                    if let Some(s) = active.spur_mut(side) {
                        s.value = outer;
                        s.tip = Some(index);
                    }
                }
                if let Some(tip) = spur.tip {
                    self.touch(tip);
                }
                self.promote_waiting();
            }
        }
        Ok(())
    }

    fn board_points(&self) -> u32 {
        match self.nodes.as_slice() {
            [] => return 0,
            [root] => return root.tile.pips(),
            _ => {}
        }

        let mut total: u32 = [self.left, self.right]
            .iter()
            .flatten()
            .map(|arm| self.end_points(arm.tip, arm.value))
            .sum();

        if let Some(j) = &self.active {
            for spur in [j.top, j.bottom] {
                total += match spur.tip {
                    Some(tip) => self.end_points(tip, spur.value),
                    None => u32::from(j.value),
                };
            }
        }
        total
    }

    fn opening_priority(&self) -> &'static [Tile] {
        &TELEPHONE_OPENING
    }

    /// Find a scoring placement of two held doubles, trying both orders and
    /// every legal end for each.
    fn find_combo(&self, a: Tile, b: Tile) -> Option<ComboPlay> {
        if a == b || !a.is_double() || !b.is_double() || self.nodes.is_empty() {
            return None;
        }

        for (first, second) in [(a, b), (b, a)] {
            for first_side in self.legal_sides(first) {
                let mut after_first = self.clone();
                if after_first.apply(first, first_side).is_err() {
                    continue;
                }
                for second_side in after_first.legal_sides(second) {
                    if second_side == first_side {
                        continue;
                    }
                    let mut after_both = after_first.clone();
                    if after_both.apply(second, second_side).is_err() {
                        continue;
                    }
                    let total = after_both.board_points();
                    if total > 0 && total % 5 == 0 {
                        return Some(ComboPlay {
                            first: (first, first_side),
                            second: (second, second_side),
                            total,
                        });
                    }
                }
            }
        }
        None
    }

    fn placement_award(&self) -> u32 {
        if let [root] = self.nodes.as_slice() {
            if root.tile == OPENING_TILE {
                return 0;
            }
        }
        let total = self.board_points();
        if total > 0 && total % 5 == 0 {
            total
        } else {
            0
        }
    }
}
