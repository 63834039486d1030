//! Round lifecycle.
//!
//! A round moves through `Active → Resolving → Resolved`. Dealing is not a
//! status: [`Round::deal`] shuffles, deals and picks the starter in one
//! call and hands back a round that is already active.
//!
//! - **Active**: [`Round::play`], [`Round::play_combo`] and
//!   [`Round::draw_or_pass`] are accepted from the seat to move
//! - **Resolving**: a hand emptied or play is blocked; [`Round::end`] says
//!   which, and scoring takes over
//! - **Resolved**: scored, or voided by the team opening rule
//!
//! ## Termination
//!
//! After every play and every draw or pass the controller checks, in order:
//! the mover's hand is empty (domino), then no seat holds a playable tile
//! and the drawable boneyard prefix holds none either (block).

mod controller;

pub use controller::Round;

use serde::{Deserialize, Serialize};

use crate::core::{Seat, Tile};

/// Round lifecycle status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    Active,
    Resolving,
    Resolved,
}

/// How a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundEnd {
    /// `winner` played their last tile.
    Domino { winner: Seat },
    /// Nobody can move. `blocker` is the seat whose play caused it, or
    /// `None` when a draw or pass exhausted the options.
    Blocked { blocker: Option<Seat> },
}

/// Who opens a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StarterRule {
    /// Holder of the board's highest-priority opening tile, which must be
    /// played first.
    Opening,
    /// A fixed seat, any tile.
    Seat(Seat),
}

/// Result of placing a tile or a combo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayOutcome {
    /// Points earned by the placement itself.
    pub award: u32,
    /// Set when the play ended the round.
    pub end: Option<RoundEnd>,
    /// The opening left a team with no play and the round is void.
    pub voided: bool,
}

/// Result of a draw-or-pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawOutcome {
    /// Tiles added to the mover's hand.
    pub drawn: Vec<Tile>,
    /// Nothing was drawable and the turn moved on.
    pub passed: bool,
    /// Set when the round ended.
    pub end: Option<RoundEnd>,
}
