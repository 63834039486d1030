//! Persistence snapshots and viewer-scoped views.
//!
//! A [`MatchSnapshot`] is everything needed to rebuild a match: the storage
//! collaborator persists one after every command and hands it back to
//! [`Match::from_snapshot`](super::Match::from_snapshot) on load. It encodes
//! to a compact binary form with `bincode`.
//!
//! A [`MatchView`] is what a client is allowed to see.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::match_state::{MatchOutcome, MatchStatus};
use crate::board::{Board, Side};
use crate::core::{
    Color, GameRngState, MatchConfig, MatchId, MoveRecord, Participant, ParticipantId, Seat, Team, Tile, Variant,
};
use crate::round::{Round, RoundStatus};
use crate::scoring::RoundResult;

/// Complete serialisable match state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub id: MatchId,
    pub config: MatchConfig,
    pub status: MatchStatus,
    pub participants: Vec<Participant>,
    pub rng: GameRngState,
    pub round: Option<Round<Board>>,
    pub round_number: u32,
    pub next_starter: Option<Seat>,
    pub void_redeals: u32,
    pub deferred_points: u32,
    pub history: Vector<RoundResult>,
    pub moves: Vector<MoveRecord>,
    pub outcome: Option<MatchOutcome>,
}

impl MatchSnapshot {
    /// Encode with bincode.
    pub fn to_bytes(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }

    /// Decode from [`to_bytes`](Self::to_bytes) output.
    pub fn from_bytes(bytes: &[u8]) -> bincode::Result<Self> {
        bincode::deserialize(bytes)
    }
}

/// A hand as seen by one viewer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandView {
    Revealed(Vec<Tile>),
    Hidden { count: usize },
}

impl HandView {
    /// Number of tiles, revealed or not.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            HandView::Revealed(tiles) => tiles.len(),
            HandView::Hidden { count } => *count,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A participant as seen by one viewer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantView {
    pub id: ParticipantId,
    pub seat: Seat,
    pub color: Color,
    pub team: Option<Team>,
    pub total_score: u32,
    pub round_score: u32,
    pub has_voted_to_start: bool,
    pub hand: HandView,
}

/// Match state scoped to one viewer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchView {
    pub id: MatchId,
    pub variant: Variant,
    pub status: MatchStatus,
    pub round_number: u32,
    pub round_status: Option<RoundStatus>,
    pub participants: Vec<ParticipantView>,
    pub board: Option<Board>,
    pub board_points: u32,
    pub open_ends: Vec<(Side, u8)>,
    /// Participant to move, while a round is being played.
    pub turn: Option<ParticipantId>,
    pub required_tile: Option<Tile>,
    pub boneyard_count: usize,
    pub drawable_count: usize,
    pub deferred_points: u32,
    pub history: Vec<RoundResult>,
    pub outcome: Option<MatchOutcome>,
}
