//! Engine error taxonomy.
//!
//! Every command reports failures synchronously; nothing is retried
//! internally. `reason()` gives a stable machine-readable string for the
//! transport layer.

use serde::{Deserialize, Serialize};

use super::player::ParticipantId;

/// Identifier of a match inside a registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchId(pub u64);

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Match {}", self.0)
    }
}

/// Errors returned by engine commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// Unknown match.
    MatchNotFound(MatchId),
    /// Unknown participant.
    ParticipantNotFound(ParticipantId),
    /// Command not legal in the current round or match phase.
    InvalidState(String),
    /// Tile not held, wrong turn, or rejected by the board.
    IllegalMove(String),
    /// The match has no free seat.
    CapacityExceeded,
    /// The actor is not a participant of this match.
    Forbidden(ParticipantId),
    /// Rejected match configuration.
    InvalidConfig(String),
    /// Tile conservation broke. Fatal for the match.
    InvariantViolation(String),
}

impl EngineError {
    /// Stable reason string.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MatchNotFound(_) | Self::ParticipantNotFound(_) => "not_found",
            Self::InvalidState(_) => "invalid_state",
            Self::IllegalMove(_) => "illegal_move",
            Self::CapacityExceeded => "capacity_exceeded",
            Self::Forbidden(_) => "forbidden",
            Self::InvalidConfig(_) => "invalid_config",
            Self::InvariantViolation(_) => "invariant_violation",
        }
    }

    pub(crate) fn illegal(msg: impl Into<String>) -> Self {
        Self::IllegalMove(msg.into())
    }

    pub(crate) fn state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MatchNotFound(id) => write!(f, "{id} not found"),
            Self::ParticipantNotFound(id) => write!(f, "{id} not found"),
            Self::InvalidState(msg) => write!(f, "invalid state: {msg}"),
            Self::IllegalMove(msg) => write!(f, "illegal move: {msg}"),
            Self::CapacityExceeded => write!(f, "match is full"),
            Self::Forbidden(id) => write!(f, "{id} is not in this match"),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::InvariantViolation(msg) => write!(f, "invariant violated: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
