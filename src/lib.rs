//! # domino-engine
//!
//! The authoritative round engine for multiplayer domino matches.
//!
//! ## Variants
//!
//! 1. **Block scoring**: a two-ended line. Rounds are won by going out or by
//!    holding the lightest hand when play blocks. First to 101.
//!
//! 2. **Telephone**: closed doubles become junctions with their own spurs,
//!    and every placement that leaves a board total divisible by five
//!    scores it. First to 365.
//!
//! ## Design Principles
//!
//! 1. **One actor per match**: a [`Match`] is a plain state machine driven
//!    through `&mut self`; commands for one match are applied in arrival
//!    order, and matches share no mutable state.
//!
//! 2. **Replayable rounds**: each round deals from its own fork of the
//!    match's ChaCha stream, so a seed plus the move log reproduces a match
//!    exactly.
//!
//! 3. **Boards behind a trait**: the round controller is generic over
//!    [`BoardEngine`]; the two topologies never share an inheritance tree.
//!
//! ## Modules
//!
//! - `core`: tiles, participants, RNG, configuration, errors, commands
//! - `deck`: the double-six set, hand scoring, dealing, boneyard
//! - `board`: linear and branching board engines
//! - `round`: round lifecycle controller
//! - `scoring`: round resolution, deferred points, anti-stalling
//! - `game`: matches, the registry, events, snapshots, views
//!
//! ## Logging
//!
//! The engine logs through the `log` facade and never installs a logger.

pub mod board;
pub mod core;
pub mod deck;
pub mod game;
pub mod round;
pub mod scoring;

// Re-export commonly used types
pub use crate::core::{
    Color, Command, EngineError, GameRng, GameRngState, MatchConfig, MatchId, MoveRecord, Participant,
    ParticipantId, RuleConfig, Seat, SeatMap, Team, Tile, Variant,
};

pub use crate::deck::{full_set, hand_score, should_reshuffle_hand, Boneyard};

pub use crate::board::{Board, BoardEngine, BranchingBoard, ComboPlay, LinearBoard, Side};

pub use crate::round::{DrawOutcome, PlayOutcome, Round, RoundEnd, RoundStatus, StarterRule};

pub use crate::scoring::{RoundResult, WinReason};

pub use crate::game::{
    Audience, CommandOutcome, EventEnvelope, LegalMoves, Match, MatchEvent, MatchListener, MatchOutcome,
    MatchRegistry, MatchSnapshot, MatchStatus, MatchView,
};
