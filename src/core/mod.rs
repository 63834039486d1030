//! Core engine types: tiles, participants, RNG, configuration, errors, commands.
//!
//! These are shared by every other module and carry no rule logic beyond
//! what a single value can answer about itself.

pub mod action;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod tile;

pub use action::{Command, MoveRecord};
pub use config::{MatchConfig, RuleConfig, Variant};
pub use error::{EngineError, MatchId};
pub use player::{Color, Participant, ParticipantId, Seat, SeatMap, Team};
pub use rng::{GameRng, GameRngState};
pub use tile::{Tile, MAX_PIP};
