//! Turn commands and the move log.
//!
//! A `Command` is what a participant asks the engine to do on their turn.
//! Every accepted command is appended to the match's move log as a
//! `MoveRecord`; replaying the log against a match created with the same
//! seed reproduces the same final state.

use serde::{Deserialize, Serialize};

use super::player::ParticipantId;
use super::tile::Tile;
use crate::board::Side;

/// An in-round command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Place one tile on an open end.
    Play { tile: Tile, side: Side },
    /// Place two doubles in one turn (telephone variant).
    PlayCombo { first: Tile, second: Tile },
    /// Draw from the boneyard, or pass when nothing can be drawn.
    DrawOrPass,
}

/// A recorded command with ordering metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Who issued the command.
    pub participant: ParticipantId,

    /// The command.
    pub command: Command,

    /// Round number the command was applied in.
    pub round: u32,

    /// Sequence number within the match.
    pub sequence: u32,
}

impl MoveRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(participant: ParticipantId, command: Command, round: u32, sequence: u32) -> Self {
        Self {
            participant,
            command,
            round,
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_equality() {
        let a = Command::Play { tile: Tile::new(1, 2), side: Side::Left };
        let b = Command::Play { tile: Tile::new(2, 1), side: Side::Left };
        let c = Command::Play { tile: Tile::new(1, 2), side: Side::Right };

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, Command::DrawOrPass);
    }

    #[test]
    fn test_record_serialization() {
        let record = MoveRecord::new(
            ParticipantId(3),
            Command::PlayCombo { first: Tile::double(5), second: Tile::double(0) },
            2,
            17,
        );

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"play_combo\""));
        let deserialized: MoveRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, deserialized);
    }
}
