//! Events emitted by match commands.
//!
//! Every successful command yields one or more [`EventEnvelope`]s. The
//! transport collaborator fans `Everyone` events out to all subscribers of
//! the match and delivers `Participant` events privately (dealt hands and
//! drawn tiles).

use serde::{Deserialize, Serialize};

use crate::board::Side;
use crate::core::{Color, ParticipantId, Seat, Team, Tile};
use crate::scoring::RoundResult;

/// Something that happened in a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    ParticipantJoined {
        participant: ParticipantId,
        seat: Seat,
        color: Color,
        team: Option<Team>,
    },
    VoteCast {
        participant: ParticipantId,
        votes: usize,
        seated: usize,
    },
    RoundStarted {
        round: u32,
        starter: ParticipantId,
        required_tile: Option<Tile>,
    },
    /// Private: the recipient's new hand.
    HandDealt { round: u32, tiles: Vec<Tile> },
    TilePlayed {
        participant: ParticipantId,
        tile: Tile,
        side: Side,
        points: u32,
        board_points: u32,
    },
    ComboPlayed {
        participant: ParticipantId,
        first: Tile,
        second: Tile,
        total: u32,
        points: u32,
    },
    /// Private: the tiles the recipient drew.
    TilesDrawn { tiles: Vec<Tile> },
    /// Public counterpart of [`MatchEvent::TilesDrawn`].
    DrewTiles { participant: ParticipantId, count: usize },
    TurnPassed { participant: ParticipantId },
    TurnChanged { participant: ParticipantId },
    RoundVoided { round: u32, redeals: u32 },
    RoundEnded {
        result: RoundResult,
        /// Final hands, empty in anonymous matches.
        hands: Vec<(ParticipantId, Vec<Tile>)>,
    },
    MatchEnded {
        winner: ParticipantId,
        winning_team: Option<Team>,
        scores: Vec<(ParticipantId, u32)>,
    },
}

/// Who may see an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Everyone,
    Participant(ParticipantId),
}

/// An event addressed to an audience.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub audience: Audience,
    pub event: MatchEvent,
}

impl EventEnvelope {
    /// An event for every subscriber.
    #[must_use]
    pub fn public(event: MatchEvent) -> Self {
        Self { audience: Audience::Everyone, event }
    }

    /// An event for one participant only.
    #[must_use]
    pub fn private(participant: ParticipantId, event: MatchEvent) -> Self {
        Self { audience: Audience::Participant(participant), event }
    }

    /// Whether `viewer` may see this event. Spectators pass `None`.
    #[must_use]
    pub fn is_visible_to(&self, viewer: Option<ParticipantId>) -> bool {
        match self.audience {
            Audience::Everyone => true,
            Audience::Participant(id) => viewer == Some(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility() {
        let public = EventEnvelope::public(MatchEvent::TurnPassed { participant: ParticipantId(1) });
        let private = EventEnvelope::private(ParticipantId(2), MatchEvent::TilesDrawn { tiles: vec![Tile::new(0, 1)] });

        assert!(public.is_visible_to(None));
        assert!(public.is_visible_to(Some(ParticipantId(9))));
        assert!(private.is_visible_to(Some(ParticipantId(2))));
        assert!(!private.is_visible_to(Some(ParticipantId(1))));
        assert!(!private.is_visible_to(None));
    }

    #[test]
    fn test_event_json_shape() {
        let event = MatchEvent::TilePlayed {
            participant: ParticipantId(4),
            tile: Tile::new(5, 5),
            side: Side::Top,
            points: 15,
            board_points: 15,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "tile_played");
        assert_eq!(json["side"], "top");

        let back: MatchEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
