//! Match registry: the command surface over many independent matches.
//!
//! The registry owns every [`Match`] by id and routes commands to it. After
//! each successful command it builds a [`CommandOutcome`] (the events plus a
//! fresh snapshot) and hands both to every registered [`MatchListener`].
//!
//! ## Example
//!
//! ```
//! use domino_engine::core::{MatchConfig, ParticipantId, Variant};
//! use domino_engine::game::{MatchRegistry, MatchStatus};
//!
//! let mut registry = MatchRegistry::with_seed(7);
//! let (id, _) = registry.create_match(MatchConfig::new(Variant::BlockScoring).with_max_players(2)).unwrap();
//!
//! registry.add_participant(id, ParticipantId(1), None).unwrap();
//! registry.add_participant(id, ParticipantId(2), None).unwrap();
//! registry.vote_start(id, ParticipantId(1)).unwrap();
//! registry.vote_start(id, ParticipantId(2)).unwrap();
//!
//! assert_eq!(registry.get(id).unwrap().status(), MatchStatus::Active);
//! ```

use rustc_hash::FxHashMap;

use super::event::EventEnvelope;
use super::match_state::{LegalMoves, Match};
use super::snapshot::{MatchSnapshot, MatchView};
use crate::board::Side;
use crate::core::{Command, EngineError, GameRng, MatchConfig, MatchId, Participant, ParticipantId, Tile};

/// Receives events and snapshots after every successful command.
///
/// Transport implements `on_event`; storage implements `on_snapshot`.
pub trait MatchListener {
    /// One event, already addressed to its audience.
    fn on_event(&mut self, match_id: MatchId, envelope: &EventEnvelope);

    /// The match state after a command.
    fn on_snapshot(&mut self, _snapshot: &MatchSnapshot) {}
}

/// What a successful command produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandOutcome {
    pub events: Vec<EventEnvelope>,
    pub snapshot: MatchSnapshot,
}

/// Every match in the process, keyed by id.
#[derive(Default)]
pub struct MatchRegistry {
    matches: FxHashMap<MatchId, Match>,
    next_id: u64,
    seeds: Option<GameRng>,
    listeners: Vec<Box<dyn MatchListener>>,
}

impl MatchRegistry {
    /// Registry whose matches are seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose matches are seeded deterministically from `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seeds: Some(GameRng::new(seed)),
            ..Self::default()
        }
    }

    /// Register a listener.
    pub fn add_listener(&mut self, listener: Box<dyn MatchListener>) {
        self.listeners.push(listener);
    }

    /// Look up a match.
    #[must_use]
    pub fn get(&self, id: MatchId) -> Option<&Match> {
        self.matches.get(&id)
    }

    /// Number of matches held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Drop a match, returning it.
    pub fn remove(&mut self, id: MatchId) -> Option<Match> {
        self.matches.remove(&id)
    }

    /// Restore a persisted match, replacing any match with the same id.
    pub fn restore(&mut self, snapshot: MatchSnapshot) -> Result<MatchId, EngineError> {
        let game = Match::from_snapshot(snapshot)?;
        let id = game.id();
        self.next_id = self.next_id.max(id.0 + 1);
        self.matches.insert(id, game);
        Ok(id)
    }

    fn next_seed(&mut self, config: &MatchConfig) -> u64 {
        match (config.seed, self.seeds.as_mut()) {
            (Some(seed), _) => seed,
            (None, Some(seeds)) => seeds.next_seed(),
            (None, None) => GameRng::from_entropy().seed(),
        }
    }

    // === Commands ===

    /// Create a match in the lobby.
    pub fn create_match(&mut self, config: MatchConfig) -> Result<(MatchId, MatchView), EngineError> {
        let id = MatchId(self.next_id);
        let seed = self.next_seed(&config);
        let game = Match::new(id, config, seed)?;
        let view = game.view(None)?;
        self.next_id += 1;
        self.matches.insert(id, game);
        self.notify_snapshot(id);
        Ok((id, view))
    }

    /// Seat a participant.
    pub fn add_participant(
        &mut self,
        id: MatchId,
        participant: ParticipantId,
        requested_position: Option<u8>,
    ) -> Result<(Participant, CommandOutcome), EngineError> {
        let game = self.get_mut(id)?;
        let (seated, events) = game.join(participant, requested_position)?;
        let snapshot = game.snapshot();
        Ok((seated, self.publish(id, events, snapshot)))
    }

    pub fn vote_start(&mut self, id: MatchId, participant: ParticipantId) -> Result<CommandOutcome, EngineError> {
        self.run(id, |game| game.vote_start(participant))
    }

    pub fn start_round(&mut self, id: MatchId, participant: ParticipantId) -> Result<CommandOutcome, EngineError> {
        self.run(id, |game| game.start_round(participant))
    }

    pub fn play(
        &mut self,
        id: MatchId,
        participant: ParticipantId,
        tile: Tile,
        side: Side,
    ) -> Result<CommandOutcome, EngineError> {
        self.run(id, |game| game.play(participant, tile, side))
    }

    pub fn play_combo(
        &mut self,
        id: MatchId,
        participant: ParticipantId,
        first: Tile,
        second: Tile,
    ) -> Result<CommandOutcome, EngineError> {
        self.run(id, |game| game.play_combo(participant, first, second))
    }

    pub fn draw_or_pass(&mut self, id: MatchId, participant: ParticipantId) -> Result<CommandOutcome, EngineError> {
        self.run(id, |game| game.draw_or_pass(participant))
    }

    /// Apply any in-round command.
    pub fn apply(
        &mut self,
        id: MatchId,
        participant: ParticipantId,
        command: Command,
    ) -> Result<CommandOutcome, EngineError> {
        self.run(id, |game| game.apply(participant, command))
    }

    // === Queries ===

    /// Viewer-scoped state. Spectators pass `None`.
    pub fn get_state(&self, id: MatchId, viewer: Option<ParticipantId>) -> Result<MatchView, EngineError> {
        self.matches
            .get(&id)
            .ok_or(EngineError::MatchNotFound(id))?
            .view(viewer)
    }

    pub fn legal_moves(&self, id: MatchId, participant: ParticipantId) -> Result<LegalMoves, EngineError> {
        self.matches
            .get(&id)
            .ok_or(EngineError::MatchNotFound(id))?
            .legal_moves(participant)
    }

    // === Plumbing ===

    fn get_mut(&mut self, id: MatchId) -> Result<&mut Match, EngineError> {
        self.matches.get_mut(&id).ok_or(EngineError::MatchNotFound(id))
    }

    fn run(
        &mut self,
        id: MatchId,
        command: impl FnOnce(&mut Match) -> Result<Vec<EventEnvelope>, EngineError>,
    ) -> Result<CommandOutcome, EngineError> {
        let game = self.get_mut(id)?;
        match command(&mut *game) {
            Ok(events) => {
                let snapshot = game.snapshot();
                Ok(self.publish(id, events, snapshot))
            }
            Err(err) => {
                // A fault changed the match even though the command failed.
                if matches!(err, EngineError::InvariantViolation(_)) {
                    self.notify_snapshot(id);
                }
                Err(err)
            }
        }
    }

    fn publish(&mut self, id: MatchId, events: Vec<EventEnvelope>, snapshot: MatchSnapshot) -> CommandOutcome {
        for listener in &mut self.listeners {
            for envelope in &events {
                listener.on_event(id, envelope);
            }
            listener.on_snapshot(&snapshot);
        }
        CommandOutcome { events, snapshot }
    }

    fn notify_snapshot(&mut self, id: MatchId) {
        if let Some(snapshot) = self.matches.get(&id).map(Match::snapshot) {
            for listener in &mut self.listeners {
                listener.on_snapshot(&snapshot);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::core::Variant;
    use crate::game::{Audience, MatchEvent, MatchStatus};

    #[derive(Default)]
    struct Recorder {
        events: Vec<(MatchId, EventEnvelope)>,
        snapshots: usize,
    }

    struct Shared(Rc<RefCell<Recorder>>);

    impl MatchListener for Shared {
        fn on_event(&mut self, match_id: MatchId, envelope: &EventEnvelope) {
            self.0.borrow_mut().events.push((match_id, envelope.clone()));
        }

        fn on_snapshot(&mut self, _snapshot: &MatchSnapshot) {
            self.0.borrow_mut().snapshots += 1;
        }
    }

    fn two_player(registry: &mut MatchRegistry) -> MatchId {
        let (id, _) = registry
            .create_match(MatchConfig::new(Variant::BlockScoring).with_max_players(2))
            .unwrap();
        registry.add_participant(id, ParticipantId(1), None).unwrap();
        registry.add_participant(id, ParticipantId(2), None).unwrap();
        id
    }

    #[test]
    fn test_unknown_match() {
        let mut registry = MatchRegistry::with_seed(1);
        assert_eq!(
            registry.vote_start(MatchId(99), ParticipantId(1)),
            Err(EngineError::MatchNotFound(MatchId(99)))
        );
        assert!(registry.get_state(MatchId(99), None).is_err());
    }

    #[test]
    fn test_create_rejects_bad_config() {
        let mut registry = MatchRegistry::with_seed(1);
        let err = registry.create_match(MatchConfig::default().with_max_players(7)).unwrap_err();
        assert_eq!(err.reason(), "invalid_config");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_listeners_see_every_command() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut registry = MatchRegistry::with_seed(5);
        registry.add_listener(Box::new(Shared(Rc::clone(&recorder))));

        let id = two_player(&mut registry);
        registry.vote_start(id, ParticipantId(1)).unwrap();
        let outcome = registry.vote_start(id, ParticipantId(2)).unwrap();
        assert_eq!(outcome.snapshot.status, MatchStatus::Active);

        let seen = recorder.borrow();
        // create + two joins + two votes.
        assert_eq!(seen.snapshots, 5);
        assert!(seen.events.iter().all(|(m, _)| *m == id));
        let private_hands = seen
            .events
            .iter()
            .filter(|(_, e)| matches!(e.audience, Audience::Participant(_)))
            .filter(|(_, e)| matches!(e.event, MatchEvent::HandDealt { .. }))
            .count();
        assert_eq!(private_hands, 2);
    }

    #[test]
    fn test_failed_command_emits_nothing() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut registry = MatchRegistry::with_seed(5);
        let id = two_player(&mut registry);
        registry.add_listener(Box::new(Shared(Rc::clone(&recorder))));

        assert!(registry.start_round(id, ParticipantId(1)).is_err());
        assert!(recorder.borrow().events.is_empty());
        assert_eq!(recorder.borrow().snapshots, 0);
    }

    #[test]
    fn test_seeded_registries_agree() {
        let mut a = MatchRegistry::with_seed(77);
        let mut b = MatchRegistry::with_seed(77);
        let (ia, ib) = (two_player(&mut a), two_player(&mut b));
        for registry in [&mut a, &mut b] {
            let id = MatchId(0);
            registry.vote_start(id, ParticipantId(1)).unwrap();
            registry.vote_start(id, ParticipantId(2)).unwrap();
        }
        assert_eq!(ia, ib);
        assert_eq!(a.get(ia).unwrap().snapshot(), b.get(ib).unwrap().snapshot());
    }

    #[test]
    fn test_restore_round_trip() {
        let mut registry = MatchRegistry::with_seed(3);
        let id = two_player(&mut registry);
        let snapshot = registry.get(id).unwrap().snapshot();

        let mut other = MatchRegistry::with_seed(3);
        assert_eq!(other.restore(snapshot.clone()).unwrap(), id);
        assert_eq!(other.get(id).unwrap().snapshot(), snapshot);

        let (next, _) = other.create_match(MatchConfig::default()).unwrap();
        assert_ne!(next, id);
    }
}
