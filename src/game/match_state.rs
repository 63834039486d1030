//! One match: lobby, rounds, scoring and the terminal outcome.
//!
//! A `Match` is a single-threaded state machine. Every command takes
//! `&mut self`, so commands for one match are applied strictly in the order
//! they arrive; matches share nothing mutable with each other.
//!
//! ## Status
//!
//! ```text
//! Lobby ──all voted──▶ Active ──round over──▶ RoundEnd ──start_round──▶ Active
//!                         │                      │
//!                         └──────target hit──────┴──▶ Finished
//! ```
//!
//! A tile-conservation failure moves the match to `Faulted` from any
//! in-round state; nothing is accepted afterwards.

use im::Vector;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::event::{EventEnvelope, MatchEvent};
use super::snapshot::{HandView, MatchSnapshot, MatchView, ParticipantView};
use crate::board::{Board, BoardEngine, ComboPlay, Side};
use crate::core::{
    Command, EngineError, GameRng, MatchConfig, MatchId, MoveRecord, Participant, ParticipantId, RuleConfig, Seat,
    Team, Tile, Variant,
};
use crate::round::{Round, RoundEnd, RoundStatus, StarterRule};
use crate::scoring::{apply_resolution, credit, match_winner, resolve, RoundResult};

type Events = Vec<EventEnvelope>;

/// Match lifecycle status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Accepting participants and start votes.
    Lobby,
    /// A round is being played.
    Active,
    /// The last round is scored; waiting for `start_round`.
    RoundEnd,
    /// Someone reached the target score.
    Finished,
    /// Tile conservation broke; the match is dead.
    Faulted,
}

/// Terminal outcome of a finished match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub winner: ParticipantId,
    pub winning_team: Option<Team>,
    pub final_scores: Vec<(ParticipantId, u32)>,
}

/// What a participant may do right now.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalMoves {
    /// Whether it is this participant's turn.
    pub your_turn: bool,
    /// Playable (tile, side) pairs.
    pub plays: Vec<(Tile, Side)>,
    /// Scoring two-double plays (telephone only).
    pub combos: Vec<ComboPlay>,
    /// Whether draw-or-pass would be accepted.
    pub can_draw_or_pass: bool,
}

/// A match and everything it owns.
#[derive(Clone, Debug)]
pub struct Match {
    id: MatchId,
    config: MatchConfig,
    rules: RuleConfig,
    status: MatchStatus,
    participants: Vec<Participant>,
    rng: GameRng,
    round: Option<Round<Board>>,
    round_number: u32,
    next_starter: Option<Seat>,
    void_redeals: u32,
    deferred_points: u32,
    history: Vector<RoundResult>,
    moves: Vector<MoveRecord>,
    outcome: Option<MatchOutcome>,
}

impl Match {
    /// Create a match in the lobby.
    pub fn new(id: MatchId, config: MatchConfig, seed: u64) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            id,
            rules: config.rules(),
            config,
            status: MatchStatus::Lobby,
            participants: Vec::new(),
            rng: GameRng::new(seed),
            round: None,
            round_number: 0,
            next_starter: None,
            void_redeals: 0,
            deferred_points: 0,
            history: Vector::new(),
            moves: Vector::new(),
            outcome: None,
        })
    }

    // === Accessors ===

    #[must_use]
    pub fn id(&self) -> MatchId {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    #[must_use]
    pub fn status(&self) -> MatchStatus {
        self.status
    }

    /// Seed the match RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Participants in seat order.
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Look up a participant.
    #[must_use]
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// The current or most recent round.
    #[must_use]
    pub fn round(&self) -> Option<&Round<Board>> {
        self.round.as_ref()
    }

    /// Current round number; 0 before the first deal.
    #[must_use]
    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    /// Points withheld by tied rounds.
    #[must_use]
    pub fn deferred_points(&self) -> u32 {
        self.deferred_points
    }

    /// Results of every scored round, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<RoundResult> {
        &self.history
    }

    /// Every accepted in-round command.
    #[must_use]
    pub fn moves(&self) -> &Vector<MoveRecord> {
        &self.moves
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&MatchOutcome> {
        self.outcome.as_ref()
    }

    // === Guards ===

    fn guard(&self) -> Result<(), EngineError> {
        match self.status {
            MatchStatus::Faulted => Err(EngineError::state(format!("{} is faulted", self.id))),
            MatchStatus::Finished => Err(EngineError::state(format!("{} is finished", self.id))),
            _ => Ok(()),
        }
    }

    fn index_of(&self, id: ParticipantId) -> Result<usize, EngineError> {
        self.participants
            .iter()
            .position(|p| p.id == id)
            .ok_or(EngineError::Forbidden(id))
    }

    fn seat_of(&self, id: ParticipantId) -> Result<Seat, EngineError> {
        self.index_of(id).map(|i| self.participants[i].seat)
    }

    fn id_at(&self, seat: Seat) -> Option<ParticipantId> {
        self.participants.iter().find(|p| p.seat == seat).map(|p| p.id)
    }

    fn active_seat(&self, id: ParticipantId) -> Result<Seat, EngineError> {
        self.guard()?;
        let seat = self.seat_of(id)?;
        if self.status != MatchStatus::Active {
            return Err(EngineError::state("no round in progress"));
        }
        Ok(seat)
    }

    fn round_mut(&mut self) -> Result<&mut Round<Board>, EngineError> {
        self.round
            .as_mut()
            .ok_or_else(|| EngineError::state("no round in progress"))
    }

    // === Lobby ===

    /// Seat a participant, at `requested` if given and free, else at the
    /// lowest free position.
    pub fn join(&mut self, id: ParticipantId, requested: Option<u8>) -> Result<(Participant, Events), EngineError> {
        self.guard()?;
        if self.status != MatchStatus::Lobby {
            return Err(EngineError::state("participants can only join in the lobby"));
        }
        if self.participant(id).is_some() {
            return Err(EngineError::state(format!("{id} already joined")));
        }
        if self.participants.len() >= self.config.max_players {
            return Err(EngineError::CapacityExceeded);
        }

        let taken = |pos: u8| self.participants.iter().any(|p| p.seat.0 == pos);
        let position = match requested {
            Some(pos) if usize::from(pos) >= self.config.max_players => {
                return Err(EngineError::state(format!("position {pos} is not at this table")));
            }
            Some(pos) if taken(pos) => return Err(EngineError::state(format!("position {pos} is taken"))),
            Some(pos) => pos,
            None => (0..self.config.max_players as u8)
                .find(|&pos| !taken(pos))
                .ok_or(EngineError::CapacityExceeded)?,
        };

        let participant = Participant::new(id, Seat::new(position), self.config.team_mode);
        self.participants.push(participant.clone());
        self.participants.sort_by_key(|p| p.seat);
        debug!("{}: {id} joined at {}", self.id, participant.seat);

        let event = MatchEvent::ParticipantJoined {
            participant: id,
            seat: participant.seat,
            color: participant.color,
            team: participant.team,
        };
        Ok((participant, vec![EventEnvelope::public(event)]))
    }

    /// Record a start vote. Deals the first round once every seated
    /// participant has voted and the table meets the minimum.
    pub fn vote_start(&mut self, id: ParticipantId) -> Result<Events, EngineError> {
        self.guard()?;
        let index = self.index_of(id)?;
        if self.status != MatchStatus::Lobby {
            return Err(EngineError::state("the match has already started"));
        }

        self.participants[index].has_voted_to_start = true;
        let votes = self.participants.iter().filter(|p| p.has_voted_to_start).count();
        let seated = self.participants.len();
        let mut events = vec![EventEnvelope::public(MatchEvent::VoteCast { participant: id, votes, seated })];

        if votes == seated && seated >= self.config.min_players {
            self.compact_seats();
            events.extend(self.next_round()?);
        }
        Ok(events)
    }

    /// Close gaps left by requested positions so seats run `0..n`.
    fn compact_seats(&mut self) {
        let team_mode = self.config.team_mode;
        for (i, p) in self.participants.iter_mut().enumerate() {
            let seat = Seat::new(i as u8);
            if p.seat != seat {
                p.seat = seat;
                p.color = seat.color();
                p.team = team_mode.then(|| seat.team());
            }
        }
    }

    // === Rounds ===

    /// Deal the next round after the previous one was scored.
    ///
    /// Fails with `InvalidState` in any other status, so a repeated or late
    /// request changes nothing.
    pub fn start_round(&mut self, id: ParticipantId) -> Result<Events, EngineError> {
        self.guard()?;
        self.index_of(id)?;
        match self.status {
            MatchStatus::RoundEnd => self.next_round(),
            MatchStatus::Lobby => Err(EngineError::state("waiting for every participant to vote")),
            MatchStatus::Active => Err(EngineError::state("a round is already in progress")),
            MatchStatus::Finished | MatchStatus::Faulted => Err(EngineError::state("the match is over")),
        }
    }

    fn next_round(&mut self) -> Result<Events, EngineError> {
        self.round_number += 1;
        self.void_redeals = 0;
        let starter = if self.round_number == 1 {
            StarterRule::Opening
        } else {
            let fallback = self.round.as_ref().map_or(Seat::new(0), Round::turn);
            StarterRule::Seat(self.next_starter.unwrap_or(fallback))
        };
        self.deal(starter)
    }

    fn deal(&mut self, starter: StarterRule) -> Result<Events, EngineError> {
        let void_check = self.config.team_mode
            && self.config.variant == Variant::BlockScoring
            && self.void_redeals < self.rules.max_void_redeals;
        let mut rng = self.rng.fork();
        let round = Round::deal(
            self.round_number,
            Board::for_variant(self.config.variant),
            self.participants.len(),
            starter,
            &self.rules,
            void_check,
            &mut rng,
        );

        for p in &mut self.participants {
            p.round_score = 0;
        }
        let starter_id = self
            .id_at(round.turn())
            .ok_or_else(|| EngineError::InvariantViolation(format!("nobody sits at {}", round.turn())))?;
        info!("{}: round {} dealt; {starter_id} opens", self.id, self.round_number);

        let mut events = vec![EventEnvelope::public(MatchEvent::RoundStarted {
            round: self.round_number,
            starter: starter_id,
            required_tile: round.required_tile(),
        })];
        events.extend(self.participants.iter().map(|p| {
            EventEnvelope::private(
                p.id,
                MatchEvent::HandDealt { round: self.round_number, tiles: round.hand(p.seat).to_vec() },
            )
        }));

        self.round = Some(round);
        self.status = MatchStatus::Active;
        self.check_invariants()?;
        Ok(events)
    }

    fn void_round(&mut self) -> Result<Events, EngineError> {
        self.void_redeals += 1;
        debug!(
            "{}: round {} voided ({} of {})",
            self.id, self.round_number, self.void_redeals, self.rules.max_void_redeals
        );
        let mut events = vec![EventEnvelope::public(MatchEvent::RoundVoided {
            round: self.round_number,
            redeals: self.void_redeals,
        })];
        events.extend(self.deal(StarterRule::Opening)?);
        Ok(events)
    }

    // === Moves ===

    /// Apply a recorded command.
    pub fn apply(&mut self, id: ParticipantId, command: Command) -> Result<Events, EngineError> {
        match command {
            Command::Play { tile, side } => self.play(id, tile, side),
            Command::PlayCombo { first, second } => self.play_combo(id, first, second),
            Command::DrawOrPass => self.draw_or_pass(id),
        }
    }

    /// Place one tile.
    pub fn play(&mut self, id: ParticipantId, tile: Tile, side: Side) -> Result<Events, EngineError> {
        let seat = self.active_seat(id)?;
        let round = self.round_mut()?;
        let outcome = round.play(seat, tile, side)?;
        let board_points = round.board().board_points();
        self.record(id, Command::Play { tile, side });

        let mut events = vec![EventEnvelope::public(MatchEvent::TilePlayed {
            participant: id,
            tile,
            side,
            points: outcome.award,
            board_points,
        })];
        self.check_invariants()?;
        if outcome.voided {
            events.extend(self.void_round()?);
            return Ok(events);
        }
        events.extend(self.after_move(seat, outcome.award, outcome.end));
        Ok(events)
    }

    /// Place two doubles in one turn (telephone only).
    pub fn play_combo(&mut self, id: ParticipantId, first: Tile, second: Tile) -> Result<Events, EngineError> {
        let seat = self.active_seat(id)?;
        if self.config.variant != Variant::Telephone {
            return Err(EngineError::illegal("combos are only played in the telephone variant"));
        }
        let (combo, outcome) = self.round_mut()?.play_combo(seat, first, second)?;
        self.record(id, Command::PlayCombo { first, second });

        let mut events = vec![EventEnvelope::public(MatchEvent::ComboPlayed {
            participant: id,
            first,
            second,
            total: combo.total,
            points: outcome.award,
        })];
        self.check_invariants()?;
        events.extend(self.after_move(seat, outcome.award, outcome.end));
        Ok(events)
    }

    /// Draw when nothing is playable, or pass when nothing is drawable.
    pub fn draw_or_pass(&mut self, id: ParticipantId) -> Result<Events, EngineError> {
        let seat = self.active_seat(id)?;
        let outcome = self.round_mut()?.draw_or_pass(seat)?;
        self.record(id, Command::DrawOrPass);

        let mut events = Vec::new();
        if outcome.passed {
            events.push(EventEnvelope::public(MatchEvent::TurnPassed { participant: id }));
        } else {
            events.push(EventEnvelope::private(id, MatchEvent::TilesDrawn { tiles: outcome.drawn.clone() }));
            events.push(EventEnvelope::public(MatchEvent::DrewTiles {
                participant: id,
                count: outcome.drawn.len(),
            }));
        }
        self.check_invariants()?;
        events.extend(self.after_move(seat, 0, outcome.end));
        Ok(events)
    }

    fn record(&mut self, id: ParticipantId, command: Command) {
        let sequence = self.moves.len() as u32;
        self.moves
            .push_back(MoveRecord::new(id, command, self.round_number, sequence));
    }

    /// Credit a placement award, then end the match or the round, or hand
    /// the turn on.
    fn after_move(&mut self, seat: Seat, award: u32, end: Option<RoundEnd>) -> Events {
        if award > 0 {
            credit(&mut self.participants, seat, award);
            if let Some(winner) = match_winner(&self.participants, &self.rules) {
                if let Some(round) = self.round.as_mut() {
                    round.halt();
                }
                return self.finish(winner);
            }
        }
        match end {
            Some(end) => self.resolve_round(end),
            None => {
                let turn = self.round.as_ref().map_or(seat, Round::turn);
                match self.id_at(turn) {
                    Some(participant) => vec![EventEnvelope::public(MatchEvent::TurnChanged { participant })],
                    None => {
                        warn!("{}: nobody sits at {turn}", self.id);
                        Vec::new()
                    }
                }
            }
        }
    }

    fn resolve_round(&mut self, end: RoundEnd) -> Events {
        let Some(round) = self.round.as_mut() else {
            return Vec::new();
        };
        let resolution = resolve(end, &round.hand_scores(), self.config.team_mode);
        let award = apply_resolution(&mut self.participants, &resolution, &mut self.deferred_points, &self.rules);
        round.mark_resolved();

        let hands = if self.config.anonymous {
            Vec::new()
        } else {
            self.participants
                .iter()
                .map(|p| (p.id, round.hand(p.seat).to_vec()))
                .collect()
        };
        let result = resolution.into_result(round.number(), &self.participants, award.awarded, award.penalty_reset);
        info!(
            "{}: round {} ended by {:?}; {} point(s) awarded",
            self.id, result.round, result.reason, result.awarded
        );

        self.next_starter = Some(resolution.next_starter);
        self.history.push_back(result.clone());
        let mut events = vec![EventEnvelope::public(MatchEvent::RoundEnded { result, hands })];

        match match_winner(&self.participants, &self.rules) {
            Some(winner) => events.extend(self.finish(winner)),
            None => self.status = MatchStatus::RoundEnd,
        }
        events
    }

    fn finish(&mut self, winner_id: ParticipantId) -> Events {
        let winning_team = self.participant(winner_id).and_then(|p| p.team);
        let final_scores: Vec<(ParticipantId, u32)> =
            self.participants.iter().map(|p| (p.id, p.total_score)).collect();
        info!("{}: {winner_id} wins the match", self.id);

        self.status = MatchStatus::Finished;
        self.outcome = Some(MatchOutcome { winner: winner_id, winning_team, final_scores: final_scores.clone() });
        vec![EventEnvelope::public(MatchEvent::MatchEnded {
            winner: winner_id,
            winning_team,
            scores: final_scores,
        })]
    }

    fn check_invariants(&mut self) -> Result<(), EngineError> {
        let Some(round) = &self.round else {
            return Ok(());
        };
        if let Err(err) = round.check_conservation() {
            warn!("{}: {err}; match faulted", self.id);
            self.status = MatchStatus::Faulted;
            return Err(err);
        }
        Ok(())
    }

    // === Queries ===

    /// Moves open to a participant in the current round.
    pub fn legal_moves(&self, id: ParticipantId) -> Result<LegalMoves, EngineError> {
        let seat = self.active_seat(id)?;
        let round = self
            .round
            .as_ref()
            .ok_or_else(|| EngineError::state("no round in progress"))?;

        let your_turn = round.turn() == seat;
        let plays = round.legal_plays(seat);
        let combos = if self.config.variant == Variant::Telephone {
            round.legal_combos(seat)
        } else {
            Vec::new()
        };
        Ok(LegalMoves {
            your_turn,
            can_draw_or_pass: your_turn && plays.is_empty(),
            plays,
            combos,
        })
    }

    /// State as `viewer` may see it. Spectators pass `None`.
    ///
    /// The viewer's own hand is always shown. Other hands are shown once the
    /// round or match is over, unless the match is anonymous.
    pub fn view(&self, viewer: Option<ParticipantId>) -> Result<MatchView, EngineError> {
        if let Some(id) = viewer {
            if self.participant(id).is_none() {
                return Err(EngineError::ParticipantNotFound(id));
            }
        }
        let reveal_all = !self.config.anonymous
            && matches!(self.status, MatchStatus::RoundEnd | MatchStatus::Finished);
        let playing = self
            .round
            .as_ref()
            .filter(|r| r.status() == RoundStatus::Active && self.status == MatchStatus::Active);

        let participants = self
            .participants
            .iter()
            .map(|p| {
                let hand = self.round.as_ref().map_or(&[][..], |r| r.hand(p.seat));
                let hand = if reveal_all || viewer == Some(p.id) {
                    HandView::Revealed(hand.to_vec())
                } else {
                    HandView::Hidden { count: hand.len() }
                };
                ParticipantView {
                    id: p.id,
                    seat: p.seat,
                    color: p.color,
                    team: p.team,
                    total_score: p.total_score,
                    round_score: p.round_score,
                    has_voted_to_start: p.has_voted_to_start,
                    hand,
                }
            })
            .collect();

        Ok(MatchView {
            id: self.id,
            variant: self.config.variant,
            status: self.status,
            round_number: self.round_number,
            round_status: self.round.as_ref().map(Round::status),
            participants,
            board: self.round.as_ref().map(|r| r.board().clone()),
            board_points: self.round.as_ref().map_or(0, |r| r.board().board_points()),
            open_ends: self.round.as_ref().map(|r| r.board().open_ends().to_vec()).unwrap_or_default(),
            turn: playing.and_then(|r| self.id_at(r.turn())),
            required_tile: playing.and_then(Round::required_tile),
            boneyard_count: self.round.as_ref().map_or(0, |r| r.boneyard().len()),
            drawable_count: self.round.as_ref().map_or(0, |r| r.boneyard().drawable().len()),
            deferred_points: self.deferred_points,
            history: self.history.iter().cloned().collect(),
            outcome: self.outcome.clone(),
        })
    }

    // === Persistence ===

    /// Complete serialisable state.
    #[must_use]
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            id: self.id,
            config: self.config.clone(),
            status: self.status,
            participants: self.participants.clone(),
            rng: self.rng.state(),
            round: self.round.clone(),
            round_number: self.round_number,
            next_starter: self.next_starter,
            void_redeals: self.void_redeals,
            deferred_points: self.deferred_points,
            history: self.history.clone(),
            moves: self.moves.clone(),
            outcome: self.outcome.clone(),
        }
    }

    /// Rebuild a match from a snapshot.
    pub fn from_snapshot(snapshot: MatchSnapshot) -> Result<Self, EngineError> {
        snapshot.config.validate()?;
        let restored = Self {
            id: snapshot.id,
            rules: snapshot.config.rules(),
            config: snapshot.config,
            status: snapshot.status,
            participants: snapshot.participants,
            rng: GameRng::from_state(&snapshot.rng),
            round: snapshot.round,
            round_number: snapshot.round_number,
            next_starter: snapshot.next_starter,
            void_redeals: snapshot.void_redeals,
            deferred_points: snapshot.deferred_points,
            history: snapshot.history,
            moves: snapshot.moves,
            outcome: snapshot.outcome,
        };
        if let Some(round) = &restored.round {
            round.check_conservation()?;
        }
        Ok(restored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lobby(config: MatchConfig, players: u64) -> Match {
        let mut game = Match::new(MatchId(1), config, 42).unwrap();
        for id in 1..=players {
            game.join(ParticipantId(id), None).unwrap();
        }
        game
    }

    fn started(config: MatchConfig, players: u64) -> Match {
        let mut game = lobby(config, players);
        for id in 1..=players {
            game.vote_start(ParticipantId(id)).unwrap();
        }
        game
    }

    #[test]
    fn test_join_assigns_lowest_free_seat() {
        let mut game = Match::new(MatchId(1), MatchConfig::default(), 1).unwrap();
        let (a, _) = game.join(ParticipantId(1), Some(2)).unwrap();
        let (b, _) = game.join(ParticipantId(2), None).unwrap();
        let (c, _) = game.join(ParticipantId(3), None).unwrap();

        assert_eq!(a.seat, Seat::new(2));
        assert_eq!(b.seat, Seat::new(0));
        assert_eq!(c.seat, Seat::new(1));
        assert!(matches!(game.join(ParticipantId(4), Some(1)), Err(EngineError::InvalidState(_))));
        assert!(matches!(game.join(ParticipantId(1), None), Err(EngineError::InvalidState(_))));

        game.join(ParticipantId(4), None).unwrap();
        assert_eq!(game.join(ParticipantId(5), None), Err(EngineError::CapacityExceeded));
    }

    #[test]
    fn test_votes_start_first_round() {
        let mut game = lobby(MatchConfig::default().with_max_players(3), 3);
        game.vote_start(ParticipantId(1)).unwrap();
        game.vote_start(ParticipantId(2)).unwrap();
        assert_eq!(game.status(), MatchStatus::Lobby);

        let events = game.vote_start(ParticipantId(3)).unwrap();
        assert_eq!(game.status(), MatchStatus::Active);
        assert_eq!(game.round_number(), 1);
        assert!(events.iter().any(|e| matches!(e.event, MatchEvent::RoundStarted { round: 1, .. })));
        let dealt = events.iter().filter(|e| matches!(e.event, MatchEvent::HandDealt { .. })).count();
        assert_eq!(dealt, 3);
    }

    #[test]
    fn test_vote_below_minimum_waits() {
        let mut game = lobby(MatchConfig::default().with_min_players(3), 2);
        game.vote_start(ParticipantId(1)).unwrap();
        game.vote_start(ParticipantId(2)).unwrap();
        assert_eq!(game.status(), MatchStatus::Lobby);
        assert!(game.start_round(ParticipantId(1)).is_err());
    }

    #[test]
    fn test_outsider_is_forbidden() {
        let mut game = started(MatchConfig::default().with_max_players(2), 2);
        assert_eq!(game.draw_or_pass(ParticipantId(9)), Err(EngineError::Forbidden(ParticipantId(9))));
        assert!(matches!(game.view(Some(ParticipantId(9))), Err(EngineError::ParticipantNotFound(_))));
    }

    #[test]
    fn test_empty_seat_never_maps_to_a_participant() {
        let mut game = started(MatchConfig::default().with_max_players(2), 2);
        let turn = game.round().unwrap().turn();
        for p in &mut game.participants {
            if p.seat == turn {
                p.seat = Seat::new(3);
            }
        }
        assert_eq!(game.id_at(turn), None);
        assert_eq!(game.view(None).unwrap().turn, None);

        game.status = MatchStatus::RoundEnd;
        game.next_starter = Some(turn);
        assert!(matches!(game.start_round(ParticipantId(1)), Err(EngineError::InvariantViolation(_))));
    }

    #[test]
    fn test_join_after_start_rejected() {
        let mut game = started(MatchConfig::default().with_max_players(3), 2);
        assert!(matches!(game.join(ParticipantId(3), None), Err(EngineError::InvalidState(_))));
    }

    #[test]
    fn test_start_round_while_active_is_rejected() {
        let mut game = started(MatchConfig::default().with_max_players(2), 2);
        assert!(matches!(game.start_round(ParticipantId(1)), Err(EngineError::InvalidState(_))));
        assert_eq!(game.round_number(), 1);
    }

    #[test]
    fn test_combo_rejected_in_block_variant() {
        let mut game = started(MatchConfig::default().with_max_players(2), 2);
        let turn = game.round().unwrap().turn();
        let id = game.participants()[turn.index()].id;
        assert!(matches!(
            game.play_combo(id, Tile::double(1), Tile::double(2)),
            Err(EngineError::IllegalMove(_))
        ));
    }

    #[test]
    fn test_view_hides_other_hands() {
        let game = started(MatchConfig::default().with_max_players(2), 2);
        let view = game.view(Some(ParticipantId(1))).unwrap();

        assert!(matches!(view.participants[0].hand, HandView::Revealed(ref t) if t.len() == 7));
        assert!(matches!(view.participants[1].hand, HandView::Hidden { count: 7 }));
        assert!(view.turn.is_some());
        assert!(view.required_tile.is_some());

        let spectator = game.view(None).unwrap();
        assert!(spectator.participants.iter().all(|p| matches!(p.hand, HandView::Hidden { .. })));
    }

    #[test]
    fn test_legal_moves_respect_opening_tile() {
        let game = started(MatchConfig::default().with_max_players(2), 2);
        let round = game.round().unwrap();
        let required = round.required_tile().unwrap();
        let opener = game.participants()[round.turn().index()].id;

        let moves = game.legal_moves(opener).unwrap();
        assert!(moves.your_turn);
        assert_eq!(moves.plays, vec![(required, Side::Left)]);
        assert!(!moves.can_draw_or_pass);
    }

    #[test]
    fn test_snapshot_restores_match() {
        let mut game = started(MatchConfig::new(Variant::Telephone).with_max_players(3), 3);
        let round = game.round().unwrap();
        let opener = game.participants()[round.turn().index()].id;
        let tile = round.required_tile().unwrap();
        game.play(opener, tile, Side::Left).unwrap();

        let restored = Match::from_snapshot(game.snapshot()).unwrap();
        assert_eq!(restored.snapshot(), game.snapshot());
        assert_eq!(restored.moves().len(), 1);
    }
}
