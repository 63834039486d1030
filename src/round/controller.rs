//! Round lifecycle controller.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{DrawOutcome, PlayOutcome, RoundEnd, RoundStatus, StarterRule};
use crate::board::{BoardEngine, ComboPlay, Side};
use crate::core::{EngineError, GameRng, RuleConfig, Seat, SeatMap, Team, Tile};
use crate::deck::{deal_fair, deal_with, draw_count, hand_score, Boneyard, FULL_SET_PIPS, FULL_SET_SIZE};

/// One round: hands, board, boneyard and the turn pointer.
///
/// Generic over the board topology so the same lifecycle drives both
/// variants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round<B> {
    number: u32,
    status: RoundStatus,
    board: B,
    hands: SeatMap<Vec<Tile>>,
    boneyard: Boneyard,
    turn: Seat,
    required_tile: Option<Tile>,
    team_void_check: bool,
    deal_attempts: u32,
    end: Option<RoundEnd>,
}

impl<B: BoardEngine + Clone> Round<B> {
    /// Deal a new round onto an empty `board`.
    ///
    /// With [`StarterRule::Opening`] the deal is redone until every hand is
    /// fair and some hand holds an opening tile; after
    /// `rules.max_deal_attempts` the last deal stands and, if no opening tile
    /// was dealt, seat 0 starts with any tile. The fairness check and the
    /// opening-tile check share that one cap rather than each getting its
    /// own.
    pub fn deal(
        number: u32,
        board: B,
        seat_count: usize,
        starter: StarterRule,
        rules: &RuleConfig,
        team_void_check: bool,
        rng: &mut GameRng,
    ) -> Self {
        let per_player = rules.tiles_per_player;
        let (deal, turn, required_tile) = match starter {
            StarterRule::Opening => {
                let deal = deal_with(seat_count, per_player, rules.max_deal_attempts, rng, |d| {
                    !d.has_unfair_hand() && board.required_first_tile(&d.hands).is_some()
                });
                match board.required_first_tile(&deal.hands) {
                    Some((tile, seat)) => (deal, seat, Some(tile)),
                    None => {
                        warn!("round {number}: no opening tile dealt; seat 0 opens freely");
                        (deal, Seat::new(0), None)
                    }
                }
            }
            StarterRule::Seat(seat) => {
                let deal = deal_fair(seat_count, per_player, rules.max_deal_attempts, rng);
                (deal, seat, None)
            }
        };

        debug!(
            "round {number} dealt in {} attempt(s){}; {} opens{}",
            deal.attempts,
            if deal.accepted { "" } else { " at the cap" },
            turn,
            required_tile.map(|t| format!(" with {t}")).unwrap_or_default()
        );

        let mut round = Self::from_parts(number, board, deal.hands, deal.boneyard, turn, required_tile);
        round.deal_attempts = deal.attempts;
        round.team_void_check = team_void_check;
        round
    }

    /// Build an active round from explicit parts.
    #[must_use]
    pub fn from_parts(
        number: u32,
        board: B,
        hands: SeatMap<Vec<Tile>>,
        boneyard: Boneyard,
        turn: Seat,
        required_tile: Option<Tile>,
    ) -> Self {
        Self {
            number,
            status: RoundStatus::Active,
            board,
            hands,
            boneyard,
            turn,
            required_tile,
            team_void_check: false,
            deal_attempts: 1,
            end: None,
        }
    }

    /// Enable the team-game voided-opening rule.
    #[must_use]
    pub fn with_team_void_check(mut self) -> Self {
        self.team_void_check = true;
        self
    }

    // === Accessors ===

    /// Round number within the match (starts at 1).
    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Lifecycle status.
    #[must_use]
    pub fn status(&self) -> RoundStatus {
        self.status
    }

    /// The board.
    #[must_use]
    pub fn board(&self) -> &B {
        &self.board
    }

    /// All hands.
    #[must_use]
    pub fn hands(&self) -> &SeatMap<Vec<Tile>> {
        &self.hands
    }

    /// One seat's hand.
    #[must_use]
    pub fn hand(&self, seat: Seat) -> &[Tile] {
        &self.hands[seat]
    }

    /// The boneyard.
    #[must_use]
    pub fn boneyard(&self) -> &Boneyard {
        &self.boneyard
    }

    /// Seat to move.
    #[must_use]
    pub fn turn(&self) -> Seat {
        self.turn
    }

    /// Tile the opening play must use, while the board is empty.
    #[must_use]
    pub fn required_tile(&self) -> Option<Tile> {
        self.required_tile.filter(|_| self.board.is_empty())
    }

    /// Deals performed before this one was accepted.
    #[must_use]
    pub fn deal_attempts(&self) -> u32 {
        self.deal_attempts
    }

    /// How the round ended, once it has.
    #[must_use]
    pub fn end(&self) -> Option<RoundEnd> {
        self.end
    }

    /// Number of seats.
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.hands.seat_count()
    }

    /// Hand scores by seat.
    #[must_use]
    pub fn hand_scores(&self) -> SeatMap<u32> {
        SeatMap::new(self.seat_count(), |seat| hand_score(&self.hands[seat]))
    }

    // === Legality ===

    fn may_place(&self, tile: Tile) -> bool {
        self.required_tile().map_or(true, |required| required == tile)
    }

    /// Every (tile, side) the seat could play right now, ignoring turn order.
    #[must_use]
    pub fn legal_plays(&self, seat: Seat) -> Vec<(Tile, Side)> {
        self.hands[seat]
            .iter()
            .filter(|&&tile| self.may_place(tile))
            .flat_map(|&tile| self.board.legal_sides(tile).into_iter().map(move |side| (tile, side)))
            .collect()
    }

    /// Whether the seat holds at least one playable tile.
    #[must_use]
    pub fn has_legal_play(&self, seat: Seat) -> bool {
        self.hands[seat]
            .iter()
            .any(|&tile| self.may_place(tile) && self.board.can_play(tile))
    }

    /// Scoring two-double plays available to the seat.
    #[must_use]
    pub fn legal_combos(&self, seat: Seat) -> Vec<ComboPlay> {
        self.board.combos_for_hand(&self.hands[seat])
    }

    /// No hand can play and the drawable boneyard holds nothing playable.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        let any_hand = Seat::all(self.seat_count()).any(|seat| self.has_legal_play(seat));
        let any_drawable = self.boneyard.drawable().iter().any(|&t| self.board.can_play(t));
        !any_hand && !any_drawable
    }

    fn team_cannot_play(&self, team: Team) -> bool {
        Seat::all(self.seat_count())
            .filter(|seat| seat.team() == team)
            .all(|seat| !self.hands[seat].iter().any(|&t| self.board.can_play(t)))
    }

    // === Commands ===

    fn ensure_turn(&self, seat: Seat) -> Result<(), EngineError> {
        if self.status != RoundStatus::Active {
            return Err(EngineError::state("round is not active"));
        }
        if seat.index() >= self.seat_count() {
            return Err(EngineError::illegal(format!("{seat} is not at this table")));
        }
        if self.turn != seat {
            return Err(EngineError::illegal(format!("not {seat}'s turn")));
        }
        Ok(())
    }

    fn take_from_hand(&mut self, seat: Seat, tile: Tile) -> Result<(), EngineError> {
        let hand = &mut self.hands[seat];
        let pos = hand
            .iter()
            .position(|&t| t == tile)
            .ok_or_else(|| EngineError::illegal(format!("{seat} does not hold {tile}")))?;
        hand.remove(pos);
        Ok(())
    }

    /// Place one tile.
    pub fn play(&mut self, seat: Seat, tile: Tile, side: Side) -> Result<PlayOutcome, EngineError> {
        self.ensure_turn(seat)?;
        if !self.hands[seat].contains(&tile) {
            return Err(EngineError::illegal(format!("{seat} does not hold {tile}")));
        }
        if let Some(required) = self.required_tile() {
            if required != tile {
                return Err(EngineError::illegal(format!("the opening tile must be {required}")));
            }
        }

        let opening = self.board.is_empty();
        self.board.apply(tile, side)?;
        self.take_from_hand(seat, tile)?;
        let award = self.board.placement_award();
        debug!("round {}: {seat} played {tile} on {side:?} (+{award})", self.number);

        if opening && self.team_void_check {
            let voided = [Team(0), Team(1)].into_iter().any(|team| self.team_cannot_play(team));
            if voided {
                debug!("round {}: opening leaves a team without a play; voiding", self.number);
                self.status = RoundStatus::Resolved;
                return Ok(PlayOutcome { award: 0, end: None, voided: true });
            }
        }

        let end = self.after_move(seat, Some(seat));
        Ok(PlayOutcome { award, end, voided: false })
    }

    /// Place two doubles in one turn. Only scoring combos are accepted.
    pub fn play_combo(&mut self, seat: Seat, a: Tile, b: Tile) -> Result<(ComboPlay, PlayOutcome), EngineError> {
        self.ensure_turn(seat)?;
        for tile in [a, b] {
            if !self.hands[seat].contains(&tile) {
                return Err(EngineError::illegal(format!("{seat} does not hold {tile}")));
            }
        }
        let combo = self
            .board
            .find_combo(a, b)
            .ok_or_else(|| EngineError::illegal(format!("{a} and {b} do not form a scoring combo")))?;

        let mut board = self.board.clone();
        board.apply(combo.first.0, combo.first.1)?;
        board.apply(combo.second.0, combo.second.1)?;
        self.board = board;
        self.take_from_hand(seat, a)?;
        self.take_from_hand(seat, b)?;
        debug!("round {}: {seat} played combo {a} + {b} (total {})", self.number, combo.total);

        let end = self.after_move(seat, Some(seat));
        Ok((combo, PlayOutcome { award: combo.payout(), end, voided: false }))
    }

    /// Draw when holding nothing playable; pass when nothing can be drawn.
    ///
    /// The turn advances after a draw as well as after a pass.
    pub fn draw_or_pass(&mut self, seat: Seat) -> Result<DrawOutcome, EngineError> {
        self.ensure_turn(seat)?;
        if self.has_legal_play(seat) {
            return Err(EngineError::illegal(format!("{seat} holds a playable tile")));
        }

        let drawn = self.boneyard.draw(draw_count(self.seat_count()));
        self.hands[seat].extend_from_slice(&drawn);
        let passed = drawn.is_empty();

        if passed {
            debug!("round {}: {seat} passed", self.number);
        } else {
            debug!("round {}: {seat} drew {} tile(s)", self.number, drawn.len());
        }
        let end = self.after_move(seat, None);
        Ok(DrawOutcome { drawn, passed, end })
    }

    /// Termination check, then advance the turn if the round continues.
    fn after_move(&mut self, mover: Seat, blocker: Option<Seat>) -> Option<RoundEnd> {
        let end = self.check_end(mover, blocker);
        if end.is_none() {
            self.turn = self.turn.next(self.seat_count());
        }
        end
    }

    fn check_end(&mut self, mover: Seat, blocker: Option<Seat>) -> Option<RoundEnd> {
        let end = if self.hands[mover].is_empty() {
            Some(RoundEnd::Domino { winner: mover })
        } else if self.is_blocked() {
            Some(RoundEnd::Blocked { blocker })
        } else {
            None
        };
        if end.is_some() {
            self.end = end;
            self.status = RoundStatus::Resolving;
        }
        end
    }

    /// Mark scoring as done.
    pub fn mark_resolved(&mut self) {
        self.status = RoundStatus::Resolved;
    }

    /// Stop the round where it stands (the match ended mid-round).
    pub fn halt(&mut self) {
        self.status = RoundStatus::Resolved;
    }

    // === Invariants ===

    /// Check that hands, board and boneyard together hold the full set once.
    pub fn check_conservation(&self) -> Result<(), EngineError> {
        let mut all: Vec<Tile> = self.hands.values().flatten().copied().collect();
        all.extend(self.board.tiles());
        all.extend_from_slice(self.boneyard.tiles());

        if all.len() != FULL_SET_SIZE {
            return Err(EngineError::InvariantViolation(format!(
                "round {} holds {} tiles, expected {FULL_SET_SIZE}",
                self.number,
                all.len()
            )));
        }
        let pips: u32 = all.iter().map(|t| t.pips()).sum();
        if pips != FULL_SET_PIPS {
            return Err(EngineError::InvariantViolation(format!(
                "round {} holds {pips} pips, expected {FULL_SET_PIPS}",
                self.number
            )));
        }
        all.sort_unstable();
        if let Some(pair) = all.windows(2).find(|w| w[0] == w[1]) {
            return Err(EngineError::InvariantViolation(format!(
                "round {} holds {} twice",
                self.number, pair[0]
            )));
        }
        Ok(())
    }
}
