//! Turning a round end into a [`RoundResult`].

use serde::{Deserialize, Serialize};

use crate::core::{Participant, ParticipantId, Seat, SeatMap, Team};
use crate::round::RoundEnd;

/// Why a round ended the way it did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    Domino,
    Block,
    Tie,
}

/// Outcome of a finished round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Round number.
    pub round: u32,
    /// Winning participant. `None` on a tie; in team games, the team member
    /// who went out or held the lower hand.
    pub winner: Option<ParticipantId>,
    /// Winning team, in team games only.
    pub winning_team: Option<Team>,
    /// Raw points before deferred points and rounding.
    pub points_won: u32,
    /// Points actually added to the winner's total.
    pub awarded: u32,
    pub reason: WinReason,
    /// Who opens the next round. `None` only if that seat is empty.
    pub next_starter: Option<ParticipantId>,
    pub is_tie: bool,
    /// Tied minimum hand score carried into deferred points.
    pub tied_sum: u32,
    /// The winner's side hit the anti-stalling limit and lost its score.
    pub penalty_reset: bool,
}

/// Seat-level outcome, before awards are applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub winner: Option<Seat>,
    pub winning_team: Option<Team>,
    pub points_won: u32,
    pub reason: WinReason,
    pub next_starter: Seat,
    pub tied_sum: u32,
}

impl Resolution {
    /// Whether the round was drawn.
    #[must_use]
    pub fn is_tie(&self) -> bool {
        self.reason == WinReason::Tie
    }

    /// Attach participant identities and the applied award.
    #[must_use]
    pub fn into_result(
        self,
        round: u32,
        participants: &[Participant],
        awarded: u32,
        penalty_reset: bool,
    ) -> RoundResult {
        let id_of = |seat: Seat| participants.get(seat.index()).map(|p| p.id);
        RoundResult {
            round,
            winner: self.winner.and_then(id_of),
            winning_team: self.winning_team,
            points_won: self.points_won,
            awarded,
            reason: self.reason,
            next_starter: id_of(self.next_starter),
            is_tie: self.is_tie(),
            tied_sum: self.tied_sum,
            penalty_reset,
        }
    }
}

/// Resolve a round end from the final hand scores.
///
/// - Domino: the emptied hand wins the opponents' hand scores.
/// - Block: the lowest score wins the others' sum minus its own.
/// - Tie: two or more sides share the lowest score; nobody scores and the
///   blocker (or seat 0) opens next.
#[must_use]
pub fn resolve(end: RoundEnd, scores: &SeatMap<u32>, team_mode: bool) -> Resolution {
    if team_mode {
        resolve_teams(end, scores)
    } else {
        resolve_individual(end, scores)
    }
}

fn resolve_individual(end: RoundEnd, scores: &SeatMap<u32>) -> Resolution {
    match end {
        RoundEnd::Domino { winner } => Resolution {
            winner: Some(winner),
            winning_team: None,
            points_won: scores.iter().filter(|&(s, _)| s != winner).map(|(_, &v)| v).sum(),
            reason: WinReason::Domino,
            next_starter: winner,
            tied_sum: 0,
        },
        RoundEnd::Blocked { blocker } => {
            let min = scores.values().copied().min().unwrap_or(0);
            let lowest: Vec<Seat> = scores.iter().filter(|&(_, &v)| v == min).map(|(s, _)| s).collect();
            if lowest.len() > 1 {
                return tie(min, blocker);
            }
            let winner = lowest[0];
            let others: u32 = scores.iter().filter(|&(s, _)| s != winner).map(|(_, &v)| v).sum();
            Resolution {
                winner: Some(winner),
                winning_team: None,
                points_won: others.saturating_sub(min),
                reason: WinReason::Block,
                next_starter: winner,
                tied_sum: 0,
            }
        }
    }
}

fn resolve_teams(end: RoundEnd, scores: &SeatMap<u32>) -> Resolution {
    let team_score = |team: Team| -> u32 {
        scores.iter().filter(|&(s, _)| s.team() == team).map(|(_, &v)| v).sum()
    };
    match end {
        RoundEnd::Domino { winner } => {
            let team = winner.team();
            Resolution {
                winner: Some(winner),
                winning_team: Some(team),
                points_won: team_score(team.opponent()),
                reason: WinReason::Domino,
                next_starter: winner,
                tied_sum: 0,
            }
        }
        RoundEnd::Blocked { blocker } => {
            let (a, b) = (team_score(Team(0)), team_score(Team(1)));
            if a == b {
                return tie(a, blocker);
            }
            let (team, own, other) = if a < b { (Team(0), a, b) } else { (Team(1), b, a) };
            // The member with the lighter hand leads the next round.
            let leader = scores
                .iter()
                .filter(|&(s, _)| s.team() == team)
                .min_by_key(|&(s, &v)| (v, s))
                .map_or(Seat::new(team.0), |(s, _)| s);
            Resolution {
                winner: Some(leader),
                winning_team: Some(team),
                points_won: other - own,
                reason: WinReason::Block,
                next_starter: leader,
                tied_sum: 0,
            }
        }
    }
}

fn tie(tied_sum: u32, blocker: Option<Seat>) -> Resolution {
    Resolution {
        winner: None,
        winning_team: None,
        points_won: 0,
        reason: WinReason::Tie,
        next_starter: blocker.unwrap_or(Seat::new(0)),
        tied_sum,
    }
}
