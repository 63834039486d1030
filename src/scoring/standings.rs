//! Applying points to participants.
//!
//! In team games both members of a side carry the same total and the same
//! low-win counter, so every update here goes through [`side_members`].

use log::{debug, info};

use super::result::Resolution;
use crate::core::{Participant, ParticipantId, RuleConfig, Seat};

/// What happened when a round's result was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Award {
    /// Points added to the winning side.
    pub awarded: u32,
    /// The winning side hit the low-win limit and was reset to zero.
    pub penalty_reset: bool,
}

/// Seats that share `seat`'s score: its team in team games, else itself.
fn side_members(participants: &[Participant], seat: Seat) -> impl Iterator<Item = usize> + '_ {
    let team = participants.get(seat.index()).and_then(|p| p.team);
    participants
        .iter()
        .enumerate()
        .filter(move |(i, p)| match team {
            Some(team) => p.team == Some(team),
            None => *i == seat.index(),
        })
        .map(|(i, _)| i)
}

/// Add `points` to the side of `seat`, counting them as earned this round.
pub fn credit(participants: &mut [Participant], seat: Seat, points: u32) {
    if points == 0 {
        return;
    }
    let members: Vec<usize> = side_members(participants, seat).collect();
    for i in members {
        participants[i].total_score += points;
        participants[i].round_score += points;
    }
}

/// Apply a round resolution.
///
/// A tie only grows `deferred`. A decisive result pays
/// `deferred * 2 + points_won` (or `points_won` when that is zero), rounded
/// up to the award step, and clears `deferred`. With anti-stalling enabled,
/// a win by less than the margin bumps the winner's low-win counter, any
/// other decisive result clears it, and reaching the limit zeroes that
/// side's score. Counters of every other side are cleared, since their
/// streak was broken. An award that carries the side to the target score
/// is never reset: the match ends on it.
pub fn apply_resolution(
    participants: &mut [Participant],
    resolution: &Resolution,
    deferred: &mut u32,
    rules: &RuleConfig,
) -> Award {
    let Some(winner) = resolution.winner else {
        *deferred += resolution.tied_sum;
        debug!("tie at {}; deferred points now {}", resolution.tied_sum, *deferred);
        return Award { awarded: 0, penalty_reset: false };
    };

    let raw = resolution.points_won;
    let carried = if raw > 0 { *deferred * 2 + raw } else { raw };
    let awarded = rules.round_award(carried);
    *deferred = 0;
    credit(participants, winner, awarded);

    let members: Vec<usize> = side_members(participants, winner).collect();
    let reached_target = members.iter().any(|&i| participants[i].total_score >= rules.target_score);
    let mut penalty_reset = false;
    if rules.anti_stalling() {
        let low_win = raw > 0 && raw < rules.low_win_margin;
        for (i, p) in participants.iter_mut().enumerate() {
            if !members.contains(&i) || !low_win {
                p.consecutive_low_wins = 0;
            } else {
                p.consecutive_low_wins += 1;
            }
        }
        let streak = members.first().map_or(0, |&i| participants[i].consecutive_low_wins);
        if streak >= rules.low_win_limit && reached_target {
            debug!("{} low wins in a row, but {} reached the target", streak, winner);
        } else if streak >= rules.low_win_limit {
            info!("{} low wins in a row; resetting score for {}", streak, winner);
            for &i in &members {
                participants[i].total_score = 0;
                participants[i].consecutive_low_wins = 0;
            }
            penalty_reset = true;
        }
    }

    Award { awarded, penalty_reset }
}

/// The first participant at or above the target score, if any.
#[must_use]
pub fn match_winner(participants: &[Participant], rules: &RuleConfig) -> Option<ParticipantId> {
    participants
        .iter()
        .find(|p| p.total_score >= rules.target_score)
        .map(|p| p.id)
}
