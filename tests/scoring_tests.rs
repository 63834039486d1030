//! Scoring and match progression tests.
//!
//! Match states are built from snapshots so each scenario starts from an
//! exact board and exact hands.

use domino_engine::board::{Board, BoardEngine, Side};
use domino_engine::core::{
    GameRng, MatchConfig, MatchId, Participant, ParticipantId, RuleConfig, Seat, SeatMap, Tile, Variant,
};
use domino_engine::deck::{full_set, Boneyard};
use domino_engine::game::{Match, MatchEvent, MatchSnapshot, MatchStatus};
use domino_engine::round::{Round, RoundEnd};
use domino_engine::scoring::{apply_resolution, resolve, WinReason};

fn t(a: u8, b: u8) -> Tile {
    Tile::new(a, b)
}

/// A round with the given board and hands; everything else sits in an
/// undrawable boneyard.
fn round(number: u32, board: Board, hands: Vec<Vec<Tile>>, turn: u8) -> Round<Board> {
    let used: Vec<Tile> = hands.iter().flatten().copied().chain(board.tiles()).collect();
    let rest: Vec<Tile> = full_set().into_iter().filter(|x| !used.contains(x)).collect();
    let untouchable = rest.len();
    Round::from_parts(
        number,
        board,
        SeatMap::from_vec(hands),
        Boneyard::with_untouchable(rest, untouchable),
        Seat::new(turn),
        None,
    )
}

fn linear(plays: &[(Tile, Side)]) -> Board {
    let mut board = Board::for_variant(Variant::BlockScoring);
    for &(tile, side) in plays {
        board.apply(tile, side).unwrap();
    }
    board
}

fn in_progress(config: MatchConfig, round: Round<Board>) -> Match {
    let seats = round.seat_count();
    let participants = (0..seats)
        .map(|i| Participant::new(ParticipantId(i as u64 + 1), Seat::new(i as u8), config.team_mode))
        .collect();
    let snapshot = MatchSnapshot {
        id: MatchId(1),
        config,
        status: MatchStatus::Active,
        participants,
        rng: GameRng::new(9).state(),
        round_number: round.number(),
        round: Some(round),
        next_starter: None,
        void_redeals: 0,
        deferred_points: 0,
        history: Default::default(),
        moves: Default::default(),
        outcome: None,
    };
    Match::from_snapshot(snapshot).unwrap()
}

/// A tied block defers the tied score; the next decisive round pays it
/// twice on top of its own points and clears it.
#[test]
fn test_tie_carry_over() {
    let config = MatchConfig::new(Variant::BlockScoring).with_max_players(2);
    let first = round(
        1,
        linear(&[(t(4, 4), Side::Left)]),
        vec![vec![t(4, 6), t(2, 5)], vec![t(1, 3), t(0, 3)]],
        0,
    );
    let mut game = in_progress(config, first);

    let events = game.play(ParticipantId(1), t(4, 6), Side::Right).unwrap();
    assert_eq!(game.status(), MatchStatus::RoundEnd);
    assert_eq!(game.deferred_points(), 7);
    assert!(game.participants().iter().all(|p| p.total_score == 0));

    let result = &game.history()[0];
    assert!(result.is_tie);
    assert_eq!(result.reason, WinReason::Tie);
    assert_eq!(result.tied_sum, 7);
    assert_eq!(result.winner, None);
    assert_eq!(result.next_starter, Some(ParticipantId(1)));
    assert!(events.iter().any(|e| matches!(e.event, MatchEvent::RoundEnded { .. })));

    // Round two: seat 1 goes out while seat 0 holds 10 points.
    let mut snapshot = game.snapshot();
    snapshot.round = Some(round(2, linear(&[(t(2, 2), Side::Left)]), vec![vec![t(4, 6)], vec![t(1, 2)]], 1));
    snapshot.round_number = 2;
    snapshot.status = MatchStatus::Active;
    let mut game = Match::from_snapshot(snapshot).unwrap();

    game.play(ParticipantId(2), t(1, 2), Side::Left).unwrap();
    let result = &game.history()[1];
    assert_eq!(result.reason, WinReason::Domino);
    assert_eq!(result.points_won, 10);
    assert_eq!(result.awarded, 7 * 2 + 10);
    assert_eq!(game.participants()[1].total_score, 24);
    assert_eq!(game.deferred_points(), 0);
}

/// Block winners score the others' hands minus their own.
#[test]
fn test_block_win_margin() {
    let scores = SeatMap::from_vec(vec![3, 11, 8]);
    let resolution = resolve(RoundEnd::Blocked { blocker: Some(Seat::new(1)) }, &scores, false);
    assert_eq!(resolution.winner, Some(Seat::new(0)));
    assert_eq!(resolution.points_won, 11 + 8 - 3);
    assert_eq!(resolution.next_starter, Seat::new(0));
}

/// Three consecutive low wins wipe the winner's score; a big win in
/// between clears the streak.
#[test]
fn test_anti_stalling() {
    let rules = RuleConfig::for_variant(Variant::BlockScoring);
    let mut players: Vec<Participant> = (0..2)
        .map(|i| Participant::new(ParticipantId(i + 1), Seat::new(i as u8), false))
        .collect();
    let mut deferred = 0;
    let low = resolve(RoundEnd::Domino { winner: Seat::new(0) }, &SeatMap::from_vec(vec![0, 6]), false);
    let big = resolve(RoundEnd::Domino { winner: Seat::new(0) }, &SeatMap::from_vec(vec![0, 20]), false);

    apply_resolution(&mut players, &low, &mut deferred, &rules);
    apply_resolution(&mut players, &low, &mut deferred, &rules);
    apply_resolution(&mut players, &big, &mut deferred, &rules);
    assert_eq!(players[0].consecutive_low_wins, 0);
    assert_eq!(players[0].total_score, 32);

    apply_resolution(&mut players, &low, &mut deferred, &rules);
    apply_resolution(&mut players, &low, &mut deferred, &rules);
    let award = apply_resolution(&mut players, &low, &mut deferred, &rules);
    assert!(award.penalty_reset);
    assert_eq!(players[0].total_score, 0);
    assert_eq!(players[0].consecutive_low_wins, 0);
}

/// A third low win that carries the side past the target ends the match
/// instead of wiping the score.
#[test]
fn test_low_win_crossing_target_finishes_match() {
    let config = MatchConfig::new(Variant::BlockScoring).with_max_players(2);
    let last = round(
        6,
        linear(&[(t(4, 4), Side::Left)]),
        vec![vec![t(4, 6)], vec![t(1, 3), t(2, 4)]],
        0,
    );
    let mut snapshot = in_progress(config, last).snapshot();
    snapshot.participants[0].total_score = 95;
    snapshot.participants[0].consecutive_low_wins = 2;
    let mut game = Match::from_snapshot(snapshot).unwrap();

    let events = game.play(ParticipantId(1), t(4, 6), Side::Right).unwrap();
    let result = &game.history()[0];
    assert_eq!(result.points_won, 10);
    assert_eq!(result.awarded, 10);
    assert!(!result.penalty_reset);

    assert_eq!(game.status(), MatchStatus::Finished);
    assert_eq!(game.participants()[0].total_score, 105);
    let outcome = game.outcome().unwrap();
    assert_eq!(outcome.winner, ParticipantId(1));
    assert!(events.iter().any(|e| matches!(e.event, MatchEvent::MatchEnded { .. })));
}

/// Team games mirror the award on both members.
#[test]
fn test_team_round_scoring() {
    let config = MatchConfig::new(Variant::BlockScoring).with_min_players(4).with_teams();
    let last = round(
        3,
        linear(&[(t(6, 6), Side::Left)]),
        vec![vec![t(0, 1)], vec![t(6, 5)], vec![t(2, 3)], vec![t(4, 4)]],
        1,
    );
    let mut game = in_progress(config, last);

    game.play(ParticipantId(2), t(6, 5), Side::Right).unwrap();
    let result = &game.history()[0];
    assert_eq!(result.reason, WinReason::Domino);
    assert_eq!(result.points_won, (0 + 1) + (2 + 3));
    let totals: Vec<u32> = game.participants().iter().map(|p| p.total_score).collect();
    assert_eq!(totals, vec![0, 6, 0, 6]);
}

/// Telephone awards are rounded up to a multiple of five.
#[test]
fn test_telephone_round_award_rounds_up() {
    let config = MatchConfig::new(Variant::Telephone).with_max_players(2);
    let mut board = Board::for_variant(Variant::Telephone);
    board.apply(t(1, 4), Side::Left).unwrap();
    let last = round(2, board, vec![vec![t(4, 6)], vec![t(3, 5), t(0, 0), t(2, 6)]], 0);
    let mut game = in_progress(config, last);

    let side = game.round().unwrap().legal_plays(Seat::new(0))[0].1;
    game.play(ParticipantId(1), t(4, 6), side).unwrap();

    let result = &game.history()[0];
    assert_eq!(result.points_won, 3 + 5 + 0 + 2 + 6);
    assert_eq!(result.awarded, 20);
    assert_eq!(game.participants()[0].total_score, 20);
}
