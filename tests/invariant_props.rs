//! Property-based tests for match invariants.
//!
//! Random legal play on random tables must keep the set intact, keep
//! scores consistent and always bring rounds to an end.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use domino_engine::board::BoardEngine;
use domino_engine::core::{Command, MatchConfig, MatchId, ParticipantId, Variant};
use domino_engine::deck::hand_score;
use domino_engine::game::{Match, MatchStatus};

fn variant_strategy() -> impl Strategy<Value = Variant> {
    prop_oneof![Just(Variant::BlockScoring), Just(Variant::Telephone)]
}

fn seated(config: MatchConfig, players: u64, seed: u64) -> Match {
    let mut game = Match::new(MatchId(1), config, seed).unwrap();
    for id in 1..=players {
        game.join(ParticipantId(id), None).unwrap();
    }
    for id in 1..=players {
        game.vote_start(ParticipantId(id)).unwrap();
    }
    game
}

/// Pick a move from the legal set using the next choice.
fn choose(game: &Match, choice: usize) -> (ParticipantId, Command) {
    let turn = game.round().unwrap().turn();
    let id = game.participants()[turn.index()].id;
    let moves = game.legal_moves(id).unwrap();

    let options = moves.plays.len() + moves.combos.len();
    if options == 0 {
        return (id, Command::DrawOrPass);
    }
    let pick = choice % options;
    let command = match moves.plays.get(pick) {
        Some(&(tile, side)) => Command::Play { tile, side },
        None => {
            let combo = &moves.combos[pick - moves.plays.len()];
            Command::PlayCombo { first: combo.first.0, second: combo.second.0 }
        }
    };
    (id, command)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every command leaves 28 distinct tiles across hands, board and
    /// boneyard, and every round ends within a bounded number of moves.
    #[test]
    fn prop_random_play_conserves_and_terminates(
        seed in any::<u64>(),
        variant in variant_strategy(),
        players in 2u64..=4,
        choices in prop::collection::vec(any::<usize>(), 400)
    ) {
        let config = MatchConfig::new(variant).with_max_players(players as usize);
        let mut game = seated(config, players, seed);
        let mut moves_this_round = 0;

        for choice in choices {
            match game.status() {
                MatchStatus::Active => {}
                MatchStatus::RoundEnd => {
                    game.start_round(ParticipantId(1)).unwrap();
                    moves_this_round = 0;
                    continue;
                }
                _ => break,
            }

            let (id, command) = choose(&game, choice);
            game.apply(id, command).unwrap();
            moves_this_round += 1;

            if let Some(round) = game.round() {
                prop_assert!(round.check_conservation().is_ok());
            }
            // Each round has at most 28 placements, 21 draws and a pass
            // for every seat between them.
            prop_assert!(moves_this_round <= 28 * 5 + 21);
        }
        prop_assert_ne!(game.status(), MatchStatus::Faulted);
    }

    /// Scores never go backwards except through the anti-stalling reset,
    /// and a finished match names a winner at or past the target.
    #[test]
    fn prop_scores_are_consistent(
        seed in any::<u64>(),
        variant in variant_strategy(),
        choices in prop::collection::vec(any::<usize>(), 600)
    ) {
        let config = MatchConfig::new(variant).with_max_players(2);
        let mut game = seated(config, 2, seed);

        for choice in choices {
            match game.status() {
                MatchStatus::Active => {}
                MatchStatus::RoundEnd => {
                    game.start_round(ParticipantId(2)).unwrap();
                    continue;
                }
                _ => break,
            }

            let before: Vec<u32> = game.participants().iter().map(|p| p.total_score).collect();
            let resets_before = game.history().iter().filter(|r| r.penalty_reset).count();

            let (id, command) = choose(&game, choice);
            game.apply(id, command).unwrap();

            let resets_after = game.history().iter().filter(|r| r.penalty_reset).count();
            if resets_after == resets_before {
                for (p, old) in game.participants().iter().zip(before) {
                    prop_assert!(p.total_score >= old);
                }
            }

            if let Some(result) = game.history().last() {
                if result.is_tie {
                    prop_assert_eq!(result.winner, None);
                    prop_assert_eq!(result.awarded, 0);
                }
            }
            if game.status() == MatchStatus::Active {
                let round = game.round().unwrap();
                let in_hands: u32 = round.hands().values().map(|h| hand_score(h)).sum();
                prop_assert!(in_hands > 0 || round.board().is_empty());
            }
        }

        if let Some(outcome) = game.outcome() {
            let winner = game.participant(outcome.winner).unwrap();
            prop_assert!(winner.total_score >= game.rules().target_score);
        }
    }
}
