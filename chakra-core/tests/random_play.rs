//! Computer-only games with seeded selection, checked move by move.

use chakra_core::{
    seat_players, AppliedMove, Board, Color, ComputerTurn, GameState, PlayerCount, PlayerId,
    RandomSelector, TurnController, WinCondition,
};
use proptest::prelude::*;

const MAX_TURNS: usize = 400;

fn computer_game(count: PlayerCount) -> GameState {
    let names: Vec<String> = (0..count.get()).map(|i| format!("Bot {}", i + 1)).collect();
    let colors: Vec<Color> = (0..count.get()).map(Color::default_for_seat).collect();
    GameState::new(Board::generate(count), seat_players(count, 0, &names, &colors).unwrap()).unwrap()
}

fn player_count(n: u8) -> PlayerCount {
    PlayerCount::try_from(n).unwrap()
}

/// Check what one applied move did to the piece counts and scores.
fn check_move(before: &GameState, after: &GameState, applied: &AppliedMove) -> Result<(), TestCaseError> {
    let mover = applied.player.index();
    let mut expected_counts = before.piece_counts();
    let mut expected_scores = before.scores();
    match applied.captured_owner {
        Some(victim) => {
            prop_assert!(applied.mv.is_jump());
            prop_assert_ne!(victim, applied.player);
            expected_counts[victim.index()] -= 1;
            expected_scores[mover] += 1;
            prop_assert_eq!(after.occupancy().total(), before.occupancy().total() - 1);
        }
        None => {
            prop_assert!(!applied.mv.is_jump());
            prop_assert_eq!(after.occupancy().total(), before.occupancy().total());
        }
    }
    prop_assert_eq!(after.piece_counts(), expected_counts);
    prop_assert_eq!(after.scores(), expected_scores);
    prop_assert_eq!(after.occupancy().owner(applied.mv.dest()), Some(applied.player));
    prop_assert!(after.occupancy().is_vacant(applied.mv.source()));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Pieces move, jumps remove exactly one opposing piece and score one
    /// point, and turns rotate one seat at a time.
    #[test]
    fn prop_random_play_accounting(players in 2u8..=4, seed in any::<u64>()) {
        let count = player_count(players);
        let mut state = computer_game(count);
        let mut controller = TurnController::new(RandomSelector::seeded(seed));

        for _ in 0..MAX_TURNS {
            if state.is_over() {
                break;
            }
            let before = state.clone();
            let turn = controller.play_computer_turn(&mut state).unwrap();
            match turn {
                ComputerTurn::Moved(applied) => {
                    prop_assert_eq!(applied.player, before.current());
                    prop_assert!(before.current_moves().contains(&applied.mv));
                    check_move(&before, &state, &applied)?;
                    if !state.is_over() {
                        controller.advance(&mut state).unwrap();
                    }
                }
                ComputerTurn::Passed { player } => {
                    prop_assert_eq!(player, before.current());
                    prop_assert!(before.current_moves().is_empty());
                    prop_assert_eq!(state.occupancy(), before.occupancy());
                }
            }
            if !state.is_over() {
                let expected = (before.current().index() + 1) % count.get();
                prop_assert_eq!(state.current(), PlayerId(expected as u8));
            }
        }

        let total_score: u32 = state.scores().iter().sum();
        let home_total: usize = count
            .areas()
            .iter()
            .map(|&area| state.board().area_nodes(area).count())
            .sum();
        prop_assert_eq!(state.occupancy().total() + total_score as usize, home_total);
    }

    /// A finished game's outcome agrees with the final position.
    #[test]
    fn prop_outcome_matches_position(players in 2u8..=4, seed in any::<u64>()) {
        let count = player_count(players);
        let mut state = computer_game(count);
        let mut controller = TurnController::new(RandomSelector::seeded(seed));
        controller.run_computer_turns(&mut state, 3000).unwrap();

        if let Some(outcome) = state.outcome() {
            let winner = state.player(outcome.winner);
            let counts = state.piece_counts();
            match outcome.condition {
                WinCondition::TargetFilled => {
                    let target: Vec<_> = state.board().area_nodes(winner.target).collect();
                    prop_assert!(!target.is_empty());
                    for node in target {
                        prop_assert_eq!(state.occupancy().owner(node), Some(outcome.winner));
                    }
                }
                WinCondition::Elimination => {
                    for (seat, &n) in counts.iter().enumerate() {
                        prop_assert_eq!(n > 0, seat == outcome.winner.index());
                    }
                }
            }
            prop_assert!(controller.play_computer_turn(&mut state).is_err());
        }
    }
}

#[test]
fn test_seeded_games_repeat() {
    for players in 2..=4u8 {
        let count = player_count(players);
        let mut a = computer_game(count);
        let mut b = computer_game(count);
        let turns_a = TurnController::new(RandomSelector::seeded(99))
            .run_computer_turns(&mut a, 200)
            .unwrap();
        let turns_b = TurnController::new(RandomSelector::seeded(99))
            .run_computer_turns(&mut b, 200)
            .unwrap();
        assert_eq!(turns_a, turns_b);
        assert_eq!(a.occupancy(), b.occupancy());
    }
}

#[test]
fn test_long_games_finish_or_hit_limit() {
    for seed in 0..10u64 {
        let mut state = computer_game(PlayerCount::Two);
        let turns = TurnController::new(RandomSelector::seeded(seed))
            .run_computer_turns(&mut state, 2000)
            .unwrap();
        assert!(state.is_over() || turns.len() == 2000);
        if state.is_over() {
            assert!(state.outcome().is_some());
        }
    }
}
