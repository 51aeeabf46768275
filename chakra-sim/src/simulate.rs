//! Computer-only games played back to back.
//!
//! Every seat is a computer player picking uniformly among its legal moves.
//! Game `i` of a batch draws from `StdRng` seeded with `seed + i`, so any
//! single game can be replayed on its own.

use std::sync::atomic::{AtomicBool, Ordering};

use chakra_core::{
    seat_players, Board, Color, ComputerTurn, GameError, GameState, Outcome, PlayerCount,
    RandomSelector, TurnController,
};
use tracing::debug;

use crate::stats::SimStats;

/// Seconds between progress lines
const LOG_INTERVAL_SECS: u64 = 5;

/// How one game went.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    /// `None` when the turn limit was hit first
    pub outcome: Option<Outcome>,
    pub turns: usize,
    pub captures: u32,
}

/// A fresh all-computer game.
pub fn computer_game(count: PlayerCount) -> Result<GameState, GameError> {
    let names: Vec<String> = (0..count.get()).map(|i| format!("Computer {}", i + 1)).collect();
    let colors: Vec<Color> = (0..count.get()).map(Color::default_for_seat).collect();
    GameState::new(Board::generate(count), seat_players(count, 0, &names, &colors)?)
}

/// Play one game to its end or to `max_turns` controller turns.
pub fn play_game(count: PlayerCount, seed: u64, max_turns: usize) -> Result<GameRecord, GameError> {
    let mut state = computer_game(count)?;
    let mut controller = TurnController::new(RandomSelector::seeded(seed));
    let turns = controller.run_computer_turns(&mut state, max_turns)?;

    let captures = turns
        .iter()
        .filter(|turn| matches!(turn, ComputerTurn::Moved(applied) if applied.is_capture()))
        .count() as u32;

    let record = GameRecord {
        outcome: state.outcome(),
        turns: turns.len(),
        captures,
    };
    debug!(seed, turns = record.turns, captures, outcome = ?record.outcome, "game finished");
    Ok(record)
}

/// Play `games` games, stopping early once `running` is cleared.
pub fn simulate(
    count: PlayerCount,
    games: usize,
    seed: u64,
    max_turns: usize,
    running: &AtomicBool,
) -> Result<SimStats, GameError> {
    let mut stats = SimStats::new(count.get());
    for i in 0..games {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        let record = play_game(count, seed.wrapping_add(i as u64), max_turns)?;
        stats.record(&record);

        if stats.should_log(LOG_INTERVAL_SECS) {
            stats.log_progress(games);
        }
    }
    Ok(stats)
}
