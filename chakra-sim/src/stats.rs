//! Simulation statistics tracking.

use std::time::Instant;

use chakra_core::WinCondition;

use crate::simulate::GameRecord;

/// Statistics collected over a batch of games.
#[derive(Debug, Default)]
pub struct SimStats {
    /// Games played to an end or to the turn limit
    pub games: u64,

    /// Wins per seat
    pub wins: Vec<u64>,

    /// Breakdown of how games were won
    pub target_fills: u64,
    pub eliminations: u64,

    /// Games cut off by the turn limit
    pub unfinished: u64,

    pub total_turns: u64,
    pub total_captures: u64,

    /// For rate calculation
    start_time: Option<Instant>,
    last_log_time: Option<Instant>,
}

impl SimStats {
    pub fn new(players: usize) -> Self {
        Self {
            wins: vec![0; players],
            start_time: Some(Instant::now()),
            last_log_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// Record one finished or cut-off game
    pub fn record(&mut self, game: &GameRecord) {
        self.games += 1;
        self.total_turns += game.turns as u64;
        self.total_captures += u64::from(game.captures);

        match game.outcome {
            Some(outcome) => {
                if let Some(wins) = self.wins.get_mut(outcome.winner.index()) {
                    *wins += 1;
                }
                match outcome.condition {
                    WinCondition::TargetFilled => self.target_fills += 1,
                    WinCondition::Elimination => self.eliminations += 1,
                }
            }
            None => self.unfinished += 1,
        }
    }

    pub fn finished(&self) -> u64 {
        self.games - self.unfinished
    }

    pub fn average_turns(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games as f64
    }

    pub fn average_captures(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_captures as f64 / self.games as f64
    }

    /// Games per second since the start
    pub fn games_per_sec(&self) -> f64 {
        if let Some(start) = self.start_time {
            let elapsed = start.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                return self.games as f64 / elapsed;
            }
        }
        0.0
    }

    /// Check if we should log progress
    pub fn should_log(&self, interval_secs: u64) -> bool {
        if let Some(last) = self.last_log_time {
            last.elapsed().as_secs() >= interval_secs
        } else {
            true
        }
    }

    /// Log progress and reset log timer
    pub fn log_progress(&mut self, target: usize) {
        let elapsed_total = self.start_time.map(|s| s.elapsed().as_secs()).unwrap_or(0);
        println!(
            "[{:02}:{:02}:{:02}] games={}/{} rate={:.0}/s unfinished={}",
            elapsed_total / 3600,
            (elapsed_total % 3600) / 60,
            elapsed_total % 60,
            self.games,
            target,
            self.games_per_sec(),
            self.unfinished,
        );
        self.last_log_time = Some(Instant::now());
    }

    fn percent(&self, n: u64) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            100.0 * n as f64 / self.games as f64
        }
    }

    /// Print final summary
    pub fn print_summary(&self) {
        println!("Games played: {}", self.games);
        for (seat, &wins) in self.wins.iter().enumerate() {
            println!("  - Player {} wins: {} ({:.1}%)", seat + 1, wins, self.percent(wins));
        }
        println!("Finished games: {}", self.finished());
        println!("  - Target filled: {}", self.target_fills);
        println!("  - Elimination: {}", self.eliminations);
        println!("Unfinished (turn limit): {}", self.unfinished);
        println!("Average turns: {:.1}", self.average_turns());
        println!("Average captures: {:.2}", self.average_captures());

        if let Some(start) = self.start_time {
            let elapsed = start.elapsed().as_secs_f64();
            println!("Time: {:.2}s ({:.0} games/sec)", elapsed, self.games_per_sec());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chakra_core::{Outcome, PlayerId};

    fn record(winner: Option<(u8, WinCondition)>, turns: usize, captures: u32) -> GameRecord {
        GameRecord {
            outcome: winner.map(|(seat, condition)| Outcome {
                winner: PlayerId(seat),
                condition,
            }),
            turns,
            captures,
        }
    }

    #[test]
    fn test_empty_stats() {
        let stats = SimStats::new(3);
        assert_eq!(stats.wins, vec![0, 0, 0]);
        assert_eq!(stats.average_turns(), 0.0);
        assert_eq!(stats.average_captures(), 0.0);
        assert_eq!(stats.finished(), 0);
    }

    #[test]
    fn test_record_games() {
        let mut stats = SimStats::new(2);
        stats.record(&record(Some((0, WinCondition::TargetFilled)), 40, 3));
        stats.record(&record(Some((1, WinCondition::Elimination)), 90, 11));
        stats.record(&record(Some((1, WinCondition::TargetFilled)), 50, 1));
        stats.record(&record(None, 100, 6));

        assert_eq!(stats.games, 4);
        assert_eq!(stats.wins, vec![1, 2]);
        assert_eq!(stats.target_fills, 2);
        assert_eq!(stats.eliminations, 1);
        assert_eq!(stats.unfinished, 1);
        assert_eq!(stats.finished(), 3);
        assert_eq!(stats.average_turns(), 70.0);
        assert_eq!(stats.average_captures(), 5.25);
        assert_eq!(stats.percent(2), 50.0);
    }
}
