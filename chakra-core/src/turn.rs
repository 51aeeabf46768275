//! Turn sequencing and computer move selection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::error::{GameError, IllegalMoveReason};
use crate::game::{AppliedMove, GameState, Phase};
use crate::player::{Controller, PlayerId};
use crate::rules::Move;

/// Picks one move for a computer player.
pub trait MoveSelector {
    /// Choose from `moves`. `None` only when `moves` is empty.
    fn select(&mut self, state: &GameState, moves: &[Move]) -> Option<Move>;
}

/// Uniformly random choice among legal moves.
pub struct RandomSelector<R: Rng = StdRng> {
    rng: R,
}

impl RandomSelector<StdRng> {
    /// Seeded from the operating system.
    pub fn new() -> Self {
        RandomSelector {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence for tests and simulation.
    pub fn seeded(seed: u64) -> Self {
        RandomSelector {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSelector<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomSelector<R> {
    pub fn with_rng(rng: R) -> Self {
        RandomSelector { rng }
    }
}

impl<R: Rng> MoveSelector for RandomSelector<R> {
    fn select(&mut self, _state: &GameState, moves: &[Move]) -> Option<Move> {
        if moves.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..moves.len());
        Some(moves[idx])
    }
}

/// What a computer player did with its turn.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ComputerTurn {
    /// No legal move; the turn already advanced.
    Passed { player: PlayerId },
    /// A move was applied; the turn still has to be advanced.
    Moved(AppliedMove),
}

/// State of the seat whose turn just began.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct TurnStart {
    pub player: PlayerId,
    pub controller: Controller,
    /// The player has no legal move and must pass.
    pub stuck: bool,
}

/// Drives the turn cycle over a [`GameState`], moving for computer players
/// with a [`MoveSelector`].
pub struct TurnController<S = RandomSelector> {
    selector: S,
}

impl<S: MoveSelector> TurnController<S> {
    pub fn new(selector: S) -> Self {
        TurnController { selector }
    }

    /// Hand the turn to the next seat and report who is up.
    pub fn advance(&self, state: &mut GameState) -> Result<TurnStart, GameError> {
        state.advance()?;
        Ok(turn_start(state))
    }

    /// Let the current computer player take its turn.
    ///
    /// A player with no legal move passes and the turn advances immediately.
    /// After a move the state is left in [`Phase::MoveAccepted`] (or game
    /// over) for the caller to advance.
    pub fn play_computer_turn(&mut self, state: &mut GameState) -> Result<ComputerTurn, GameError> {
        match state.phase() {
            Phase::GameOver(_) => return Err(GameError::GameAlreadyOver),
            Phase::MoveAccepted => return Err(GameError::illegal(IllegalMoveReason::NotYourTurn)),
            Phase::InTurn => {}
        }
        let player = state.current();
        if state.current_player().is_human() {
            return Err(GameError::illegal(IllegalMoveReason::AwaitingHuman));
        }

        let moves = state.current_moves();
        match self.selector.select(state, &moves) {
            None => {
                state.advance()?;
                debug!(player = %player, "computer passed");
                Ok(ComputerTurn::Passed { player })
            }
            Some(mv) => Ok(ComputerTurn::Moved(state.apply_move(mv)?)),
        }
    }

    /// Play computer turns back to back, advancing after each move, until a
    /// human is up, the game ends, or `limit` turns have been played.
    pub fn run_computer_turns(
        &mut self,
        state: &mut GameState,
        limit: usize,
    ) -> Result<Vec<ComputerTurn>, GameError> {
        let mut played = Vec::new();
        while played.len() < limit && !state.is_over() && !state.current_player().is_human() {
            let turn = self.play_computer_turn(state)?;
            if matches!(turn, ComputerTurn::Moved(_)) && !state.is_over() {
                state.advance()?;
            }
            played.push(turn);
        }
        Ok(played)
    }
}

impl Default for TurnController<RandomSelector> {
    fn default() -> Self {
        TurnController::new(RandomSelector::new())
    }
}

/// Describe the seat currently to move.
pub fn turn_start(state: &GameState) -> TurnStart {
    let player = state.current_player();
    TurnStart {
        player: player.id,
        controller: player.controller,
        stuck: !state.is_over() && !state.has_legal_moves(),
    }
}
