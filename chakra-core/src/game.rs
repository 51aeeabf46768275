//! Game state and win evaluation.
//!
//! ```text
//!            apply_move              advance
//!   InTurn ─────────────► MoveAccepted ─────► InTurn(next)
//!     │  │                    │
//!     │  └── advance ─────────┼──────────────► InTurn(next)   (pass, only
//!     │      (no legal move)  │                                when stuck)
//!     │                       ▼
//!     └───────────────────► GameOver(outcome)   (win found after a move)
//! ```
//!
//! The win check runs once per applied move, for the mover only: target
//! fill first, then elimination.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{GameError, IllegalMoveReason};
use crate::occupancy::BoardState;
use crate::player::{Player, PlayerId};
use crate::rules::{Move, MoveRules};
use crate::topology::{Board, NodeId};

// ============================================================================
// Outcome
// ============================================================================

/// How a game was won.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WinCondition {
    /// Every node of the winner's target area holds one of their pieces.
    TargetFilled,
    /// No other player has a piece left.
    Elimination,
}

impl WinCondition {
    /// Announcement shown when `name` wins this way.
    pub fn message(self, name: &str) -> String {
        match self {
            WinCondition::TargetFilled => format!("{} wins by filling the target area!", name),
            WinCondition::Elimination => format!("{} wins! All opponents have been jumped.", name),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize)]
pub struct Outcome {
    pub winner: PlayerId,
    pub condition: WinCondition,
}

/// Where the turn cycle stands.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// The current player owes a move.
    InTurn,
    /// The current player moved; the turn has not advanced yet.
    MoveAccepted,
    GameOver(Outcome),
}

/// Result of an accepted move.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct AppliedMove {
    pub mv: Move,
    pub player: PlayerId,
    /// Owner of the captured piece for a jump.
    pub captured_owner: Option<PlayerId>,
    /// The mover's score after the move.
    pub score: u32,
    /// Set when this move ended the game.
    pub outcome: Option<Outcome>,
}

impl AppliedMove {
    /// Whether the presentation should play the capture cue rather than the
    /// plain move cue.
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.mv.is_jump()
    }
}

// ============================================================================
// GameState
// ============================================================================

/// Board, roster, occupancy and the turn pointer of one game.
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    players: Vec<Player>,
    occupancy: BoardState,
    current: PlayerId,
    phase: Phase,
    /// Completed turns, passes included.
    turns: u32,
}

impl GameState {
    /// Fresh game: every player on their home area, player 0 to move.
    pub fn new(board: Board, players: Vec<Player>) -> Result<GameState, GameError> {
        let occupancy = BoardState::initial(&board, &players);
        GameState::with_occupancy(board, players, occupancy, PlayerId(0))
    }

    /// Game from an arbitrary position, `current` to move.
    ///
    /// Pieces must belong to seated players. Scores are taken from
    /// `players` as given.
    pub fn with_occupancy(
        board: Board,
        players: Vec<Player>,
        occupancy: BoardState,
        current: PlayerId,
    ) -> Result<GameState, GameError> {
        if players.len() != board.player_count().get() {
            return Err(GameError::InvalidConfiguration(format!(
                "{} players seated on a {}-player board",
                players.len(),
                board.player_count().get()
            )));
        }
        if occupancy.len() != board.len() {
            return Err(GameError::InvalidConfiguration(format!(
                "occupancy covers {} nodes, board has {}",
                occupancy.len(),
                board.len()
            )));
        }
        if current.index() >= players.len() {
            return Err(GameError::InvalidConfiguration(format!(
                "no player {} to move",
                current
            )));
        }
        if let Some((id, piece)) = occupancy
            .pieces()
            .find(|(_, piece)| piece.owner.index() >= players.len())
        {
            return Err(GameError::InvalidConfiguration(format!(
                "piece on {} belongs to unseated player {}",
                board.label(id),
                piece.owner
            )));
        }
        Ok(GameState {
            board,
            players,
            occupancy,
            current,
            phase: Phase::InTurn,
            turns: 0,
        })
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[inline]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    #[inline]
    pub fn occupancy(&self) -> &BoardState {
        &self.occupancy
    }

    /// Whose turn it is. After game over, the winner.
    #[inline]
    pub fn current(&self) -> PlayerId {
        self.current
    }

    #[inline]
    pub fn current_player(&self) -> &Player {
        &self.players[self.current.index()]
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::GameOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    #[inline]
    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// Score per seat.
    pub fn scores(&self) -> Vec<u32> {
        self.players.iter().map(|p| p.score).collect()
    }

    /// Pieces left per seat.
    pub fn piece_counts(&self) -> Vec<usize> {
        self.occupancy.counts(self.players.len())
    }

    /// Move generator over the current position.
    #[inline]
    pub fn rules(&self) -> MoveRules<'_> {
        MoveRules::new(&self.board, &self.occupancy)
    }

    /// Every move available to the current player.
    pub fn current_moves(&self) -> Vec<Move> {
        self.rules().legal_moves_for_player(self.current)
    }

    pub fn has_legal_moves(&self) -> bool {
        let rules = self.rules();
        self.occupancy
            .nodes_of(self.current)
            .any(|node| !rules.legal_moves(node).is_empty())
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Turn a `(source, dest)` intent by the current player into a move,
    /// preferring a jump when both exist. Does not mutate.
    pub fn resolve_move(&self, source: NodeId, dest: NodeId) -> Result<Move, GameError> {
        self.check_can_move(source)?;
        if !self.board.contains(dest) {
            return Err(GameError::illegal(IllegalMoveReason::UnknownNode));
        }
        self.rules()
            .resolve(source, dest)
            .ok_or(GameError::illegal(IllegalMoveReason::NotLegal))
    }

    /// Play `mv` for the current player and evaluate the win conditions.
    pub fn apply_move(&mut self, mv: Move) -> Result<AppliedMove, GameError> {
        self.check_can_move(mv.source())?;
        if !self.rules().legal_moves(mv.source()).contains(&mv) {
            return Err(GameError::illegal(IllegalMoveReason::NotLegal));
        }

        let player = self.current;
        if let Some(piece) = self.occupancy.take(mv.source()) {
            self.occupancy.place(mv.dest(), piece);
        }
        let captured_owner = mv
            .captured()
            .and_then(|node| self.occupancy.take(node))
            .map(|piece| piece.owner);
        if captured_owner.is_some() {
            self.players[player.index()].score += 1;
        }
        let score = self.players[player.index()].score;

        debug!(
            player = %player,
            source = self.board.label(mv.source()),
            dest = self.board.label(mv.dest()),
            capture = captured_owner.is_some(),
            score,
            "move applied"
        );

        let outcome = self.evaluate(player);
        self.phase = match outcome {
            Some(outcome) => {
                info!(
                    winner = %outcome.winner,
                    condition = ?outcome.condition,
                    turns = self.turns,
                    "game over"
                );
                Phase::GameOver(outcome)
            }
            None => Phase::MoveAccepted,
        };

        Ok(AppliedMove {
            mv,
            player,
            captured_owner,
            score,
            outcome,
        })
    }

    /// Hand the turn to the next seat.
    ///
    /// Allowed after a move, or as a pass when the current player has no
    /// legal move. Returns the new current player.
    pub fn advance(&mut self) -> Result<PlayerId, GameError> {
        match self.phase {
            Phase::GameOver(_) => return Err(GameError::GameAlreadyOver),
            Phase::InTurn if self.has_legal_moves() => {
                return Err(GameError::TurnInProgress {
                    player: self.current.0,
                })
            }
            Phase::InTurn => debug!(player = %self.current, "no legal move, passing"),
            Phase::MoveAccepted => {}
        }
        let next = (self.current.index() + 1) % self.players.len();
        self.current = PlayerId(next as u8);
        self.phase = Phase::InTurn;
        self.turns += 1;
        debug!(player = %self.current, turn = self.turns, "turn advanced");
        Ok(self.current)
    }

    fn check_can_move(&self, source: NodeId) -> Result<(), GameError> {
        match self.phase {
            Phase::GameOver(_) => return Err(GameError::GameAlreadyOver),
            Phase::MoveAccepted => return Err(GameError::illegal(IllegalMoveReason::NotYourTurn)),
            Phase::InTurn => {}
        }
        if !self.board.contains(source) {
            return Err(GameError::illegal(IllegalMoveReason::UnknownNode));
        }
        match self.occupancy.owner(source) {
            None => Err(GameError::illegal(IllegalMoveReason::EmptySource)),
            Some(owner) if owner != self.current => Err(GameError::illegal(IllegalMoveReason::NotOwned)),
            Some(_) => Ok(()),
        }
    }

    /// Win check for `mover`, target fill before elimination.
    fn evaluate(&self, mover: PlayerId) -> Option<Outcome> {
        let target = self.players[mover.index()].target;
        let mut target_nodes = self.board.area_nodes(target).peekable();
        if target_nodes.peek().is_some()
            && target_nodes.all(|node| self.occupancy.owner(node) == Some(mover))
        {
            return Some(Outcome {
                winner: mover,
                condition: WinCondition::TargetFilled,
            });
        }

        let counts = self.piece_counts();
        let mut alive = counts.iter().enumerate().filter(|(_, count)| **count > 0);
        match (alive.next(), alive.next()) {
            (Some((seat, _)), None) => Some(Outcome {
                winner: PlayerId(seat as u8),
                condition: WinCondition::Elimination,
            }),
            _ => None,
        }
    }
}
