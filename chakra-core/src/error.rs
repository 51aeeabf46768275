//! Errors reported by the engine.
//!
//! Every error is recoverable: a rejected command leaves the game exactly as
//! it was.

use serde::Serialize;

/// Why a move or selection was refused.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IllegalMoveReason {
    /// No node carries the requested label.
    UnknownNode,
    /// The source node holds no piece.
    EmptySource,
    /// The piece at the source belongs to another player.
    NotOwned,
    /// The current player already moved and the turn has not advanced yet.
    NotYourTurn,
    /// The current player is human; the controller will not move for them.
    AwaitingHuman,
    /// The destination is neither an empty neighbour nor a jump landing.
    NotLegal,
}

impl std::fmt::Display for IllegalMoveReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            IllegalMoveReason::UnknownNode => "unknown node",
            IllegalMoveReason::EmptySource => "source node is empty",
            IllegalMoveReason::NotOwned => "piece belongs to another player",
            IllegalMoveReason::NotYourTurn => "not this player's turn",
            IllegalMoveReason::AwaitingHuman => "waiting for a human player",
            IllegalMoveReason::NotLegal => "destination is not reachable",
        };
        f.write_str(text)
    }
}

/// Errors returned by session creation and by the command surface.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("illegal move: {reason}")]
    IllegalMove { reason: IllegalMoveReason },

    #[error("game is already over")]
    GameAlreadyOver,

    #[error("player {player} still has a move to make")]
    TurnInProgress { player: u8 },
}

impl GameError {
    /// Shorthand for [`GameError::IllegalMove`].
    pub fn illegal(reason: IllegalMoveReason) -> GameError {
        GameError::IllegalMove { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GameError::illegal(IllegalMoveReason::NotOwned);
        assert_eq!(err.to_string(), "illegal move: piece belongs to another player");

        let err = GameError::InvalidConfiguration("human_count must be >= 1".into());
        assert_eq!(err.to_string(), "invalid configuration: human_count must be >= 1");

        assert_eq!(GameError::GameAlreadyOver.to_string(), "game is already over");
        assert_eq!(
            GameError::TurnInProgress { player: 2 }.to_string(),
            "player 2 still has a move to make"
        );
    }
}
