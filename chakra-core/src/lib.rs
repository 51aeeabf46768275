//! Chakra game logic: board graphs, move legality and the turn cycle.
//!
//! # Boards
//!
//! ```text
//!   2 players          3 players               4 players
//!
//!    T T T                T T T                 T T T
//!     T T T               T T T            L     T T T     R
//!       G               I2  T7  I3         L L  I1 T7 I2  R R
//!     B B B            B7       R7         L L L7      R7 R R
//!    B B B           B B   I1   R R        L L  I4 B7 I3  R R
//!                                          L     B B B     R
//!                                                B B B
//! ```
//!
//! Each player starts on their home area and races to fill a target area,
//! capturing opponents by jumping over them along straight lines.
//!
//! # Layers
//!
//! ```text
//! Board (topology)  ──►  MoveRules  ──►  GameState  ──►  TurnController  ──►  GameSession
//!   immutable            read-only       occupancy,      computer turns       labels, clicks,
//!                                        phase, wins                          rotation
//! ```

#[cfg(feature = "wasm")]
pub mod wasm;

mod config;
mod error;
mod game;
mod geometry;
mod occupancy;
mod player;
mod rules;
mod session;
mod topology;
mod turn;
mod view;

pub use config::SessionConfig;
pub use error::{GameError, IllegalMoveReason};
pub use game::{AppliedMove, GameState, Outcome, Phase, WinCondition};
pub use geometry::{is_collinear_and_between, Point, BOARD_CENTER, COLLINEAR_TOLERANCE};
pub use occupancy::{BoardState, Piece};
pub use player::{seat_players, Color, Controller, Difficulty, Player, PlayerId};
pub use rules::{Move, MoveRules};
pub use session::{ClickResult, GameSession};
pub use topology::{Area, Board, Node, NodeId, PlayerCount};
pub use turn::{turn_start, ComputerTurn, MoveSelector, RandomSelector, TurnController, TurnStart};
pub use view::{facing_angle, RotationView, HIT_RADIUS};
