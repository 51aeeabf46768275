//! A game session as seen by the presentation layer.
//!
//! [`GameSession`] owns the [`GameState`], the turn controller and the
//! transient UI state (selected node, rotation). Nodes are addressed by
//! label on the command surface.

use serde::Serialize;
use tracing::{info, instrument};

use crate::config::SessionConfig;
use crate::error::{GameError, IllegalMoveReason};
use crate::game::{AppliedMove, GameState, Phase};
use crate::geometry::Point;
use crate::occupancy::Piece;
use crate::player::Player;
use crate::topology::{Board, NodeId};
use crate::turn::{turn_start, ComputerTurn, MoveSelector, RandomSelector, TurnController, TurnStart};
use crate::view::{RotationView, HIT_RADIUS};

/// What a click on the board did.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ClickResult {
    /// Not a human's turn, game over, or nothing actionable under the click.
    Ignored,
    /// An own piece is now selected.
    Selected { node: NodeId, destinations: Vec<NodeId> },
    Moved(AppliedMove),
    /// The click missed every destination; selection dropped.
    Cleared,
}

pub struct GameSession<S: MoveSelector = RandomSelector> {
    config: SessionConfig,
    state: GameState,
    controller: TurnController<S>,
    selected: Option<NodeId>,
    rotation: RotationView,
    last_move: Option<AppliedMove>,
}

impl GameSession<RandomSelector> {
    /// Start a game with a randomly seeded computer opponent.
    pub fn new(config: SessionConfig) -> Result<Self, GameError> {
        GameSession::with_selector(config, RandomSelector::new())
    }
}

impl<S: MoveSelector> GameSession<S> {
    pub fn with_selector(config: SessionConfig, selector: S) -> Result<Self, GameError> {
        let state = new_state(&config)?;
        let mut session = GameSession {
            rotation: RotationView::new(config.enable_rotation),
            config,
            state,
            controller: TurnController::new(selector),
            selected: None,
            last_move: None,
        };
        session.begin_turn();
        info!(
            players = session.config.player_count,
            humans = session.config.human_count,
            rotation = session.config.enable_rotation,
            "session created"
        );
        Ok(session)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn board(&self) -> &Board {
        self.state.board()
    }

    #[inline]
    pub fn players(&self) -> &[Player] {
        self.state.players()
    }

    #[inline]
    pub fn current_player(&self) -> &Player {
        self.state.current_player()
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    #[inline]
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    #[inline]
    pub fn rotation(&self) -> RotationView {
        self.rotation
    }

    /// The most recent applied move, for the move/jump cue.
    #[inline]
    pub fn last_move(&self) -> Option<AppliedMove> {
        self.last_move
    }

    pub fn turn_start(&self) -> TurnStart {
        turn_start(&self.state)
    }

    /// Whether the session is waiting on a human click.
    pub fn awaiting_human(&self) -> bool {
        self.state.phase() == Phase::InTurn && self.state.current_player().is_human()
    }

    pub fn node_id(&self, label: &str) -> Result<NodeId, GameError> {
        self.board()
            .node_id(label)
            .ok_or(GameError::illegal(IllegalMoveReason::UnknownNode))
    }

    /// Where `node` is drawn under the current rotation.
    pub fn rotated_position(&self, node: NodeId) -> Point {
        self.rotation.apply(self.board().position(node))
    }

    /// The node drawn under `(x, y)`, if any.
    pub fn node_at(&self, x: f64, y: f64) -> Option<NodeId> {
        let click = Point::new(x, y);
        self.board()
            .ids()
            .find(|&id| self.rotated_position(id).distance(click) <= HIT_RADIUS)
    }

    /// Board edges for drawing connections.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.board().edges()
    }

    pub fn pieces(&self) -> Vec<(NodeId, Piece)> {
        self.state.occupancy().pieces().collect()
    }

    /// Every node the piece on `label` can reach this turn.
    pub fn legal_destinations(&self, label: &str) -> Result<Vec<NodeId>, GameError> {
        let node = self.node_id(label)?;
        Ok(self.state.rules().destinations(node))
    }

    pub fn scores(&self) -> Vec<u32> {
        self.state.scores()
    }

    /// "<name>'s turn".
    pub fn turn_label(&self) -> String {
        format!("{}'s turn", self.current_player().name)
    }

    /// Winner announcement once the game is over.
    pub fn outcome_message(&self) -> Option<String> {
        self.state
            .outcome()
            .map(|outcome| outcome.condition.message(&self.state.player(outcome.winner).name))
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Select one of the current human player's pieces and return where it
    /// can go. A rejected selection clears the previous one.
    #[instrument(skip(self))]
    pub fn select_node(&mut self, label: &str) -> Result<Vec<NodeId>, GameError> {
        let result = self.try_select(label);
        if result.is_err() {
            self.selected = None;
        }
        result
    }

    fn try_select(&mut self, label: &str) -> Result<Vec<NodeId>, GameError> {
        self.check_human_turn()?;
        let node = self.node_id(label)?;
        match self.state.occupancy().owner(node) {
            None => return Err(GameError::illegal(IllegalMoveReason::EmptySource)),
            Some(owner) if owner != self.state.current() => {
                return Err(GameError::illegal(IllegalMoveReason::NotOwned))
            }
            Some(_) => {}
        }
        self.selected = Some(node);
        Ok(self.state.rules().destinations(node))
    }

    /// Move the current human player's piece from `source` to `dest`, as a
    /// jump when one is available. A rejected attempt clears the selection.
    #[instrument(skip(self))]
    pub fn attempt_move(&mut self, source: &str, dest: &str) -> Result<AppliedMove, GameError> {
        let result = self.try_move(source, dest);
        self.selected = None;
        result
    }

    /// Two-click input: pick a piece, then a destination.
    #[instrument(skip(self))]
    pub fn click_node(&mut self, label: &str) -> ClickResult {
        let Some(node) = self.board().node_id(label) else {
            return ClickResult::Ignored;
        };
        if self.check_human_turn().is_err() {
            return ClickResult::Ignored;
        }
        let current = self.state.current();
        let owner = self.state.occupancy().owner(node);

        if owner == Some(current) {
            self.selected = Some(node);
            return ClickResult::Selected {
                node,
                destinations: self.state.rules().destinations(node),
            };
        }
        let (Some(source), None) = (self.selected, owner) else {
            return ClickResult::Ignored;
        };
        let resolved = self.state.rules().resolve(source, node);
        match resolved {
            Some(mv) => match self.state.apply_move(mv) {
                Ok(applied) => {
                    self.selected = None;
                    self.last_move = Some(applied);
                    ClickResult::Moved(applied)
                }
                Err(_) => ClickResult::Ignored,
            },
            None => {
                self.selected = None;
                ClickResult::Cleared
            }
        }
    }

    /// Click at canvas coordinates.
    pub fn click_at(&mut self, x: f64, y: f64) -> ClickResult {
        match self.node_at(x, y) {
            Some(node) => {
                let label = self.board().label(node).to_string();
                self.click_node(&label)
            }
            None => ClickResult::Ignored,
        }
    }

    /// Hand the turn to the next player. Also how a stuck player passes.
    #[instrument(skip(self))]
    pub fn advance(&mut self) -> Result<TurnStart, GameError> {
        let start = self.controller.advance(&mut self.state)?;
        self.begin_turn();
        Ok(start)
    }

    /// Let the current computer player move or pass.
    #[instrument(skip(self))]
    pub fn play_computer_turn(&mut self) -> Result<ComputerTurn, GameError> {
        let turn = self.controller.play_computer_turn(&mut self.state)?;
        match turn {
            ComputerTurn::Moved(applied) => self.last_move = Some(applied),
            ComputerTurn::Passed { .. } => self.begin_turn(),
        }
        Ok(turn)
    }

    /// Start over with the same setup.
    #[instrument(skip(self))]
    pub fn reset_game(&mut self) -> Result<(), GameError> {
        self.state = new_state(&self.config)?;
        self.rotation = RotationView::new(self.config.enable_rotation);
        self.last_move = None;
        self.begin_turn();
        info!("game reset");
        Ok(())
    }

    /// Replace the setup and start a new game. The old game is kept if
    /// `config` is invalid.
    #[instrument(skip(self, config))]
    pub fn new_game(&mut self, config: SessionConfig) -> Result<(), GameError> {
        let state = new_state(&config)?;
        self.state = state;
        self.config = config;
        self.rotation = RotationView::new(self.config.enable_rotation);
        self.last_move = None;
        self.begin_turn();
        info!(players = self.config.player_count, "new game");
        Ok(())
    }

    pub fn set_rotation(&mut self, enabled: bool) {
        self.config.enable_rotation = enabled;
        self.rotation.enabled = enabled;
        let count = self.board().player_count();
        let area = self.state.current_player().area;
        self.rotation.face(count, area);
    }

    // ------------------------------------------------------------------------

    fn try_move(&mut self, source: &str, dest: &str) -> Result<AppliedMove, GameError> {
        self.check_human_turn()?;
        let source = self.node_id(source)?;
        let dest = self.node_id(dest)?;
        let mv = self.state.resolve_move(source, dest)?;
        let applied = self.state.apply_move(mv)?;
        self.last_move = Some(applied);
        Ok(applied)
    }

    fn check_human_turn(&self) -> Result<(), GameError> {
        match self.state.phase() {
            Phase::GameOver(_) => Err(GameError::GameAlreadyOver),
            Phase::MoveAccepted => Err(GameError::illegal(IllegalMoveReason::NotYourTurn)),
            Phase::InTurn if !self.state.current_player().is_human() => {
                Err(GameError::illegal(IllegalMoveReason::NotYourTurn))
            }
            Phase::InTurn => Ok(()),
        }
    }

    /// Reset the transient UI state for the player now up: face the board
    /// toward them and pre-select a human's first piece that can move, or
    /// their first piece when none can.
    fn begin_turn(&mut self) {
        let count = self.board().player_count();
        let player = self.state.current_player();
        let (area, human, id) = (player.area, player.is_human(), player.id);
        self.rotation.face(count, area);
        self.selected = None;
        if human && !self.state.is_over() {
            let rules = self.state.rules();
            let mut pieces = self.state.occupancy().nodes_of(id);
            let first = pieces.next();
            self.selected = first
                .into_iter()
                .chain(pieces)
                .find(|&node| !rules.legal_moves(node).is_empty())
                .or(first);
        }
    }
}

fn new_state(config: &SessionConfig) -> Result<GameState, GameError> {
    let (count, players) = config.seat()?;
    GameState::new(Board::generate(count), players)
}
