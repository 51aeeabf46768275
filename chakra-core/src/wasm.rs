//! WASM bindings for chakra-core
//!
//! Wraps a [`GameSession`] so a browser page can run the game locally and
//! draw it on a canvas. Nodes cross the boundary by label.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::{ComputerTurn, GameSession, NodeId, SessionConfig};

/// WASM-friendly wrapper around GameSession
#[wasm_bindgen]
pub struct WasmGame {
    inner: GameSession,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a game from a setup object
    /// `{ player_count, human_count, names, colors, enable_rotation }`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmGame, JsError> {
        let config: SessionConfig = serde_wasm_bindgen::from_value(config)?;
        Ok(WasmGame {
            inner: GameSession::new(config)?,
        })
    }

    /// Nodes as `[{ label, x, y, area, owner, color }]`, positions rotated
    #[wasm_bindgen(js_name = nodes)]
    pub fn nodes(&self) -> Result<JsValue, JsError> {
        let occupancy = self.inner.state().occupancy();
        let nodes: Vec<NodeView> = self
            .inner
            .board()
            .ids()
            .map(|id| {
                let node = self.inner.board().node(id);
                let pos = self.inner.rotated_position(id);
                let piece = occupancy.get(id);
                NodeView {
                    label: &node.label,
                    x: pos.x,
                    y: pos.y,
                    area: node.area.map(|a| a.letter()),
                    owner: piece.map(|p| p.owner.0),
                    color: piece.map(|p| p.color.name()),
                }
            })
            .collect();
        Ok(serde_wasm_bindgen::to_value(&nodes)?)
    }

    /// Edges as pairs of labels
    pub fn edges(&self) -> Result<JsValue, JsError> {
        let board = self.inner.board();
        let edges: Vec<[&str; 2]> = self
            .inner
            .edges()
            .into_iter()
            .map(|(a, b)| [board.label(a), board.label(b)])
            .collect();
        Ok(serde_wasm_bindgen::to_value(&edges)?)
    }

    /// Label of the selected node, if any
    pub fn selected(&self) -> Option<String> {
        self.inner.selected().map(|id| self.inner.board().label(id).to_string())
    }

    /// Destinations of the piece on `label`
    #[wasm_bindgen(js_name = legalDestinations)]
    pub fn legal_destinations(&self, label: &str) -> Result<Vec<String>, JsError> {
        Ok(self.labels(&self.inner.legal_destinations(label)?))
    }

    /// Handle a click at canvas coordinates
    #[wasm_bindgen(js_name = clickAt)]
    pub fn click_at(&mut self, x: f64, y: f64) -> Result<JsValue, JsError> {
        let result = self.inner.click_at(x, y);
        Ok(serde_wasm_bindgen::to_value(&result)?)
    }

    /// Move by label; a jump is preferred when available
    #[wasm_bindgen(js_name = attemptMove)]
    pub fn attempt_move(&mut self, source: &str, dest: &str) -> Result<JsValue, JsError> {
        let applied = self.inner.attempt_move(source, dest)?;
        Ok(serde_wasm_bindgen::to_value(&applied)?)
    }

    /// Advance to the next player (after a move, or as a pass)
    pub fn advance(&mut self) -> Result<JsValue, JsError> {
        let start = self.inner.advance()?;
        Ok(serde_wasm_bindgen::to_value(&start)?)
    }

    /// Let the current computer player move or pass
    #[wasm_bindgen(js_name = playComputerTurn)]
    pub fn play_computer_turn(&mut self) -> Result<JsValue, JsError> {
        let turn: ComputerTurn = self.inner.play_computer_turn()?;
        Ok(serde_wasm_bindgen::to_value(&turn)?)
    }

    #[wasm_bindgen(js_name = resetGame)]
    pub fn reset_game(&mut self) -> Result<(), JsError> {
        Ok(self.inner.reset_game()?)
    }

    #[wasm_bindgen(js_name = setRotation)]
    pub fn set_rotation(&mut self, enabled: bool) {
        self.inner.set_rotation(enabled);
    }

    /// Whether the page should wait for a click
    #[wasm_bindgen(js_name = awaitingHuman)]
    pub fn awaiting_human(&self) -> bool {
        self.inner.awaiting_human()
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.inner.state().is_over()
    }

    #[wasm_bindgen(js_name = turnLabel)]
    pub fn turn_label(&self) -> String {
        self.inner.turn_label()
    }

    #[wasm_bindgen(js_name = currentColor)]
    pub fn current_color(&self) -> String {
        self.inner.current_player().color.name().to_string()
    }

    #[wasm_bindgen(js_name = outcomeMessage)]
    pub fn outcome_message(&self) -> Option<String> {
        self.inner.outcome_message()
    }

    pub fn scores(&self) -> Vec<u32> {
        self.inner.scores()
    }

    /// Rotation angle in radians
    pub fn angle(&self) -> f64 {
        self.inner.rotation().angle
    }
}

impl WasmGame {
    fn labels(&self, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|&id| self.inner.board().label(id).to_string())
            .collect()
    }
}

/// Serializable node for JavaScript
#[derive(Serialize)]
struct NodeView<'a> {
    label: &'a str,
    x: f64,
    y: f64,
    area: Option<char>,
    owner: Option<u8>,
    color: Option<&'static str>,
}
