//! Chakra Web API
//!
//! Serves one in-memory game session to the browser page that draws the
//! board. The page posts selections, clicks and moves; the server paces
//! computer turns and turn changes with the configured delays, so between
//! human moves the page only polls `GET /game`.
//!
//! ```text
//!   human move ──► MoveAccepted ──(turn_advance)──► next player
//!                                                    │
//!                       computer? ──(computer_think / pass)──► move or pass
//!                       human?    ──► wait for POST /move, /click or /pass
//! ```

mod config;

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use chakra_core::{
    AppliedMove, Area, Board, ClickResult, ComputerTurn, Controller, GameSession,
    NodeId, Phase, RotationView, SessionConfig, WinCondition,
};

use config::{PacingConfig, ServerConfig};

// =============================================================================
// Session State
// =============================================================================

/// Shared application state
struct AppStateInner {
    session: Mutex<GameSession>,
    pacing: PacingConfig,
    /// Bumped whenever the turn flow restarts; a driver task only acts while
    /// its generation is current.
    generation: AtomicU64,
}

type AppState = Arc<AppStateInner>;

impl AppStateInner {
    fn new(session: GameSession, pacing: PacingConfig) -> Self {
        AppStateInner {
            session: Mutex::new(session),
            pacing,
            generation: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GameSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// JSON Models
// =============================================================================

#[derive(Debug, Serialize)]
struct PlayerModel {
    id: u8,
    name: String,
    controller: Controller,
    color: &'static str,
    area: Area,
    target: Area,
    score: u32,
    pieces: usize,
}

#[derive(Debug, Serialize)]
struct NodeModel {
    label: String,
    /// Drawing position, rotation applied
    x: f64,
    y: f64,
    area: Option<Area>,
    owner: Option<u8>,
    color: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct MoveModel {
    player: u8,
    source: String,
    dest: String,
    captured: Option<String>,
    /// "move" or "jump", for the sound cue
    cue: &'static str,
}

#[derive(Debug, Serialize)]
struct GameStateModel {
    player_count: u8,
    players: Vec<PlayerModel>,
    nodes: Vec<NodeModel>,
    edges: Vec<[String; 2]>,
    current_player: u8,
    /// "in_turn", "move_accepted" or "game_over"
    status: &'static str,
    /// Current player has no legal move and must pass
    stuck: bool,
    turn_label: String,
    selected: Option<String>,
    destinations: Vec<String>,
    rotation: RotationView,
    #[serde(skip_serializing_if = "Option::is_none")]
    winner: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    win_condition: Option<WinCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    last_move: Option<MoveModel>,
    turns: u32,
}

#[derive(Debug, Serialize)]
struct ClickModel {
    /// "ignored", "selected", "moved" or "cleared"
    result: &'static str,
    game: GameStateModel,
}

#[derive(Debug, Serialize)]
struct DestinationsModel {
    node: String,
    destinations: Vec<String>,
}

#[derive(Deserialize)]
struct MoveRequest {
    source: String,
    dest: String,
}

#[derive(Deserialize)]
struct SelectRequest {
    node: String,
}

/// Either a node label or canvas coordinates
#[derive(Deserialize)]
struct ClickRequest {
    node: Option<String>,
    x: Option<f64>,
    y: Option<f64>,
}

#[derive(Deserialize)]
struct RotationRequest {
    enabled: bool,
}

#[derive(Serialize)]
struct HealthModel {
    status: String,
}

#[derive(Debug, Serialize)]
struct ErrorModel {
    detail: String,
}

type ApiError = (StatusCode, Json<ErrorModel>);

fn bad_request(detail: impl ToString) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorModel {
            detail: detail.to_string(),
        }),
    )
}

// =============================================================================
// Conversion Functions
// =============================================================================

fn labels(board: &Board, ids: &[NodeId]) -> Vec<String> {
    ids.iter().map(|&id| board.label(id).to_string()).collect()
}

/// Convert an applied move to its JSON model
fn move_to_model(board: &Board, applied: &AppliedMove) -> MoveModel {
    MoveModel {
        player: applied.player.0,
        source: board.label(applied.mv.source()).to_string(),
        dest: board.label(applied.mv.dest()).to_string(),
        captured: applied.mv.captured().map(|id| board.label(id).to_string()),
        cue: if applied.is_capture() { "jump" } else { "move" },
    }
}

/// Convert the session to a JSON-serializable GameStateModel
fn session_to_model(session: &GameSession) -> GameStateModel {
    let state = session.state();
    let board = session.board();
    let counts = state.piece_counts();

    let players = session
        .players()
        .iter()
        .map(|p| PlayerModel {
            id: p.id.0,
            name: p.name.clone(),
            controller: p.controller,
            color: p.color.name(),
            area: p.area,
            target: p.target,
            score: p.score,
            pieces: counts[p.id.index()],
        })
        .collect();

    let nodes = board
        .ids()
        .map(|id| {
            let pos = session.rotated_position(id);
            let piece = state.occupancy().get(id);
            NodeModel {
                label: board.label(id).to_string(),
                x: pos.x,
                y: pos.y,
                area: board.area(id),
                owner: piece.map(|p| p.owner.0),
                color: piece.map(|p| p.color.name()),
            }
        })
        .collect();

    let edges = session
        .edges()
        .into_iter()
        .map(|(a, b)| [board.label(a).to_string(), board.label(b).to_string()])
        .collect();

    let status = match session.phase() {
        Phase::InTurn => "in_turn",
        Phase::MoveAccepted => "move_accepted",
        Phase::GameOver(_) => "game_over",
    };

    let destinations = session
        .selected()
        .map(|id| labels(board, &state.rules().destinations(id)))
        .unwrap_or_default();

    let outcome = state.outcome();

    GameStateModel {
        player_count: board.player_count().into(),
        players,
        nodes,
        edges,
        current_player: state.current().0,
        status,
        stuck: session.turn_start().stuck,
        turn_label: session.turn_label(),
        selected: session.selected().map(|id| board.label(id).to_string()),
        destinations,
        rotation: session.rotation(),
        winner: outcome.map(|o| o.winner.0),
        win_condition: outcome.map(|o| o.condition),
        message: session.outcome_message(),
        last_move: session.last_move().map(|m| move_to_model(board, &m)),
        turns: state.turns(),
    }
}

fn click_to_name(result: &ClickResult) -> &'static str {
    match result {
        ClickResult::Ignored => "ignored",
        ClickResult::Selected { .. } => "selected",
        ClickResult::Moved(_) => "moved",
        ClickResult::Cleared => "cleared",
    }
}

// =============================================================================
// Turn Driver
// =============================================================================

/// Automatic step the server takes next
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Advance,
    ComputerTurn,
}

/// What to do next and how long to wait first. `None` when the game is
/// over or a human has to act.
fn next_step(session: &GameSession, pacing: &PacingConfig) -> Option<(Step, Duration)> {
    match session.phase() {
        Phase::GameOver(_) => None,
        Phase::MoveAccepted => Some((Step::Advance, pacing.turn_advance())),
        Phase::InTurn if session.current_player().is_human() => None,
        Phase::InTurn if session.turn_start().stuck => Some((Step::ComputerTurn, pacing.pass())),
        Phase::InTurn => Some((Step::ComputerTurn, pacing.computer_think())),
    }
}

/// Run automatic steps until a human is up or the game ends.
async fn drive(state: AppState, generation: u64) {
    loop {
        let next = {
            let session = state.lock();
            next_step(&session, &state.pacing)
        };
        let Some((step, delay)) = next else {
            return;
        };
        tokio::time::sleep(delay).await;

        let result = {
            let mut session = state.lock();
            if state.generation.load(Ordering::SeqCst) != generation {
                debug!(generation, "turn driver superseded");
                return;
            }
            match step {
                Step::Advance => session.advance().map(|start| {
                    debug!(player = %start.player, stuck = start.stuck, "turn advanced");
                }),
                Step::ComputerTurn => session.play_computer_turn().map(|turn| match turn {
                    ComputerTurn::Moved(applied) => {
                        debug!(player = %applied.player, capture = applied.is_capture(), "computer moved")
                    }
                    ComputerTurn::Passed { player } => debug!(player = %player, "computer passed"),
                }),
            }
        };
        if let Err(err) = result {
            warn!(%err, "turn driver stopped");
            return;
        }
    }
}

/// Restart the turn driver for the current session state.
fn kick(state: &AppState) {
    let generation = state.generation.fetch_add(1, Ordering::SeqCst) + 1;
    tokio::spawn(drive(state.clone(), generation));
}

// =============================================================================
// API Endpoints
// =============================================================================

async fn get_game(State(state): State<AppState>) -> Json<GameStateModel> {
    let session = state.lock();
    Json(session_to_model(&session))
}

async fn new_game(
    State(state): State<AppState>,
    Json(config): Json<SessionConfig>,
) -> Result<Json<GameStateModel>, ApiError> {
    let model = {
        let mut session = state.lock();
        session.new_game(config).map_err(bad_request)?;
        session_to_model(&session)
    };
    kick(&state);
    Ok(Json(model))
}

async fn reset_game(State(state): State<AppState>) -> Result<Json<GameStateModel>, ApiError> {
    let model = {
        let mut session = state.lock();
        session.reset_game().map_err(bad_request)?;
        session_to_model(&session)
    };
    kick(&state);
    Ok(Json(model))
}

async fn select_node(
    State(state): State<AppState>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<GameStateModel>, ApiError> {
    let mut session = state.lock();
    session.select_node(&req.node).map_err(bad_request)?;
    Ok(Json(session_to_model(&session)))
}

async fn make_move(
    State(state): State<AppState>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<GameStateModel>, ApiError> {
    let model = {
        let mut session = state.lock();
        session.attempt_move(&req.source, &req.dest).map_err(bad_request)?;
        session_to_model(&session)
    };
    kick(&state);
    Ok(Json(model))
}

async fn click(
    State(state): State<AppState>,
    Json(req): Json<ClickRequest>,
) -> Result<Json<ClickModel>, ApiError> {
    let (result, game) = {
        let mut session = state.lock();
        let result = match (req.node, req.x, req.y) {
            (Some(node), _, _) => session.click_node(&node),
            (None, Some(x), Some(y)) => session.click_at(x, y),
            _ => return Err(bad_request("Must specify node or x and y")),
        };
        (result, session_to_model(&session))
    };
    if matches!(result, ClickResult::Moved(_)) {
        kick(&state);
    }
    Ok(Json(ClickModel {
        result: click_to_name(&result),
        game,
    }))
}

/// A stuck human gives up their turn
async fn pass_turn(State(state): State<AppState>) -> Result<Json<GameStateModel>, ApiError> {
    let model = {
        let mut session = state.lock();
        if !session.awaiting_human() {
            return Err(bad_request("Not waiting for a human player"));
        }
        session.advance().map_err(bad_request)?;
        session_to_model(&session)
    };
    kick(&state);
    Ok(Json(model))
}

async fn set_rotation(
    State(state): State<AppState>,
    Json(req): Json<RotationRequest>,
) -> Json<GameStateModel> {
    let mut session = state.lock();
    session.set_rotation(req.enabled);
    Json(session_to_model(&session))
}

async fn get_destinations(
    State(state): State<AppState>,
    Path(node): Path<String>,
) -> Result<Json<DestinationsModel>, ApiError> {
    let session = state.lock();
    let ids = session.legal_destinations(&node).map_err(bad_request)?;
    Ok(Json(DestinationsModel {
        destinations: labels(session.board(), &ids),
        node,
    }))
}

async fn health() -> Json<HealthModel> {
    Json(HealthModel {
        status: "ok".to_string(),
    })
}

fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/game", get(get_game).post(new_game))
        .route("/reset", post(reset_game))
        .route("/select", post(select_node))
        .route("/move", post(make_move))
        .route("/click", post(click))
        .route("/pass", post(pass_turn))
        .route("/rotation", post(set_rotation))
        .route("/destinations/{node}", get(get_destinations))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("chakra.toml"));
    let config = ServerConfig::load_or_default(&path)?;
    config.validate()?;
    let addr = config.bind_addr()?;

    let session = GameSession::new(config.session.clone())?;
    let state: AppState = Arc::new(AppStateInner::new(session, config.pacing.clone()));
    kick(&state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Chakra API running");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pacing long enough that no automatic step fires during a test.
    fn frozen() -> PacingConfig {
        PacingConfig {
            computer_think_ms: 60_000,
            turn_advance_ms: 60_000,
            pass_ms: 60_000,
        }
    }

    fn test_state(players: u8, humans: u8, pacing: PacingConfig) -> AppState {
        let session = GameSession::new(SessionConfig::with_defaults(players, humans)).unwrap();
        Arc::new(AppStateInner::new(session, pacing))
    }

    fn move_req(source: &str, dest: &str) -> Json<MoveRequest> {
        Json(MoveRequest {
            source: source.to_string(),
            dest: dest.to_string(),
        })
    }

    fn node<'a>(game: &'a GameStateModel, label: &str) -> &'a NodeModel {
        game.nodes.iter().find(|n| n.label == label).unwrap()
    }

    #[tokio::test]
    async fn test_get_game_initial() {
        let state = test_state(2, 2, frozen());
        let Json(game) = get_game(State(state)).await;

        assert_eq!(game.player_count, 2);
        assert_eq!(game.nodes.len(), 13);
        assert_eq!(game.edges.len(), 20);
        assert_eq!(game.status, "in_turn");
        assert_eq!(game.current_player, 0);
        assert_eq!(game.turn_label, "Player 1's turn");
        assert_eq!(game.selected.as_deref(), Some("T4"));
        assert_eq!(game.destinations, vec!["G"]);
        assert_eq!(game.players[1].color, "red");
        assert_eq!(game.players[1].pieces, 6);
        assert_eq!(node(&game, "T5").owner, Some(0));
        assert_eq!(node(&game, "G").owner, None);
        assert!(game.last_move.is_none());
    }

    #[tokio::test]
    async fn test_make_move() {
        let state = test_state(2, 2, frozen());
        let Json(game) = make_move(State(state.clone()), move_req("T5", "G")).await.unwrap();

        assert_eq!(game.status, "move_accepted");
        assert_eq!(node(&game, "G").owner, Some(0));
        assert_eq!(node(&game, "T5").owner, None);
        let last = game.last_move.unwrap();
        assert_eq!(last.cue, "move");
        assert_eq!(last.captured, None);

        // Still the mover's turn until the driver advances.
        let (status, Json(err)) = make_move(State(state), move_req("B5", "B2")).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err.detail, "illegal move: not this player's turn");
    }

    #[tokio::test]
    async fn test_illegal_move_rejected() {
        let state = test_state(2, 2, frozen());
        let (status, Json(err)) = make_move(State(state.clone()), move_req("B5", "G"))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err.detail, "illegal move: piece belongs to another player");

        let (_, Json(err)) = make_move(State(state.clone()), move_req("T1", "G")).await.unwrap_err();
        assert_eq!(err.detail, "illegal move: destination is not reachable");

        let Json(game) = get_game(State(state)).await;
        assert_eq!(game.status, "in_turn");
        assert_eq!(game.selected, None);
    }

    #[tokio::test]
    async fn test_click_flow() {
        let state = test_state(2, 2, frozen());
        let req = |node: &str| {
            Json(ClickRequest {
                node: Some(node.to_string()),
                x: None,
                y: None,
            })
        };

        let Json(model) = click(State(state.clone()), req("T5")).await.unwrap();
        assert_eq!(model.result, "selected");
        assert_eq!(model.game.destinations, vec!["G"]);

        // G at (300, 300).
        let at = Json(ClickRequest {
            node: None,
            x: Some(302.0),
            y: Some(298.0),
        });
        let Json(model) = click(State(state.clone()), at).await.unwrap();
        assert_eq!(model.result, "moved");
        assert_eq!(model.game.status, "move_accepted");

        let empty = Json(ClickRequest {
            node: None,
            x: Some(1.0),
            y: None,
        });
        assert!(click(State(state), empty).await.is_err());
    }

    #[tokio::test]
    async fn test_select_and_destinations() {
        let state = test_state(2, 2, frozen());
        let Json(game) = select_node(
            State(state.clone()),
            Json(SelectRequest {
                node: "T4".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(game.selected.as_deref(), Some("T4"));
        assert_eq!(game.destinations, vec!["G"]);

        let Json(dests) = get_destinations(State(state.clone()), Path("T6".to_string()))
            .await
            .unwrap();
        assert_eq!(dests.destinations, vec!["G"]);

        let (_, Json(err)) = get_destinations(State(state), Path("Q1".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.detail, "illegal move: unknown node");
    }

    #[tokio::test]
    async fn test_new_game_and_invalid_config() {
        let state = test_state(2, 2, frozen());
        let (_, Json(err)) = new_game(State(state.clone()), Json(SessionConfig::with_defaults(2, 0)))
            .await
            .unwrap_err();
        assert!(err.detail.starts_with("invalid configuration"));

        let mut config = SessionConfig::with_defaults(4, 1);
        config.enable_rotation = true;
        let Json(game) = new_game(State(state), Json(config)).await.unwrap();
        assert_eq!(game.nodes.len(), 32);
        assert_eq!(game.players.len(), 4);
        assert!(game.rotation.enabled);
        // Top arm drawn at the bottom for player 0.
        assert!((node(&game, "T2").y - 550.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_pass_rejected_with_moves() {
        let state = test_state(2, 2, frozen());
        let (_, Json(err)) = pass_turn(State(state)).await.unwrap_err();
        assert_eq!(err.detail, "player 0 still has a move to make");
    }

    #[tokio::test]
    async fn test_rotation_toggle() {
        let state = test_state(4, 1, frozen());
        let Json(game) = set_rotation(State(state.clone()), Json(RotationRequest { enabled: true })).await;
        assert!(game.rotation.enabled);
        assert!((node(&game, "T2").y - 550.0).abs() < 1e-9);

        let Json(game) = set_rotation(State(state), Json(RotationRequest { enabled: false })).await;
        assert_eq!(game.rotation.angle, 0.0);
        assert_eq!(node(&game, "T2").y, 50.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_paces_turns() {
        let state = test_state(2, 1, PacingConfig::default());
        make_move(State(state.clone()), move_req("T5", "G")).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1600)).await;
        let Json(game) = get_game(State(state.clone())).await;
        assert_eq!(game.current_player, 1);
        assert_eq!(game.status, "in_turn");

        tokio::time::sleep(Duration::from_millis(500)).await;
        let Json(game) = get_game(State(state.clone())).await;
        assert_eq!(game.status, "move_accepted");
        assert_eq!(game.last_move.unwrap().player, 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        let Json(game) = get_game(State(state)).await;
        assert_eq!(game.current_player, 0);
        assert_eq!(game.status, "in_turn");
        assert_eq!(game.turns, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_supersedes_driver() {
        let state = test_state(2, 1, PacingConfig::default());
        make_move(State(state.clone()), move_req("T5", "G")).await.unwrap();
        reset_game(State(state.clone())).await.unwrap();

        tokio::time::sleep(Duration::from_millis(2000)).await;
        let Json(game) = get_game(State(state)).await;
        assert_eq!(game.current_player, 0);
        assert_eq!(game.turns, 0);
        assert_eq!(node(&game, "T5").owner, Some(0));
    }

    #[test]
    fn test_next_step() {
        let pacing = PacingConfig::default();
        let mut session = GameSession::new(SessionConfig::with_defaults(2, 1)).unwrap();
        assert_eq!(next_step(&session, &pacing), None);

        session.attempt_move("T5", "G").unwrap();
        assert_eq!(
            next_step(&session, &pacing),
            Some((Step::Advance, Duration::from_millis(1500)))
        );

        session.advance().unwrap();
        assert_eq!(
            next_step(&session, &pacing),
            Some((Step::ComputerTurn, Duration::from_millis(500)))
        );
    }
}
