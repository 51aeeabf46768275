//! Board topology: node labels, layout coordinates and the adjacency graph
//! for the 2-, 3- and 4-player boards.
//!
//! # Arm lattice
//!
//! Every home area is the same small lattice. Node 7 is the arm's outer
//! node, facing the centre of the board (the 2-player clusters have no node 7):
//!
//! ```text
//!   1 --- 2 --- 3
//!    \   / \   /
//!     4 --- 5 --- 6        (5 sits halfway between 4 and 6)
//!      \    |    /
//!       `-- 7 --'
//! ```
//!
//! # Node order
//!
//! Nodes are stored area by area (T, R, B, L as present), each area as
//! 1..=7, followed by the junction nodes (`G` or `I1`..). [`NodeId`] is the
//! index into that order.

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::geometry::{Point, BOARD_CENTER};

/// Lattice edges inside one arm, as 1-based node numbers. The first seven
/// form the 2-player cluster; the last three tie in node 7.
const ARM_EDGES: [(usize, usize); 10] = [
    (1, 2),
    (2, 3),
    (1, 4),
    (2, 5),
    (3, 6),
    (4, 5),
    (5, 6),
    (4, 7),
    (5, 7),
    (6, 7),
];

/// Number of lattice edges shared by 6-node clusters and 7-node arms.
const CLUSTER_EDGE_COUNT: usize = 7;

/// Home area of a player.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Area {
    #[serde(rename = "T")]
    Top,
    #[serde(rename = "R")]
    Right,
    #[serde(rename = "B")]
    Bottom,
    #[serde(rename = "L")]
    Left,
}

impl Area {
    /// Label prefix for nodes of this area.
    #[inline]
    pub fn letter(self) -> char {
        match self {
            Area::Top => 'T',
            Area::Right => 'R',
            Area::Bottom => 'B',
            Area::Left => 'L',
        }
    }

    /// Parse a label prefix.
    pub fn from_letter(letter: char) -> Option<Area> {
        match letter {
            'T' => Some(Area::Top),
            'R' => Some(Area::Right),
            'B' => Some(Area::Bottom),
            'L' => Some(Area::Left),
            _ => None,
        }
    }

    /// Quarter turns that carry the top arm onto this one on the 4-player
    /// board.
    #[inline]
    fn quarter_turns(self) -> u8 {
        match self {
            Area::Top => 0,
            Area::Right => 1,
            Area::Bottom => 2,
            Area::Left => 3,
        }
    }
}

impl std::fmt::Display for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Supported board sizes. Constructing one is the only place a raw player
/// count is checked.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlayerCount {
    Two = 2,
    Three = 3,
    Four = 4,
}

impl PlayerCount {
    /// Number of players.
    #[inline]
    pub fn get(self) -> usize {
        self as usize
    }

    /// Home areas in seating order (player 0 first).
    pub fn areas(self) -> &'static [Area] {
        match self {
            PlayerCount::Two => &[Area::Top, Area::Bottom],
            PlayerCount::Three => &[Area::Top, Area::Right, Area::Bottom],
            PlayerCount::Four => &[Area::Top, Area::Right, Area::Bottom, Area::Left],
        }
    }

    /// The area a player seated at `home` has to fill to win.
    ///
    /// The 3-player table sends both R and B to T.
    pub fn target_of(self, home: Area) -> Area {
        match (self, home) {
            (PlayerCount::Three, Area::Right) => Area::Top,
            (_, Area::Top) => Area::Bottom,
            (_, Area::Bottom) => Area::Top,
            (_, Area::Right) => Area::Left,
            (_, Area::Left) => Area::Right,
        }
    }
}

impl TryFrom<u8> for PlayerCount {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(PlayerCount::Two),
            3 => Ok(PlayerCount::Three),
            4 => Ok(PlayerCount::Four),
            other => Err(GameError::InvalidConfiguration(format!(
                "player_count must be 2, 3 or 4 (got {})",
                other
            ))),
        }
    }
}

impl From<PlayerCount> for u8 {
    fn from(count: PlayerCount) -> u8 {
        count as u8
    }
}

/// Index of a node within its [`Board`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u8);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A board node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    pub label: String,
    pub position: Point,
    /// `None` for junction nodes (`G`, `I1`..).
    pub area: Option<Area>,
    pub neighbors: Vec<NodeId>,
}

/// Immutable board graph for one player count.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Board {
    player_count: PlayerCount,
    nodes: Vec<Node>,
}

impl Board {
    /// Build the board for `player_count`. Deterministic.
    pub fn generate(player_count: PlayerCount) -> Board {
        let mut builder = BoardBuilder::default();
        match player_count {
            PlayerCount::Two => builder.two_player(),
            PlayerCount::Three => builder.three_player(),
            PlayerCount::Four => builder.four_player(),
        }
        Board {
            player_count,
            nodes: builder.nodes,
        }
    }

    #[inline]
    pub fn player_count(&self) -> PlayerCount {
        self.player_count
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` names a node on this board.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// All nodes in board order.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Iterate over every node id in board order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u8).map(NodeId)
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Look a node up by label.
    pub fn node_id(&self, label: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.label == label)
            .map(|i| NodeId(i as u8))
    }

    #[inline]
    pub fn label(&self, id: NodeId) -> &str {
        &self.nodes[id.index()].label
    }

    #[inline]
    pub fn position(&self, id: NodeId) -> Point {
        self.nodes[id.index()].position
    }

    #[inline]
    pub fn area(&self, id: NodeId) -> Option<Area> {
        self.nodes[id.index()].area
    }

    #[inline]
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].neighbors
    }

    #[inline]
    pub fn is_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// Nodes belonging to `area`, in board order.
    pub fn area_nodes(&self, area: Area) -> impl Iterator<Item = NodeId> + '_ {
        self.ids().filter(move |&id| self.area(id) == Some(area))
    }

    /// Every undirected edge once, as `(low, high)` id pairs.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut edges = Vec::new();
        for a in self.ids() {
            for &b in self.neighbors(a) {
                if a < b {
                    edges.push((a, b));
                }
            }
        }
        edges
    }

    /// Whether every node can reach every other node.
    pub fn is_connected(&self) -> bool {
        if self.nodes.is_empty() {
            return true;
        }
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![NodeId(0)];
        seen[0] = true;
        while let Some(id) = stack.pop() {
            for &next in self.neighbors(id) {
                if !seen[next.index()] {
                    seen[next.index()] = true;
                    stack.push(next);
                }
            }
        }
        seen.into_iter().all(|s| s)
    }
}

// ============================================================================
// Layout data
// ============================================================================

/// 2-player top cluster; the bottom cluster mirrors it across y = 300.
const TWO_PLAYER_TOP: [Point; 6] = [
    Point::new(220.0, 200.0),
    Point::new(300.0, 200.0),
    Point::new(380.0, 200.0),
    Point::new(260.0, 250.0),
    Point::new(300.0, 250.0),
    Point::new(340.0, 250.0),
];

/// 3-player arms: nodes 1, 2, 3, 4, 6 (node 5 is derived).
const THREE_PLAYER_ARMS: [(Area, [Point; 5]); 3] = [
    (
        Area::Top,
        [
            Point::new(240.0, 121.08),
            Point::new(300.0, 121.08),
            Point::new(360.0, 121.08),
            Point::new(270.0, 173.04),
            Point::new(330.0, 173.04),
        ],
    ),
    (
        Area::Right,
        [
            Point::new(485.0, 337.5),
            Point::new(455.0, 389.46),
            Point::new(425.0, 441.42),
            Point::new(425.0, 337.5),
            Point::new(395.0, 389.46),
        ],
    ),
    (
        Area::Bottom,
        [
            Point::new(175.0, 441.42),
            Point::new(145.0, 389.46),
            Point::new(115.0, 337.5),
            Point::new(205.0, 389.46),
            Point::new(175.0, 337.5),
        ],
    ),
];

/// 3-player junction triangle I1, I2, I3.
const THREE_PLAYER_JUNCTIONS: [Point; 3] = [
    Point::new(300.0, 450.0),
    Point::new(170.0, 225.0),
    Point::new(430.0, 225.0),
];

/// Canonical 4-player top arm, nodes 1..=7. The other arms are quarter turns
/// of it about the board centre.
const FOUR_PLAYER_TOP: [Point; 7] = [
    Point::new(220.0, 50.0),
    Point::new(300.0, 50.0),
    Point::new(380.0, 50.0),
    Point::new(260.0, 90.0),
    Point::new(300.0, 90.0),
    Point::new(340.0, 90.0),
    Point::new(300.0, 130.0),
];

/// 4-player corner I1 (top-left); I2..I4 follow clockwise by quarter turns.
const FOUR_PLAYER_CORNER: Point = Point::new(130.0, 130.0);

// ============================================================================
// Construction
// ============================================================================

#[derive(Default)]
struct BoardBuilder {
    nodes: Vec<Node>,
}

impl BoardBuilder {
    fn add_node(&mut self, label: String, position: Point, area: Option<Area>) -> NodeId {
        let id = NodeId(self.nodes.len() as u8);
        self.nodes.push(Node {
            label,
            position,
            area,
            neighbors: Vec::new(),
        });
        id
    }

    /// Add an undirected edge. Duplicate edges are ignored.
    fn connect(&mut self, a: NodeId, b: NodeId) {
        debug_assert_ne!(a, b);
        if !self.nodes[a.index()].neighbors.contains(&b) {
            self.nodes[a.index()].neighbors.push(b);
            self.nodes[b.index()].neighbors.push(a);
        }
    }

    /// Add the nodes of one area, labelled `<letter>1`.., and wire the
    /// lattice edges that exist among them.
    fn add_arm(&mut self, area: Area, positions: &[Point]) -> Vec<NodeId> {
        let ids: Vec<NodeId> = positions
            .iter()
            .enumerate()
            .map(|(i, &pos)| self.add_node(format!("{}{}", area.letter(), i + 1), pos, Some(area)))
            .collect();
        let edge_count = if ids.len() == 7 { ARM_EDGES.len() } else { CLUSTER_EDGE_COUNT };
        for &(a, b) in &ARM_EDGES[..edge_count] {
            self.connect(ids[a - 1], ids[b - 1]);
        }
        ids
    }

    /// Two mirrored 6-node clusters joined through the centre node `G`.
    fn two_player(&mut self) {
        let top = self.add_arm(Area::Top, &TWO_PLAYER_TOP);
        let bottom_positions = TWO_PLAYER_TOP.map(|p| Point::new(p.x, 600.0 - p.y));
        let bottom = self.add_arm(Area::Bottom, &bottom_positions);
        let center = self.add_node("G".to_string(), BOARD_CENTER, None);
        for arm in [&top, &bottom] {
            for &inner in &arm[3..6] {
                self.connect(inner, center);
            }
        }
    }

    /// Three arms whose outer nodes form a triangle, each corner of the
    /// junction triangle touching two of them.
    fn three_player(&mut self) {
        let junction = THREE_PLAYER_JUNCTIONS;
        let mut outer = Vec::with_capacity(3);
        for (area, [n1, n2, n3, n4, n6]) in THREE_PLAYER_ARMS {
            // Outer node sits halfway along the junction edge it faces.
            let n7 = match area {
                Area::Top => junction[1].midpoint(junction[2]),
                Area::Right => junction[2].midpoint(junction[0]),
                _ => junction[0].midpoint(junction[1]),
            };
            let arm = self.add_arm(area, &[n1, n2, n3, n4, n4.midpoint(n6), n6, n7]);
            outer.push(arm[6]);
        }
        let [t7, r7, b7] = [outer[0], outer[1], outer[2]];
        self.connect(t7, r7);
        self.connect(r7, b7);
        self.connect(b7, t7);

        let ids: Vec<NodeId> = junction
            .iter()
            .enumerate()
            .map(|(i, &pos)| self.add_node(format!("I{}", i + 1), pos, None))
            .collect();
        // I1 sits between B and R, I2 between B and T, I3 between T and R.
        for (i, pair) in [[b7, r7], [b7, t7], [t7, r7]].into_iter().enumerate() {
            for seven in pair {
                self.connect(ids[i], seven);
            }
        }
    }

    /// Four quarter-turned copies of the top arm, outer nodes in a ring,
    /// with a corner junction between each pair of neighbouring arms.
    fn four_player(&mut self) {
        let areas = PlayerCount::Four.areas();
        let mut outer = Vec::with_capacity(4);
        for &area in areas {
            let positions = FOUR_PLAYER_TOP.map(|p| p.quarter_turn(BOARD_CENTER, area.quarter_turns()));
            let arm = self.add_arm(area, &positions);
            outer.push(arm[6]);
        }
        for i in 0..4 {
            self.connect(outer[i], outer[(i + 1) % 4]);
        }
        // Corner i lies between arm i and the arm before it (I1 between T and L).
        for i in 0..4 {
            let pos = FOUR_PLAYER_CORNER.quarter_turn(BOARD_CENTER, i as u8);
            let corner = self.add_node(format!("I{}", i + 1), pos, None);
            self.connect(corner, outer[i]);
            self.connect(corner, outer[(i + 3) % 4]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_COUNTS: [PlayerCount; 3] = [PlayerCount::Two, PlayerCount::Three, PlayerCount::Four];

    fn id(board: &Board, label: &str) -> NodeId {
        board.node_id(label).unwrap_or_else(|| panic!("no node {}", label))
    }

    fn assert_at(board: &Board, label: &str, x: f64, y: f64) {
        let p = board.position(id(board, label));
        assert!(
            (p.x - x).abs() < 1e-6 && (p.y - y).abs() < 1e-6,
            "{} expected at ({}, {}), found {:?}",
            label,
            x,
            y,
            p
        );
    }

    fn labels(board: &Board, ids: &[NodeId]) -> Vec<String> {
        let mut out: Vec<String> = ids.iter().map(|&i| board.label(i).to_string()).collect();
        out.sort();
        out
    }

    #[test]
    fn test_player_count_try_from() {
        assert_eq!(PlayerCount::try_from(2).unwrap(), PlayerCount::Two);
        assert_eq!(PlayerCount::try_from(4).unwrap(), PlayerCount::Four);
        assert!(matches!(
            PlayerCount::try_from(1),
            Err(GameError::InvalidConfiguration(_))
        ));
        assert!(PlayerCount::try_from(5).is_err());
    }

    #[test]
    fn test_node_counts() {
        assert_eq!(Board::generate(PlayerCount::Two).len(), 13);
        assert_eq!(Board::generate(PlayerCount::Three).len(), 24);
        assert_eq!(Board::generate(PlayerCount::Four).len(), 32);
    }

    #[test]
    fn test_edge_counts() {
        // 7 + 7 cluster edges and 6 spokes to G.
        assert_eq!(Board::generate(PlayerCount::Two).edges().len(), 20);
        // 3 arms × 10, outer triangle 3, junction spokes 6.
        assert_eq!(Board::generate(PlayerCount::Three).edges().len(), 39);
        // 4 arms × 10, outer ring 4, corner spokes 8.
        assert_eq!(Board::generate(PlayerCount::Four).edges().len(), 52);
    }

    #[test]
    fn test_adjacency_symmetric() {
        for count in ALL_COUNTS {
            let board = Board::generate(count);
            for a in board.ids() {
                for &b in board.neighbors(a) {
                    assert!(
                        board.is_adjacent(b, a),
                        "{:?}: {} -> {} is one-way",
                        count,
                        board.label(a),
                        board.label(b)
                    );
                    assert_ne!(a, b, "self loop at {}", board.label(a));
                }
            }
        }
    }

    #[test]
    fn test_boards_connected() {
        for count in ALL_COUNTS {
            assert!(Board::generate(count).is_connected(), "{:?}", count);
        }
    }

    #[test]
    fn test_generate_deterministic() {
        for count in ALL_COUNTS {
            assert_eq!(Board::generate(count), Board::generate(count));
        }
    }

    #[test]
    fn test_labels_unique() {
        for count in ALL_COUNTS {
            let board = Board::generate(count);
            let mut seen = std::collections::HashSet::new();
            for node in board.nodes() {
                assert!(seen.insert(node.label.clone()), "duplicate {}", node.label);
            }
        }
    }

    #[test]
    fn test_area_matches_label_prefix() {
        for count in ALL_COUNTS {
            let board = Board::generate(count);
            for node in board.nodes() {
                let first = node.label.chars().next().unwrap();
                let expected = if node.label == "G" || first == 'I' {
                    None
                } else {
                    Area::from_letter(first)
                };
                assert_eq!(node.area, expected, "{}", node.label);
            }
        }
    }

    #[test]
    fn test_area_sizes() {
        let two = Board::generate(PlayerCount::Two);
        assert_eq!(two.area_nodes(Area::Top).count(), 6);
        assert_eq!(two.area_nodes(Area::Bottom).count(), 6);
        assert_eq!(two.area_nodes(Area::Left).count(), 0);

        let four = Board::generate(PlayerCount::Four);
        for &area in PlayerCount::Four.areas() {
            assert_eq!(four.area_nodes(area).count(), 7);
        }
    }

    #[test]
    fn test_two_player_layout() {
        let board = Board::generate(PlayerCount::Two);
        assert_at(&board, "T1", 220.0, 200.0);
        assert_at(&board, "T5", 300.0, 250.0);
        assert_at(&board, "B1", 220.0, 400.0);
        assert_at(&board, "B4", 260.0, 350.0);
        assert_at(&board, "G", 300.0, 300.0);

        let g = id(&board, "G");
        assert_eq!(
            labels(&board, board.neighbors(g)),
            vec!["B4", "B5", "B6", "T4", "T5", "T6"]
        );
        assert_eq!(labels(&board, board.neighbors(id(&board, "T2"))), vec!["T1", "T3", "T5"]);
        assert_eq!(labels(&board, board.neighbors(id(&board, "B5"))), vec!["B2", "B4", "B6", "G"]);
    }

    #[test]
    fn test_three_player_layout() {
        let board = Board::generate(PlayerCount::Three);
        assert_at(&board, "T7", 300.0, 225.0);
        assert_at(&board, "R7", 365.0, 337.5);
        assert_at(&board, "B7", 235.0, 337.5);
        assert_at(&board, "T5", 300.0, 173.04);
        assert_at(&board, "R5", 410.0, 363.48);
        assert_at(&board, "B5", 190.0, 363.48);
        assert_at(&board, "I1", 300.0, 450.0);

        assert_eq!(
            labels(&board, board.neighbors(id(&board, "T7"))),
            vec!["B7", "I2", "I3", "R7", "T4", "T5", "T6"]
        );
        assert_eq!(labels(&board, board.neighbors(id(&board, "I1"))), vec!["B7", "R7"]);
        assert_eq!(labels(&board, board.neighbors(id(&board, "I2"))), vec!["B7", "T7"]);
        assert_eq!(labels(&board, board.neighbors(id(&board, "I3"))), vec!["R7", "T7"]);
    }

    #[test]
    fn test_three_player_node_five_is_midpoint() {
        let board = Board::generate(PlayerCount::Three);
        for area in ['T', 'R', 'B'] {
            let p4 = board.position(id(&board, &format!("{}4", area)));
            let p5 = board.position(id(&board, &format!("{}5", area)));
            let p6 = board.position(id(&board, &format!("{}6", area)));
            assert_eq!(p5, p4.midpoint(p6), "{}5", area);
        }
    }

    #[test]
    fn test_four_player_layout() {
        let board = Board::generate(PlayerCount::Four);
        assert_at(&board, "T1", 220.0, 50.0);
        assert_at(&board, "T7", 300.0, 130.0);
        assert_at(&board, "R1", 550.0, 220.0);
        assert_at(&board, "R7", 470.0, 300.0);
        assert_at(&board, "B1", 380.0, 550.0);
        assert_at(&board, "B7", 300.0, 470.0);
        assert_at(&board, "L1", 50.0, 380.0);
        assert_at(&board, "L7", 130.0, 300.0);
        assert_at(&board, "I1", 130.0, 130.0);
        assert_at(&board, "I2", 470.0, 130.0);
        assert_at(&board, "I3", 470.0, 470.0);
        assert_at(&board, "I4", 130.0, 470.0);

        assert_eq!(
            labels(&board, board.neighbors(id(&board, "T7"))),
            vec!["I1", "I2", "L7", "R7", "T4", "T5", "T6"]
        );
        assert_eq!(labels(&board, board.neighbors(id(&board, "I1"))), vec!["L7", "T7"]);
        assert_eq!(labels(&board, board.neighbors(id(&board, "I3"))), vec!["B7", "R7"]);
        assert_eq!(labels(&board, board.neighbors(id(&board, "I4"))), vec!["B7", "L7"]);
    }

    #[test]
    fn test_four_player_arms_are_rotations() {
        let board = Board::generate(PlayerCount::Four);
        for &area in &[Area::Right, Area::Bottom, Area::Left] {
            for n in 1..=7 {
                let top = board.position(id(&board, &format!("T{}", n)));
                let here = board.position(id(&board, &format!("{}{}", area.letter(), n)));
                let rotated = top.rotate_about(BOARD_CENTER, area.quarter_turns() as f64 * std::f64::consts::FRAC_PI_2);
                assert!(here.distance(rotated) < 1e-9, "{}{}", area.letter(), n);
            }
        }
    }

    #[test]
    fn test_target_table() {
        assert_eq!(PlayerCount::Two.target_of(Area::Top), Area::Bottom);
        assert_eq!(PlayerCount::Two.target_of(Area::Bottom), Area::Top);

        assert_eq!(PlayerCount::Three.target_of(Area::Top), Area::Bottom);
        assert_eq!(PlayerCount::Three.target_of(Area::Right), Area::Top);
        assert_eq!(PlayerCount::Three.target_of(Area::Bottom), Area::Top);

        assert_eq!(PlayerCount::Four.target_of(Area::Top), Area::Bottom);
        assert_eq!(PlayerCount::Four.target_of(Area::Right), Area::Left);
        assert_eq!(PlayerCount::Four.target_of(Area::Bottom), Area::Top);
        assert_eq!(PlayerCount::Four.target_of(Area::Left), Area::Right);
    }

    #[test]
    fn test_targets_never_home() {
        for count in ALL_COUNTS {
            for &area in count.areas() {
                assert_ne!(count.target_of(area), area);
            }
        }
    }
}
