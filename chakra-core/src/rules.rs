//! Move legality: slides to empty neighbours and single straight-line jump
//! captures.
//!
//! Jumps are found geometrically. The 3- and 4-player boards mix triangular
//! and square cells, so "the node opposite the one you jump over" is the
//! common neighbour that lies on the straight segment between source and
//! landing, within [`COLLINEAR_TOLERANCE`](crate::geometry::COLLINEAR_TOLERANCE).

use serde::{Deserialize, Serialize};

use crate::geometry::is_collinear_and_between;
use crate::occupancy::BoardState;
use crate::player::PlayerId;
use crate::topology::{Board, NodeId};

/// A move.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Move {
    /// Step to an empty neighbour.
    Simple { source: NodeId, dest: NodeId },
    /// Leap over the opposing piece on `captured`, removing it.
    Jump {
        source: NodeId,
        dest: NodeId,
        captured: NodeId,
    },
}

impl Move {
    #[inline]
    pub fn source(&self) -> NodeId {
        match self {
            Move::Simple { source, .. } | Move::Jump { source, .. } => *source,
        }
    }

    #[inline]
    pub fn dest(&self) -> NodeId {
        match self {
            Move::Simple { dest, .. } | Move::Jump { dest, .. } => *dest,
        }
    }

    /// The node whose piece this move removes, if any.
    #[inline]
    pub fn captured(&self) -> Option<NodeId> {
        match self {
            Move::Simple { .. } => None,
            Move::Jump { captured, .. } => Some(*captured),
        }
    }

    #[inline]
    pub fn is_jump(&self) -> bool {
        matches!(self, Move::Jump { .. })
    }
}

/// Read-only view used to compute legal moves for a position.
#[derive(Clone, Copy)]
pub struct MoveRules<'a> {
    board: &'a Board,
    occupancy: &'a BoardState,
}

impl<'a> MoveRules<'a> {
    pub fn new(board: &'a Board, occupancy: &'a BoardState) -> MoveRules<'a> {
        debug_assert_eq!(board.len(), occupancy.len());
        MoveRules { board, occupancy }
    }

    /// Empty neighbours of `node`, in adjacency order.
    pub fn simple_moves(&self, node: NodeId) -> Vec<NodeId> {
        self.board
            .neighbors(node)
            .iter()
            .copied()
            .filter(|&n| self.occupancy.is_vacant(n))
            .collect()
    }

    /// The node captured by jumping from `source` to `dest`, if that jump is
    /// legal.
    ///
    /// Requires a piece on `source`, an empty `dest`, and a common neighbour
    /// holding another player's piece that lies between them on a straight
    /// line.
    pub fn jump_target(&self, source: NodeId, dest: NodeId) -> Option<NodeId> {
        let mover = self.occupancy.owner(source)?;
        if source == dest || !self.occupancy.is_vacant(dest) {
            return None;
        }
        let from = self.board.position(source);
        let to = self.board.position(dest);
        self.board.neighbors(source).iter().copied().find(|&mid| {
            self.board.is_adjacent(mid, dest)
                && is_collinear_and_between(from, self.board.position(mid), to)
                && matches!(self.occupancy.owner(mid), Some(owner) if owner != mover)
        })
    }

    /// Every move for the piece on `node`: slides first, then jumps, each in
    /// board order. Empty when `node` holds no piece.
    pub fn legal_moves(&self, node: NodeId) -> Vec<Move> {
        if self.occupancy.is_vacant(node) {
            return Vec::new();
        }
        let mut moves: Vec<Move> = self
            .simple_moves(node)
            .into_iter()
            .map(|dest| Move::Simple { source: node, dest })
            .collect();
        for dest in self.board.ids() {
            if dest == node || !self.occupancy.is_vacant(dest) {
                continue;
            }
            if let Some(captured) = self.jump_target(node, dest) {
                moves.push(Move::Jump {
                    source: node,
                    dest,
                    captured,
                });
            }
        }
        moves
    }

    /// Moves for every piece `player` owns.
    pub fn legal_moves_for_player(&self, player: PlayerId) -> Vec<Move> {
        self.occupancy
            .nodes_of(player)
            .flat_map(|node| self.legal_moves(node))
            .collect()
    }

    /// Distinct destinations reachable from `node`, in the order first seen.
    pub fn destinations(&self, node: NodeId) -> Vec<NodeId> {
        let mut dests: Vec<NodeId> = Vec::new();
        for mv in self.legal_moves(node) {
            if !dests.contains(&mv.dest()) {
                dests.push(mv.dest());
            }
        }
        dests
    }

    /// Resolve a `(source, dest)` intent into a move: a jump when one exists,
    /// otherwise a slide to an empty neighbour.
    pub fn resolve(&self, source: NodeId, dest: NodeId) -> Option<Move> {
        if let Some(captured) = self.jump_target(source, dest) {
            return Some(Move::Jump {
                source,
                dest,
                captured,
            });
        }
        let slide = self.occupancy.get(source).is_some()
            && self.occupancy.is_vacant(dest)
            && self.board.is_adjacent(source, dest);
        slide.then_some(Move::Simple { source, dest })
    }
}
