//! Which piece, if any, stands on each node.

use serde::Serialize;

use crate::player::{Color, Player, PlayerId};
use crate::topology::{Board, NodeId};

/// A piece on the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize)]
pub struct Piece {
    pub owner: PlayerId,
    /// Copied from the owner for rendering.
    pub color: Color,
}

/// Occupancy of every node, indexed by [`NodeId`].
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct BoardState {
    cells: Vec<Option<Piece>>,
}

impl BoardState {
    /// All `len` nodes empty.
    pub fn empty(len: usize) -> BoardState {
        BoardState {
            cells: vec![None; len],
        }
    }

    /// Starting position: every node of a player's home area holds one of
    /// their pieces.
    pub fn initial(board: &Board, players: &[Player]) -> BoardState {
        let mut state = BoardState::empty(board.len());
        for player in players {
            for id in board.area_nodes(player.area) {
                state.place(
                    id,
                    Piece {
                        owner: player.id,
                        color: player.color,
                    },
                );
            }
        }
        state
    }

    /// Number of nodes covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<Piece> {
        self.cells[id.index()]
    }

    #[inline]
    pub fn is_vacant(&self, id: NodeId) -> bool {
        self.cells[id.index()].is_none()
    }

    #[inline]
    pub fn owner(&self, id: NodeId) -> Option<PlayerId> {
        self.cells[id.index()].map(|p| p.owner)
    }

    /// Put a piece on a node, replacing whatever was there.
    #[inline]
    pub fn place(&mut self, id: NodeId, piece: Piece) {
        self.cells[id.index()] = Some(piece);
    }

    /// Remove and return the piece on a node.
    #[inline]
    pub fn take(&mut self, id: NodeId) -> Option<Piece> {
        self.cells[id.index()].take()
    }

    /// Occupied nodes with their pieces, in board order.
    pub fn pieces(&self) -> impl Iterator<Item = (NodeId, Piece)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.map(|piece| (NodeId(i as u8), piece)))
    }

    /// Nodes holding `player`'s pieces, in board order.
    pub fn nodes_of(&self, player: PlayerId) -> impl Iterator<Item = NodeId> + '_ {
        self.pieces()
            .filter(move |(_, piece)| piece.owner == player)
            .map(|(id, _)| id)
    }

    /// Piece count per seat for `player_count` seats.
    pub fn counts(&self, player_count: usize) -> Vec<usize> {
        let mut counts = vec![0; player_count];
        for (_, piece) in self.pieces() {
            if let Some(slot) = counts.get_mut(piece.owner.index()) {
                *slot += 1;
            }
        }
        counts
    }

    /// Total pieces on the board.
    pub fn total(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}
