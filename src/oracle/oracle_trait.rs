//! Legality oracle abstraction.
//!
//! The oracle owns the authoritative chess position. The reconciler only ever
//! talks to it through this trait, in engine coordinates, so any rules engine
//! can sit behind it.

use crate::board::square::{Move, Square};
use crate::config::{ENGINE_DEPTH_BUDGET, ENGINE_NODE_BUDGET};

/// Search limits for the engine reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudget {
    pub max_nodes: u64,
    pub max_depth: u8,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_nodes: ENGINE_NODE_BUDGET,
            max_depth: ENGINE_DEPTH_BUDGET,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceColor {
    White,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardPiece {
    pub kind: PieceKind,
    pub color: PieceColor,
}

pub trait LegalityOracle {
    /// Reset to the standard starting position.
    fn init_position(&mut self);

    /// Legal moves of the side to move, one entry per distinct from/to pair.
    fn enumerate_legal_moves(&self) -> Vec<Move>;

    /// Play `mv` on the live position. Returns false (position untouched) if
    /// it is not legal.
    fn apply_move(&mut self, mv: Move) -> bool;

    /// Best reply for the side to move, or `Move::INVALID` when there is none.
    /// Does not change the live position.
    fn search_best_reply(&mut self, budget: SearchBudget) -> Move;

    fn is_game_over(&self) -> bool;

    fn piece_at(&self, square: Square) -> Option<BoardPiece>;
}
