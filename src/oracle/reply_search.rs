//! Bounded iterative deepening search with negamax alpha-beta pruning.
//!
//! Deepens one ply at a time up to the depth budget. Every visited node is
//! charged against the node budget; once it is spent, the iteration in
//! progress is abandoned and the result of the last completed depth stands.

use rand::prelude::IndexedRandom;
use rand::Rng;
use shakmaty::{Chess, Move as ChessMove, MoveList, Position};

use crate::oracle::board_scoring::{BoardScorer, MATE_SCORE};
use crate::oracle::oracle_trait::SearchBudget;

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub best_move: Option<ChessMove>,
    pub best_score: i32,
    pub reached_depth: u8,
    pub nodes: u64,
}

struct NodeCounter {
    nodes: u64,
    limit: u64,
}

impl NodeCounter {
    #[inline]
    fn charge(&mut self) -> bool {
        self.nodes += 1;
        self.nodes <= self.limit
    }

    #[inline]
    fn exhausted(&self) -> bool {
        self.nodes > self.limit
    }
}

/// Legal moves whose whole physical effect is one piece lifted from one
/// square and placed on another. Castling and en passant also move or
/// remove a second piece, so they are left out.
pub fn lift_and_place_moves(position: &Chess) -> MoveList {
    let mut moves = position.legal_moves();
    moves.retain(|m| !matches!(m, ChessMove::Castle { .. } | ChessMove::EnPassant { .. }));
    moves
}

pub fn iterative_deepening_search<S: BoardScorer, R: Rng>(
    position: &Chess,
    scorer: &S,
    budget: SearchBudget,
    rng: &mut R,
) -> SearchResult {
    let mut result = SearchResult::default();
    if budget.max_depth == 0 {
        result.best_score = scorer.score(position);
        result.nodes = 1;
        return result;
    }

    let mut counter = NodeCounter {
        nodes: 0,
        limit: budget.max_nodes.max(1),
    };

    for depth in 1..=budget.max_depth {
        let Some((candidates, score)) = negamax_root(position, scorer, depth, &mut counter) else {
            break;
        };
        if counter.exhausted() && result.reached_depth > 0 {
            break;
        }

        result.best_move = candidates.as_slice().choose(rng).cloned();
        result.best_score = score;
        result.reached_depth = depth;

        if counter.exhausted() {
            break;
        }
    }

    result.nodes = counter.nodes;
    result
}

/// Returns every root move sharing the best score. `None` when the side to
/// move has no legal moves.
fn negamax_root<S: BoardScorer>(
    position: &Chess,
    scorer: &S,
    depth: u8,
    counter: &mut NodeCounter,
) -> Option<(Vec<ChessMove>, i32)> {
    let moves = lift_and_place_moves(position);
    if moves.is_empty() {
        return None;
    }
    counter.charge();

    let mut best_score = -MATE_SCORE - 1;
    let mut best_moves = Vec::new();

    for mv in &moves {
        let Ok(next) = position.clone().play(mv.clone()) else {
            continue;
        };
        // Full window at the root so equal-scored moves are really equal.
        let score = -negamax(
            &next,
            scorer,
            depth - 1,
            -MATE_SCORE - 1,
            MATE_SCORE + 1,
            1,
            counter,
        );

        if score > best_score {
            best_score = score;
            best_moves.clear();
            best_moves.push(mv.clone());
        } else if score == best_score {
            best_moves.push(mv.clone());
        }
    }

    Some((best_moves, best_score))
}

fn negamax<S: BoardScorer>(
    position: &Chess,
    scorer: &S,
    depth: u8,
    mut alpha: i32,
    beta: i32,
    ply: u8,
    counter: &mut NodeCounter,
) -> i32 {
    let within_budget = counter.charge();

    let moves = lift_and_place_moves(position);
    if moves.is_empty() {
        return terminal_score(position, ply);
    }
    if depth == 0 || !within_budget {
        return scorer.score(position);
    }

    let mut best = -MATE_SCORE - 1;

    for mv in &moves {
        let Ok(next) = position.clone().play(mv.clone()) else {
            continue;
        };
        let score = -negamax(
            &next,
            scorer,
            depth - 1,
            -beta,
            -alpha,
            ply.saturating_add(1),
            counter,
        );

        best = best.max(score);
        alpha = alpha.max(score);
        if alpha >= beta || counter.exhausted() {
            break;
        }
    }

    best
}

fn terminal_score(position: &Chess, ply: u8) -> i32 {
    if position.is_check() {
        -MATE_SCORE + i32::from(ply)
    } else {
        0
    }
}
