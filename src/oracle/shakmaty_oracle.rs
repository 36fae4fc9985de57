//! Legality oracle backed by the `shakmaty` rules crate.
//!
//! Translates between engine coordinates and `shakmaty` squares and collapses
//! promotion choices to a single from/to pair (auto-queen). Only moves a
//! lift-and-place can express are offered: castling and en passant are not.

use rand::rngs::StdRng;
use rand::SeedableRng;
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Color, File, Move as ChessMove, Position, Rank, Role};
use tracing::debug;

use crate::board::square::{Move, Square};
use crate::errors::{ChessGantryError, ChessGantryResult};
use crate::oracle::board_scoring::MaterialScorer;
use crate::oracle::oracle_trait::{
    BoardPiece, LegalityOracle, PieceColor, PieceKind, SearchBudget,
};
use crate::oracle::reply_search::{iterative_deepening_search, lift_and_place_moves};

pub struct ShakmatyOracle {
    position: Chess,
    scorer: MaterialScorer,
    rng: StdRng,
}

impl ShakmatyOracle {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Deterministic tie-breaking between equally scored replies.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            position: Chess::default(),
            scorer: MaterialScorer,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_fen(fen: &str, seed: u64) -> ChessGantryResult<Self> {
        let setup = fen
            .parse::<Fen>()
            .map_err(|e| ChessGantryError::InvalidFen(format!("'{fen}': {e}")))?;
        let position = setup
            .into_position(CastlingMode::Standard)
            .map_err(|e| ChessGantryError::InvalidFen(format!("illegal position '{fen}': {e}")))?;
        Ok(Self {
            position,
            ..Self::with_seed(seed)
        })
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    /// The legal `shakmaty` move matching `mv`, preferring a queen promotion.
    fn find_legal(&self, mv: Move) -> Option<ChessMove> {
        let (from, to) = mv.squares().ok()?;
        let (from, to) = (to_chess_square(from), to_chess_square(to));
        lift_and_place_moves(&self.position)
            .into_iter()
            .filter(|m| move_endpoints(m) == Some((from, to)))
            .find(|m| matches!(m.promotion(), None | Some(Role::Queen)))
    }

    fn to_engine_move(m: &ChessMove) -> Move {
        move_endpoints(m)
            .and_then(|(from, to)| {
                Some(Move::between(
                    from_chess_square(from)?,
                    from_chess_square(to)?,
                ))
            })
            .unwrap_or(Move::INVALID)
    }
}

impl Default for ShakmatyOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl LegalityOracle for ShakmatyOracle {
    fn init_position(&mut self) {
        self.position = Chess::default();
    }

    fn enumerate_legal_moves(&self) -> Vec<Move> {
        let mut out = Vec::new();
        for m in &lift_and_place_moves(&self.position) {
            let mv = Self::to_engine_move(m);
            if mv.is_valid() && !out.contains(&mv) {
                out.push(mv);
            }
        }
        out
    }

    fn apply_move(&mut self, mv: Move) -> bool {
        let Some(legal) = self.find_legal(mv) else {
            return false;
        };
        match self.position.clone().play(legal) {
            Ok(next) => {
                self.position = next;
                true
            }
            Err(_) => false,
        }
    }

    fn search_best_reply(&mut self, budget: SearchBudget) -> Move {
        let result = iterative_deepening_search(&self.position, &self.scorer, budget, &mut self.rng);
        debug!(
            depth = result.reached_depth,
            nodes = result.nodes,
            score = result.best_score,
            "reply search finished"
        );
        result
            .best_move
            .as_ref()
            .map(Self::to_engine_move)
            .unwrap_or(Move::INVALID)
    }

    /// Also over when the only legal moves cannot be made on the board.
    fn is_game_over(&self) -> bool {
        self.position.is_game_over() || lift_and_place_moves(&self.position).is_empty()
    }

    fn piece_at(&self, square: Square) -> Option<BoardPiece> {
        self.position
            .board()
            .piece_at(to_chess_square(square))
            .map(|piece| BoardPiece {
                kind: match piece.role {
                    Role::Pawn => PieceKind::Pawn,
                    Role::Knight => PieceKind::Knight,
                    Role::Bishop => PieceKind::Bishop,
                    Role::Rook => PieceKind::Rook,
                    Role::Queen => PieceKind::Queen,
                    Role::King => PieceKind::King,
                },
                color: match piece.color {
                    Color::White => PieceColor::White,
                    Color::Black => PieceColor::Black,
                },
            })
    }
}

fn to_chess_square(square: Square) -> shakmaty::Square {
    shakmaty::Square::from_coords(
        File::new(u32::from(square.file())),
        Rank::new(u32::from(square.rank())),
    )
}

fn from_chess_square(square: shakmaty::Square) -> Option<Square> {
    // a1 == 0, file-fastest
    let index = square as u8;
    Square::new(index % 8, index / 8).ok()
}

fn move_endpoints(m: &ChessMove) -> Option<(shakmaty::Square, shakmaty::Square)> {
    match m {
        ChessMove::Normal { from, to, .. } => Some((*from, *to)),
        _ => None,
    }
}
