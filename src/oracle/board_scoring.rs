//! Static evaluation used by the reply search.

use shakmaty::{Chess, Color, Position, Role};

pub const MATE_SCORE: i32 = 30000;

pub trait BoardScorer {
    /// Score from the perspective of the side to move.
    fn score(&self, position: &Chess) -> i32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl MaterialScorer {
    #[inline]
    pub const fn piece_value(role: Role) -> i32 {
        match role {
            Role::Pawn => 100,
            Role::Knight => 320,
            Role::Bishop => 330,
            Role::Rook => 500,
            Role::Queen => 900,
            Role::King => 0,
        }
    }

    fn material_balance_white_minus_black(position: &Chess) -> i32 {
        let board = position.board();
        let mut score = 0i32;

        for role in [
            Role::Pawn,
            Role::Knight,
            Role::Bishop,
            Role::Rook,
            Role::Queen,
        ] {
            let value = Self::piece_value(role);
            let white_count = (board.by_role(role) & board.by_color(Color::White)).count() as i32;
            let black_count = (board.by_role(role) & board.by_color(Color::Black)).count() as i32;
            score += (white_count - black_count) * value;
        }

        score
    }
}

impl BoardScorer for MaterialScorer {
    fn score(&self, position: &Chess) -> i32 {
        let white_minus_black = Self::material_balance_white_minus_black(position);
        match position.turn() {
            Color::White => white_minus_black,
            Color::Black => -white_minus_black,
        }
    }
}

#[cfg(test)]
mod tests {
    use shakmaty::fen::Fen;
    use shakmaty::{CastlingMode, Chess};

    use super::{BoardScorer, MaterialScorer};

    fn position(fen: &str) -> Chess {
        fen.parse::<Fen>()
            .expect("FEN should parse")
            .into_position(CastlingMode::Standard)
            .expect("FEN should be a legal position")
    }

    #[test]
    fn starting_position_is_balanced() {
        assert_eq!(MaterialScorer.score(&Chess::default()), 0);
    }

    #[test]
    fn score_is_relative_to_side_to_move() {
        let white_up_a_queen = "4k3/8/8/8/8/8/8/3QK3 w - - 0 1";
        let black_to_move = "4k3/8/8/8/8/8/8/3QK3 b - - 0 1";
        assert_eq!(MaterialScorer.score(&position(white_up_a_queen)), 900);
        assert_eq!(MaterialScorer.score(&position(black_to_move)), -900);
    }
}
