//! Terminal renderers for the sensor bitmap and the oracle's pieces.

use crate::board::occupancy::OccupancyBitmap;
use crate::board::square::Square;
use crate::oracle::oracle_trait::{BoardPiece, LegalityOracle, PieceColor, PieceKind};

/// Render the sensor occupancy, `X` for present and `.` for empty.
pub fn render_occupancy(bitmap: OccupancyBitmap) -> String {
    render_with(|square| {
        if bitmap.is_occupied(square) {
            'X'
        } else {
            '.'
        }
    })
}

/// Render the oracle's position with Unicode piece glyphs.
pub fn render_oracle_board<O: LegalityOracle>(oracle: &O) -> String {
    render_with(|square| match oracle.piece_at(square) {
        Some(piece) => piece_to_unicode(piece),
        None => '·',
    })
}

fn render_with(mut cell: impl FnMut(Square) -> char) -> String {
    let mut out = String::new();

    out.push_str("  a b c d e f g h\n");

    for rank in (0..8u8).rev() {
        out.push(char::from(b'1' + rank));
        out.push(' ');

        for file in 0..8u8 {
            match Square::new(file, rank) {
                Ok(square) => out.push(cell(square)),
                Err(_) => out.push('?'),
            }
            if file < 7 {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(char::from(b'1' + rank));
        out.push('\n');
    }

    out.push_str("  a b c d e f g h");

    out
}

fn piece_to_unicode(piece: BoardPiece) -> char {
    match (piece.color, piece.kind) {
        (PieceColor::White, PieceKind::Pawn) => '♙',
        (PieceColor::White, PieceKind::Knight) => '♘',
        (PieceColor::White, PieceKind::Bishop) => '♗',
        (PieceColor::White, PieceKind::Rook) => '♖',
        (PieceColor::White, PieceKind::Queen) => '♕',
        (PieceColor::White, PieceKind::King) => '♔',
        (PieceColor::Black, PieceKind::Pawn) => '♟',
        (PieceColor::Black, PieceKind::Knight) => '♞',
        (PieceColor::Black, PieceKind::Bishop) => '♝',
        (PieceColor::Black, PieceKind::Rook) => '♜',
        (PieceColor::Black, PieceKind::Queen) => '♛',
        (PieceColor::Black, PieceKind::King) => '♚',
    }
}

#[cfg(test)]
mod tests {
    use super::{render_occupancy, render_oracle_board};
    use crate::board::occupancy::OccupancyBitmap;
    use crate::oracle::shakmaty_oracle::ShakmatyOracle;

    #[test]
    fn occupancy_render_shows_home_ranks() {
        let text = render_occupancy(OccupancyBitmap::STARTING);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[1], "8 X X X X X X X X 8");
        assert_eq!(lines[5], "4 . . . . . . . . 4");
        assert_eq!(lines[8], "1 X X X X X X X X 1");
    }

    #[test]
    fn oracle_render_uses_piece_glyphs() {
        let text = render_oracle_board(&ShakmatyOracle::with_seed(1));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "8 ♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜ 8");
        assert_eq!(lines[8], "1 ♖ ♘ ♗ ♕ ♔ ♗ ♘ ♖ 1");
    }
}
