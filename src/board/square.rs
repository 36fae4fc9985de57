//! Square encodings and long algebraic conversions.
//!
//! Two encodings coexist and are kept distinct:
//! - `BitIndex`: file-major index into the occupancy bitmap,
//!   `bit = file * 8 + (7 - rank)`, so `a8 == 0`, `a1 == 7`, `h1 == 63`.
//! - `EngineCoord`: 0x88-style coordinate used by the legality oracle,
//!   `coord = (7 - rank) * 16 + file`, so `a8 == 0x00` and `a1 == 0x70`.
//!   `EngineCoord::INVALID` (`0x80`) is the "no square" sentinel.
//!
//! `Square` (file and rank, both zero-based) is the pivot between them and
//! long algebraic notation such as `e4`.

use std::fmt;

use crate::errors::{ChessGantryError, ChessGantryResult};

/// One board cell. `file` 0 is the a-file, `rank` 0 is the first rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    file: u8,
    rank: u8,
}

/// File-major occupancy bit index (`0..=63`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitIndex(u8);

/// 0x88 engine coordinate, as consumed by the legality oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineCoord(u8);

impl Square {
    pub fn new(file: u8, rank: u8) -> ChessGantryResult<Self> {
        if file > 7 || rank > 7 {
            return Err(ChessGantryError::SquareOutOfRange { file, rank });
        }
        Ok(Self { file, rank })
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.file
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    #[inline]
    pub const fn bit_index(self) -> BitIndex {
        BitIndex(self.file * 8 + (7 - self.rank))
    }

    #[inline]
    pub const fn engine_coord(self) -> EngineCoord {
        EngineCoord((7 - self.rank) * 16 + self.file)
    }

    pub fn from_bit_index(index: BitIndex) -> Self {
        Self {
            file: index.0 / 8,
            rank: 7 - index.0 % 8,
        }
    }

    pub fn from_engine_coord(coord: EngineCoord) -> ChessGantryResult<Self> {
        if !coord.is_on_board() {
            return Err(ChessGantryError::InvalidEngineCoord(coord.0));
        }
        Ok(Self {
            file: coord.0 & 0x07,
            rank: 7 - (coord.0 >> 4),
        })
    }

    /// Every square, a1 first, file-fastest.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|rank| (0..8u8).map(move |file| Square { file, rank }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            char::from(b'a' + self.file),
            char::from(b'1' + self.rank)
        )
    }
}

impl BitIndex {
    pub fn new(index: u8) -> ChessGantryResult<Self> {
        if index > 63 {
            return Err(ChessGantryError::InvalidBitIndex(index));
        }
        Ok(Self(index))
    }

    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn mask(self) -> u64 {
        1u64 << self.0
    }
}

impl EngineCoord {
    pub const INVALID: EngineCoord = EngineCoord(0x80);

    /// Wrap a raw coordinate as reported by the oracle. No validation; use
    /// `is_on_board` before converting.
    #[inline]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_on_board(self) -> bool {
        self.0 & 0x88 == 0
    }
}

/// Convert long algebraic notation (for example: "e4") to a square.
pub fn algebraic_to_square(square: &str) -> ChessGantryResult<Square> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessGantryError::InvalidAlgebraic(square.to_owned()));
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ChessGantryError::InvalidAlgebraic(square.to_owned()));
    }

    Square::new(file - b'a', rank - b'1')
}

#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    square.to_string()
}

/// A from/to pair in engine coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: EngineCoord,
    pub to: EngineCoord,
}

impl Move {
    /// "No move": game over or nothing detected.
    pub const INVALID: Move = Move {
        from: EngineCoord::INVALID,
        to: EngineCoord::INVALID,
    };

    #[inline]
    pub const fn new(from: EngineCoord, to: EngineCoord) -> Self {
        Self { from, to }
    }

    pub fn between(from: Square, to: Square) -> Self {
        Self::new(from.engine_coord(), to.engine_coord())
    }

    /// Both endpoints are real squares and differ.
    pub fn is_valid(self) -> bool {
        self.from.is_on_board() && self.to.is_on_board() && self.from != self.to
    }

    pub fn squares(self) -> ChessGantryResult<(Square, Square)> {
        if !self.is_valid() {
            return Err(ChessGantryError::InvalidMove(self));
        }
        Ok((
            Square::from_engine_coord(self.from)?,
            Square::from_engine_coord(self.to)?,
        ))
    }

    /// Parse a four character token such as `e2e4`.
    pub fn from_long_algebraic(token: &str) -> ChessGantryResult<Self> {
        if token.len() != 4 || !token.is_ascii() {
            return Err(ChessGantryError::InvalidAlgebraic(token.to_owned()));
        }
        let from = algebraic_to_square(&token[0..2])?;
        let to = algebraic_to_square(&token[2..4])?;
        Ok(Self::between(from, to))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.squares() {
            Ok((from, to)) => write!(f, "{from}{to}"),
            Err(_) => write!(f, "0000"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{algebraic_to_square, square_to_algebraic, BitIndex, EngineCoord, Move, Square};

    #[test]
    fn bit_index_layout_is_file_major_from_rank_eight() {
        let a8 = algebraic_to_square("a8").expect("a8 should parse");
        let a1 = algebraic_to_square("a1").expect("a1 should parse");
        let h1 = algebraic_to_square("h1").expect("h1 should parse");
        let e2 = algebraic_to_square("e2").expect("e2 should parse");
        assert_eq!(a8.bit_index().value(), 0);
        assert_eq!(a1.bit_index().value(), 7);
        assert_eq!(h1.bit_index().value(), 63);
        assert_eq!(e2.bit_index().value(), 4 * 8 + 6);
    }

    #[test]
    fn engine_coords_are_0x88_with_rank_eight_on_row_zero() {
        let a1 = algebraic_to_square("a1").expect("a1 should parse");
        let h8 = algebraic_to_square("h8").expect("h8 should parse");
        assert_eq!(a1.engine_coord().value(), 0x70);
        assert_eq!(h8.engine_coord().value(), 0x07);
        assert!(!EngineCoord::INVALID.is_on_board());
        assert!(Square::from_engine_coord(EngineCoord::from_raw(0x08)).is_err());
    }

    #[test]
    fn every_bit_index_round_trips_through_algebraic() {
        for i in 0..64u8 {
            let index = BitIndex::new(i).expect("index in range");
            let square = Square::from_bit_index(index);
            let text = square_to_algebraic(square);
            let parsed = algebraic_to_square(&text).expect("rendered square should parse");
            assert_eq!(parsed.bit_index(), index, "round trip failed for {text}");
        }
    }

    #[test]
    fn encodings_are_collision_free() {
        let mut bits = std::collections::HashSet::new();
        let mut coords = std::collections::HashSet::new();
        for square in Square::all() {
            assert!(bits.insert(square.bit_index()));
            assert!(coords.insert(square.engine_coord()));
            let back = Square::from_engine_coord(square.engine_coord()).expect("on board");
            assert_eq!(back, square);
        }
        assert_eq!(bits.len(), 64);
        assert_eq!(coords.len(), 64);
    }

    #[test]
    fn rejects_malformed_algebraic() {
        assert!(algebraic_to_square("i1").is_err());
        assert!(algebraic_to_square("a9").is_err());
        assert!(algebraic_to_square("e").is_err());
        assert!(BitIndex::new(64).is_err());
        assert!(Move::from_long_algebraic("e2e").is_err());
        assert!(Move::from_long_algebraic("E2E4").is_err());
    }

    #[test]
    fn move_validity_and_display() {
        let e2e4 = Move::from_long_algebraic("e2e4").expect("e2e4 should parse");
        assert!(e2e4.is_valid());
        assert_eq!(e2e4.to_string(), "e2e4");
        assert!(!Move::INVALID.is_valid());
        assert_eq!(Move::INVALID.to_string(), "0000");

        let e2 = algebraic_to_square("e2").expect("e2 should parse");
        assert!(!Move::between(e2, e2).is_valid());
    }
}
