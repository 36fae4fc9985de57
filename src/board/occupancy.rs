//! Occupancy snapshots read from the sensor board.
//!
//! One bit per square, indexed by `BitIndex`. Polarity is inverted:
//! a **clear** bit means a piece is present, a **set** bit means empty.
//! The move detector relies on this polarity.

use std::fmt;

use crate::board::square::{BitIndex, Square};

/// Immutable 64-bit occupancy snapshot. Copied, never aliased.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OccupancyBitmap(u64);

impl OccupancyBitmap {
    /// Canonical starting position: ranks 1, 2, 7 and 8 occupied.
    ///
    /// Within each file byte the bits for ranks 8,7 (bits 0,1) and 2,1
    /// (bits 6,7) are clear, ranks 3..6 are set.
    pub const STARTING: OccupancyBitmap = OccupancyBitmap(0x3C3C_3C3C_3C3C_3C3C);

    /// Every square empty.
    pub const EMPTY_BOARD: OccupancyBitmap = OccupancyBitmap(u64::MAX);

    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_occupied(self, square: Square) -> bool {
        self.0 & square.bit_index().mask() == 0
    }

    /// Copy with `square` marked occupied.
    #[inline]
    pub const fn with_piece(self, square: Square) -> Self {
        Self(self.0 & !square.bit_index().mask())
    }

    /// Copy with `square` marked empty.
    #[inline]
    pub const fn without_piece(self, square: Square) -> Self {
        Self(self.0 | square.bit_index().mask())
    }

    /// Copy with the occupancy of `square` flipped.
    #[inline]
    pub const fn toggled(self, square: Square) -> Self {
        Self(self.0 ^ square.bit_index().mask())
    }

    /// Squares whose bit differs between `self` and `other`, in bit order.
    pub fn changed_squares(self, other: OccupancyBitmap) -> Vec<Square> {
        let mut changed = self.0 ^ other.0;
        let mut out = Vec::with_capacity(changed.count_ones() as usize);
        while changed != 0 {
            let bit = changed.trailing_zeros() as u8;
            if let Ok(index) = BitIndex::new(bit) {
                out.push(Square::from_bit_index(index));
            }
            changed &= changed - 1;
        }
        out
    }

    pub fn occupied_count(self) -> u32 {
        self.0.count_zeros()
    }
}

impl Default for OccupancyBitmap {
    fn default() -> Self {
        Self::STARTING
    }
}

impl fmt::Debug for OccupancyBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OccupancyBitmap({:#018x})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::OccupancyBitmap;
    use crate::board::square::algebraic_to_square;

    #[test]
    fn starting_bitmap_marks_home_ranks_present() {
        let start = OccupancyBitmap::STARTING;
        assert_eq!(start.occupied_count(), 32);
        for name in ["a1", "e2", "h2", "d7", "h8"] {
            let sq = algebraic_to_square(name).expect("square should parse");
            assert!(start.is_occupied(sq), "{name} should be occupied");
        }
        for name in ["a3", "e4", "e5", "h6"] {
            let sq = algebraic_to_square(name).expect("square should parse");
            assert!(!start.is_occupied(sq), "{name} should be empty");
        }
    }

    #[test]
    fn present_means_bit_clear() {
        let e4 = algebraic_to_square("e4").expect("e4 should parse");
        let board = OccupancyBitmap::EMPTY_BOARD.with_piece(e4);
        assert_eq!(board.raw(), u64::MAX & !e4.bit_index().mask());
        assert!(board.is_occupied(e4));
        assert_eq!(board.without_piece(e4), OccupancyBitmap::EMPTY_BOARD);
        assert_eq!(board.toggled(e4), OccupancyBitmap::EMPTY_BOARD);
    }

    #[test]
    fn changed_squares_lists_every_flipped_bit() {
        let e2 = algebraic_to_square("e2").expect("e2 should parse");
        let e4 = algebraic_to_square("e4").expect("e4 should parse");
        let after = OccupancyBitmap::STARTING.without_piece(e2).with_piece(e4);

        let mut changed = OccupancyBitmap::STARTING.changed_squares(after);
        changed.sort_by_key(|sq| sq.bit_index());
        assert_eq!(changed, vec![e4, e2]);
        assert!(after.changed_squares(after).is_empty());
    }
}
