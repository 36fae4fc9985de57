//! Occupancy diffing.
//!
//! A human move is recognised only when exactly two squares change: one
//! going present -> empty (origin) and one going empty -> present
//! (destination). Any other delta (one square, three or more, or two squares
//! changing the same way) is reported as `None`; castling, en passant and
//! captures fall in that bucket and are not detected.

use crate::board::occupancy::OccupancyBitmap;
use crate::board::square::Move;

/// Pure and deterministic; safe to call on every poll.
pub fn detect(previous: OccupancyBitmap, current: OccupancyBitmap) -> Option<Move> {
    let changed = previous.changed_squares(current);
    if changed.len() != 2 {
        return None;
    }

    let mut origin = None;
    let mut destination = None;
    for square in changed {
        if previous.is_occupied(square) {
            // present -> empty
            if origin.replace(square).is_some() {
                return None;
            }
        } else if destination.replace(square).is_some() {
            return None;
        }
    }

    Some(Move::between(origin?, destination?))
}
