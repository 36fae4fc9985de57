//! In-memory sensor used by the simulation rig and tests.
//!
//! Holds a bitmap that commands and the motion simulator edit directly.

use crate::board::occupancy::OccupancyBitmap;
use crate::board::square::Square;
use crate::sensors::occupancy_source::OccupancySource;

#[derive(Debug, Clone, Default)]
pub struct SimulatedSensor {
    bitmap: OccupancyBitmap,
}

impl SimulatedSensor {
    /// Starts with the canonical starting position.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bitmap(bitmap: OccupancyBitmap) -> Self {
        Self { bitmap }
    }

    /// Lift whatever stands on `from` and put a piece on `to`.
    #[inline]
    pub fn lift_and_place(&mut self, from: Square, to: Square) {
        self.bitmap = self.bitmap.without_piece(from).with_piece(to);
    }

    #[inline]
    pub fn toggle(&mut self, square: Square) {
        self.bitmap = self.bitmap.toggled(square);
    }

    /// Replace the whole board, e.g. to roll back a rejected move.
    #[inline]
    pub fn load_bitmap(&mut self, bitmap: OccupancyBitmap) {
        self.bitmap = bitmap;
    }
}

impl OccupancySource for SimulatedSensor {
    fn read_occupancy(&mut self) -> OccupancyBitmap {
        self.bitmap
    }
}

#[cfg(test)]
mod tests {
    use super::SimulatedSensor;
    use crate::board::occupancy::OccupancyBitmap;
    use crate::board::square::algebraic_to_square;
    use crate::sensors::occupancy_source::OccupancySource;

    #[test]
    fn lift_and_place_moves_one_piece() {
        let e2 = algebraic_to_square("e2").expect("e2 should parse");
        let e4 = algebraic_to_square("e4").expect("e4 should parse");
        let mut sensor = SimulatedSensor::new();
        sensor.lift_and_place(e2, e4);

        let read = sensor.read_occupancy();
        assert!(!read.is_occupied(e2));
        assert!(read.is_occupied(e4));
        assert_eq!(read.occupied_count(), 32);

        sensor.load_bitmap(OccupancyBitmap::STARTING);
        assert_eq!(sensor.read_occupancy(), OccupancyBitmap::STARTING);
    }
}
