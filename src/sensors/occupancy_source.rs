//! Pluggable occupancy input.

use crate::board::occupancy::OccupancyBitmap;

/// Anything that can report the board occupancy: a reed-switch/hall matrix
/// driver, or the in-memory simulation.
pub trait OccupancySource {
    fn read_occupancy(&mut self) -> OccupancyBitmap;
}
