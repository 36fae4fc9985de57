//! Gantry stand-in for simulation: moves pieces on the simulated sensor.

use tracing::debug;

use crate::board::occupancy::OccupancyBitmap;
use crate::board::square::Move;
use crate::errors::{ChessGantryError, ChessGantryResult};
use crate::sensors::simulated_sensor::SimulatedSensor;

#[derive(Debug, Clone, Copy, Default)]
pub struct MotionSimulator;

impl MotionSimulator {
    /// Realize `mv` by lifting its piece and placing it on the target square.
    pub fn execute_move(&self, sensor: &mut SimulatedSensor, mv: Move) -> ChessGantryResult<()> {
        if !mv.is_valid() {
            return Err(ChessGantryError::InvalidMove(mv));
        }
        let (from, to) = mv.squares()?;
        sensor.lift_and_place(from, to);
        debug!(%mv, "simulated move executed");
        Ok(())
    }

    /// Put the board back to a known bitmap after a rejected move.
    pub fn restore(&self, sensor: &mut SimulatedSensor, state_before_move: OccupancyBitmap) {
        sensor.load_bitmap(state_before_move);
        debug!(?state_before_move, "simulated board restored");
    }
}
