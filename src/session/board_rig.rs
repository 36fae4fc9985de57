//! Physical (or simulated) board hardware as seen by the session loop.
//!
//! A rig reads occupancy and can drag one piece from square to square. It is
//! used to realize engine replies, to put back a rejected human move and to
//! play typed human moves.

use tracing::warn;

use crate::board::occupancy::OccupancyBitmap;
use crate::board::square::Move;
use crate::config::GantryConfig;
use crate::errors::ChessGantryResult;
use crate::motion::gantry_driver::GantryDriver;
use crate::motion::gantry_io::GantryIo;
use crate::motion::motion_simulator::MotionSimulator;
use crate::sensors::occupancy_source::OccupancySource;
use crate::sensors::simulated_sensor::SimulatedSensor;

pub trait BoardRig {
    fn read_occupancy(&mut self) -> OccupancyBitmap;

    /// Physically move the piece on `mv.from` to `mv.to`.
    fn drag_piece(&mut self, mv: Move) -> ChessGantryResult<()>;

    /// Return the board to `state_before_move` after `attempted` was rejected.
    fn restore(
        &mut self,
        attempted: Move,
        state_before_move: OccupancyBitmap,
    ) -> ChessGantryResult<()>;
}

/// Pure software rig: the sensor is a bitmap and moves are edits to it.
#[derive(Debug, Clone, Default)]
pub struct SimulatedRig {
    sensor: SimulatedSensor,
    simulator: MotionSimulator,
}

impl SimulatedRig {
    pub fn new(sensor: SimulatedSensor) -> Self {
        Self {
            sensor,
            simulator: MotionSimulator,
        }
    }

    pub fn sensor_mut(&mut self) -> &mut SimulatedSensor {
        &mut self.sensor
    }
}

impl BoardRig for SimulatedRig {
    fn read_occupancy(&mut self) -> OccupancyBitmap {
        self.sensor.read_occupancy()
    }

    fn drag_piece(&mut self, mv: Move) -> ChessGantryResult<()> {
        self.simulator.execute_move(&mut self.sensor, mv)
    }

    fn restore(
        &mut self,
        _attempted: Move,
        state_before_move: OccupancyBitmap,
    ) -> ChessGantryResult<()> {
        self.simulator.restore(&mut self.sensor, state_before_move);
        Ok(())
    }
}

/// Gantry rig. `H` owns both the motor pins and the occupancy sensor.
pub struct GantryRig<H: GantryIo + OccupancySource> {
    driver: GantryDriver<H>,
}

impl<H: GantryIo + OccupancySource> GantryRig<H> {
    pub fn new(hardware: H, config: GantryConfig) -> Self {
        Self {
            driver: GantryDriver::new(hardware, config),
        }
    }

    pub fn driver(&self) -> &GantryDriver<H> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut GantryDriver<H> {
        &mut self.driver
    }
}

impl<H: GantryIo + OccupancySource> BoardRig for GantryRig<H> {
    fn read_occupancy(&mut self) -> OccupancyBitmap {
        self.driver.io_mut().read_occupancy()
    }

    fn drag_piece(&mut self, mv: Move) -> ChessGantryResult<()> {
        self.driver.ensure_homed()?;
        self.driver.execute_move(mv)
    }

    fn restore(
        &mut self,
        attempted: Move,
        state_before_move: OccupancyBitmap,
    ) -> ChessGantryResult<()> {
        // Detected moves are single lift-and-place pairs, so dragging the
        // piece back is enough to reach the pre-move bitmap.
        self.driver.ensure_homed()?;
        self.driver.execute_move(Move::new(attempted.to, attempted.from))?;
        let now = self.read_occupancy();
        if now != state_before_move {
            warn!(?now, ?state_before_move, "board still differs after restore");
        }
        Ok(())
    }
}
