//! Modelled gantry table for dry runs and tests.
//!
//! Each axis has a physical carriage position; the limit switch reads active
//! at or below zero unless it is marked broken. Delays are recorded, not
//! slept, and every magnet drag is logged as engage/release positions.
//!
//! The table also carries pieces: a drag that starts and ends on square
//! centres moves the piece in the table's occupancy bitmap, which the
//! table reports as its sensor reading.

use std::time::Duration;

use crate::board::occupancy::OccupancyBitmap;
use crate::config::GantryGeometry;
use crate::motion::gantry_io::{Axis, Direction, GantryIo};
use crate::motion::motion_planner::{MotionPlanner, StepTarget};
use crate::sensors::occupancy_source::OccupancySource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagnetDrag {
    pub engaged_at: StepTarget,
    pub released_at: StepTarget,
}

#[derive(Debug, Clone)]
pub struct SimulatedGantry {
    physical: [i32; 2],
    direction: [Direction; 2],
    limit_broken: [bool; 2],
    magnet_engaged_at: Option<StepTarget>,
    drags: Vec<MagnetDrag>,
    pulses: u64,
    elapsed: Duration,
    planner: MotionPlanner,
    board: OccupancyBitmap,
}

impl SimulatedGantry {
    /// Carriage starts at `start` steps from the switches.
    pub fn new(start: StepTarget) -> Self {
        Self::with_geometry(start, GantryGeometry::default())
    }

    /// `geometry` must match the driver's so drags land on square centres.
    pub fn with_geometry(start: StepTarget, geometry: GantryGeometry) -> Self {
        Self {
            physical: [start.x, start.y],
            direction: [Direction::TowardHome; 2],
            limit_broken: [false; 2],
            magnet_engaged_at: None,
            drags: Vec::new(),
            pulses: 0,
            elapsed: Duration::ZERO,
            planner: MotionPlanner::new(geometry),
            board: OccupancyBitmap::STARTING,
        }
    }

    pub fn with_board(mut self, board: OccupancyBitmap) -> Self {
        self.board = board;
        self
    }

    pub fn board(&self) -> OccupancyBitmap {
        self.board
    }

    pub fn set_limit_broken(&mut self, axis: Axis, broken: bool) {
        self.limit_broken[axis.index()] = broken;
    }

    pub fn physical_position(&self) -> StepTarget {
        StepTarget {
            x: self.physical[0],
            y: self.physical[1],
        }
    }

    pub fn magnet_engaged(&self) -> bool {
        self.magnet_engaged_at.is_some()
    }

    pub fn drags(&self) -> &[MagnetDrag] {
        &self.drags
    }

    /// Remove and return the logged drags.
    pub fn take_drags(&mut self) -> Vec<MagnetDrag> {
        std::mem::take(&mut self.drags)
    }

    pub fn pulse_count(&self) -> u64 {
        self.pulses
    }

    /// Total simulated time spent in pulses and settle delays.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl Default for SimulatedGantry {
    fn default() -> Self {
        Self::new(StepTarget { x: 750, y: 900 })
    }
}

impl GantryIo for SimulatedGantry {
    fn set_direction(&mut self, axis: Axis, direction: Direction) {
        self.direction[axis.index()] = direction;
    }

    fn pulse_step(&mut self, axis: Axis, pulse_width: Duration) {
        let i = axis.index();
        match self.direction[i] {
            Direction::TowardHome => {
                // The carriage stalls against the end stop.
                if self.physical[i] > 0 {
                    self.physical[i] -= 1;
                }
            }
            Direction::AwayFromHome => self.physical[i] += 1,
        }
        self.pulses += 1;
        self.elapsed += pulse_width * 2;
    }

    fn limit_active(&mut self, axis: Axis) -> bool {
        let i = axis.index();
        !self.limit_broken[i] && self.physical[i] <= 0
    }

    fn set_magnet(&mut self, engaged: bool) {
        let here = self.physical_position();
        match (engaged, self.magnet_engaged_at) {
            (true, None) => self.magnet_engaged_at = Some(here),
            (false, Some(engaged_at)) => {
                let from = self.planner.steps_to_square(engaged_at);
                let to = self.planner.steps_to_square(here);
                if let (Some(from), Some(to)) = (from, to) {
                    if from != to && self.board.is_occupied(from) {
                        self.board = self.board.without_piece(from).with_piece(to);
                    }
                }
                self.drags.push(MagnetDrag {
                    engaged_at,
                    released_at: here,
                });
                self.magnet_engaged_at = None;
            }
            _ => {}
        }
    }

    fn settle(&mut self, delay: Duration) {
        self.elapsed += delay;
    }
}

impl OccupancySource for SimulatedGantry {
    fn read_occupancy(&mut self) -> OccupancyBitmap {
        self.board
    }
}
