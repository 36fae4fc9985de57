//! Open-loop gantry driver.
//!
//! States: `Uninitialized -> Homing(axis) -> Idle -> Moving(axis) -> Idle`.
//! A homing failure parks the driver in `Faulted(axis)`, where every motion
//! request is refused until a later `home()` succeeds.
//!
//! Homing is two-stage per axis: seek the switch with fast pulses, back off a
//! fixed number of steps, then creep back onto it with slow pulses. Each
//! approach is bounded by `HomingConfig::max_guard_steps`.
//!
//! Moves run to completion once started. The logical pose only changes after
//! all pulses of a relative move have been emitted.

use tracing::{debug, error, info, warn};

use crate::board::square::Move;
use crate::config::GantryConfig;
use crate::errors::{ChessGantryError, ChessGantryResult};
use crate::motion::gantry_io::{Axis, Direction, GantryIo};
use crate::motion::motion_planner::{MotionPlanner, StepTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Uninitialized,
    Homing(Axis),
    Idle,
    Moving(Axis),
    Faulted(Axis),
}

/// Logical carriage position in steps. Equals the sum of executed relative
/// steps since the axis was last homed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GantryPose {
    x: i32,
    y: i32,
}

impl GantryPose {
    #[inline]
    pub fn get(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    #[inline]
    fn slot(&mut self, axis: Axis) -> &mut i32 {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }

    pub fn as_target(&self) -> StepTarget {
        StepTarget {
            x: self.x,
            y: self.y,
        }
    }
}

pub struct GantryDriver<G: GantryIo> {
    io: G,
    config: GantryConfig,
    planner: MotionPlanner,
    pose: GantryPose,
    state: DriverState,
}

impl<G: GantryIo> GantryDriver<G> {
    pub fn new(io: G, config: GantryConfig) -> Self {
        Self {
            io,
            planner: MotionPlanner::new(config.geometry),
            config,
            pose: GantryPose::default(),
            state: DriverState::Uninitialized,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn pose(&self) -> GantryPose {
        self.pose
    }

    pub fn planner(&self) -> &MotionPlanner {
        &self.planner
    }

    pub fn io(&self) -> &G {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut G {
        &mut self.io
    }

    /// Home both axes, X first.
    pub fn home(&mut self) -> ChessGantryResult<()> {
        for axis in Axis::ALL {
            if let Err(err) = self.home_axis(axis) {
                self.state = DriverState::Faulted(axis);
                error!(%axis, error = %err, "homing failed, motion halted");
                return Err(err);
            }
        }
        self.state = DriverState::Idle;
        info!("gantry homed");
        Ok(())
    }

    /// Home unless already homed. A faulted driver is not retried here.
    pub fn ensure_homed(&mut self) -> ChessGantryResult<()> {
        match self.state {
            DriverState::Uninitialized => self.home(),
            DriverState::Faulted(axis) => Err(ChessGantryError::MotionHalted { axis }),
            _ => Ok(()),
        }
    }

    fn home_axis(&mut self, axis: Axis) -> ChessGantryResult<()> {
        self.state = DriverState::Homing(axis);
        let timing = self.config.timing;
        let homing = self.config.homing;

        let seek_steps = self.approach_limit(axis, timing.seek_pulse)?;
        debug!(%axis, seek_steps, "limit found, backing off");

        self.io.set_direction(axis, Direction::AwayFromHome);
        for _ in 0..homing.backoff_steps {
            self.io.pulse_step(axis, timing.creep_pulse);
        }

        let creep_steps = self.approach_limit(axis, timing.creep_pulse)?;
        debug!(%axis, creep_steps, "axis homed");

        *self.pose.slot(axis) = 0;
        Ok(())
    }

    fn approach_limit(
        &mut self,
        axis: Axis,
        pulse_width: std::time::Duration,
    ) -> ChessGantryResult<u32> {
        let guard = self.config.homing.max_guard_steps;
        self.io.set_direction(axis, Direction::TowardHome);

        let mut steps = 0u32;
        while !self.io.limit_active(axis) {
            if steps >= guard {
                return Err(ChessGantryError::HomingGuardExceeded { axis, steps });
            }
            self.io.pulse_step(axis, pulse_width);
            steps += 1;
        }
        Ok(steps)
    }

    fn check_ready(&self) -> ChessGantryResult<()> {
        match self.state {
            DriverState::Idle | DriverState::Moving(_) => Ok(()),
            DriverState::Faulted(axis) => {
                warn!(%axis, "motion refused, gantry faulted");
                Err(ChessGantryError::MotionHalted { axis })
            }
            DriverState::Uninitialized | DriverState::Homing(_) => Err(ChessGantryError::NotHomed),
        }
    }

    /// Emit `delta` steps on `axis` (sign gives direction). Zero is a no-op.
    pub fn move_relative(&mut self, axis: Axis, delta: i32) -> ChessGantryResult<()> {
        self.check_ready()?;
        if delta == 0 {
            return Ok(());
        }

        self.state = DriverState::Moving(axis);
        let direction = if delta < 0 {
            Direction::TowardHome
        } else {
            Direction::AwayFromHome
        };
        self.io.set_direction(axis, direction);
        for _ in 0..delta.unsigned_abs() {
            self.io.pulse_step(axis, self.config.timing.move_pulse);
        }

        *self.pose.slot(axis) += delta;
        self.state = DriverState::Idle;
        Ok(())
    }

    /// X then Y; axes are sequenced, never interpolated.
    pub fn move_to(&mut self, target: StepTarget) -> ChessGantryResult<()> {
        self.move_relative(Axis::X, target.x - self.pose.x)?;
        self.move_relative(Axis::Y, target.y - self.pose.y)
    }

    /// Drag the piece on `mv.from` to `mv.to` with the magnet.
    pub fn execute_move(&mut self, mv: Move) -> ChessGantryResult<()> {
        self.check_ready()?;
        if !mv.is_valid() {
            return Err(ChessGantryError::InvalidMove(mv));
        }
        let from = self.planner.square_to_steps(mv.from)?;
        let to = self.planner.square_to_steps(mv.to)?;
        let settle = self.config.timing.magnet_settle;

        self.move_to(from)?;
        self.io.set_magnet(true);
        self.io.settle(settle);
        self.move_to(to)?;
        self.io.set_magnet(false);
        self.io.settle(settle);

        info!(%mv, "gantry move executed");
        Ok(())
    }
}
