//! Hardware seam for the two-axis gantry.
//!
//! A real board implements `GantryIo` over its GPIO pins (direction, step,
//! limit switch and magnet outputs). The driver only talks to this trait.

use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
        }
    }
}

/// Step direction. Toward home decreases the logical position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    TowardHome,
    AwayFromHome,
}

pub trait GantryIo {
    fn set_direction(&mut self, axis: Axis, direction: Direction);

    /// Emit one step pulse of the given width on `axis`.
    fn pulse_step(&mut self, axis: Axis, pulse_width: Duration);

    fn limit_active(&mut self, axis: Axis) -> bool;

    fn set_magnet(&mut self, engaged: bool);

    /// Block for `delay` (settle time after magnet changes).
    fn settle(&mut self, delay: Duration);
}

/// Busy-wait for `delay`. Step timing on real hardware uses this rather than
/// `thread::sleep`, whose granularity is too coarse for pulse widths.
pub fn spin_delay(delay: Duration) {
    let start = Instant::now();
    while start.elapsed() < delay {
        std::hint::spin_loop();
    }
}
