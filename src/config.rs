//! Compile-time configuration.
//!
//! There is no configuration file. Engine strength is a fixed node/depth
//! pair and the gantry parameters come from `GantryConfig::default()`.

use std::time::Duration;

/// Node budget handed to the engine reply search.
pub const ENGINE_NODE_BUDGET: u64 = 20_000;

/// Depth budget handed to the engine reply search.
pub const ENGINE_DEPTH_BUDGET: u8 = 3;

/// Sensor poll cadence when running against real hardware.
pub const HARDWARE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Which edge of the board the gantry's home corner sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeSide {
    RankOne,
    RankEight,
}

/// Board-to-step mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GantryGeometry {
    pub steps_per_square_x: u32,
    pub steps_per_square_y: u32,
    /// Steps from the X limit switch to the centre of the home-corner square.
    pub origin_offset_x: u32,
    /// Steps from the Y limit switch to the centre of the home-corner square.
    pub origin_offset_y: u32,
    pub home_side: HomeSide,
}

impl Default for GantryGeometry {
    fn default() -> Self {
        Self {
            steps_per_square_x: 200,
            steps_per_square_y: 200,
            origin_offset_x: 100,
            origin_offset_y: 100,
            home_side: HomeSide::RankOne,
        }
    }
}

/// Pulse widths and settle delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionTiming {
    pub seek_pulse: Duration,
    pub creep_pulse: Duration,
    pub move_pulse: Duration,
    pub magnet_settle: Duration,
}

impl Default for MotionTiming {
    fn default() -> Self {
        Self {
            seek_pulse: Duration::from_micros(400),
            creep_pulse: Duration::from_millis(2),
            move_pulse: Duration::from_micros(600),
            magnet_settle: Duration::from_millis(250),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomingConfig {
    /// Maximum steps emitted in one direction while looking for the switch.
    pub max_guard_steps: u32,
    /// Steps to back away from the switch before the slow re-approach.
    pub backoff_steps: u32,
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            max_guard_steps: 4000,
            backoff_steps: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GantryConfig {
    pub geometry: GantryGeometry,
    pub timing: MotionTiming,
    pub homing: HomingConfig,
}
