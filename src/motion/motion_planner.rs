//! Square to gantry coordinate mapping.
//!
//! X follows the file, Y follows the rank counted from the board edge nearest
//! the home corner. Both are absolute step counts from the homed zero.

use crate::board::square::{EngineCoord, Square};
use crate::config::{GantryGeometry, HomeSide};
use crate::errors::ChessGantryResult;

/// Absolute carriage target, in steps from the homed zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepTarget {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct MotionPlanner {
    geometry: GantryGeometry,
}

impl MotionPlanner {
    pub fn new(geometry: GantryGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &GantryGeometry {
        &self.geometry
    }

    /// Fails for coordinates off the board (including the sentinel), so the
    /// driver never sees an out-of-range target.
    pub fn square_to_steps(&self, coord: EngineCoord) -> ChessGantryResult<StepTarget> {
        let square = Square::from_engine_coord(coord)?;
        Ok(self.target_for(square))
    }

    pub fn target_for(&self, square: Square) -> StepTarget {
        let g = &self.geometry;
        let rank_from_home = match g.home_side {
            HomeSide::RankOne => square.rank(),
            HomeSide::RankEight => 7 - square.rank(),
        };
        StepTarget {
            x: (g.origin_offset_x + u32::from(square.file()) * g.steps_per_square_x) as i32,
            y: (g.origin_offset_y + u32::from(rank_from_home) * g.steps_per_square_y) as i32,
        }
    }

    /// Square whose centre lies within half a pitch of `target`.
    pub fn steps_to_square(&self, target: StepTarget) -> Option<Square> {
        let g = &self.geometry;
        let file = nearest_cell(target.x, g.origin_offset_x, g.steps_per_square_x)?;
        let rank_from_home = nearest_cell(target.y, g.origin_offset_y, g.steps_per_square_y)?;
        let rank = match g.home_side {
            HomeSide::RankOne => rank_from_home,
            HomeSide::RankEight => 7 - rank_from_home,
        };
        Square::new(file, rank).ok()
    }
}

impl Default for MotionPlanner {
    fn default() -> Self {
        Self::new(GantryGeometry::default())
    }
}

fn nearest_cell(steps: i32, offset: u32, pitch: u32) -> Option<u8> {
    if pitch == 0 {
        return None;
    }
    let relative = i64::from(steps) - i64::from(offset);
    let pitch = i64::from(pitch);
    let cell = (relative + pitch / 2).div_euclid(pitch);
    if !(0..8).contains(&cell) || (relative - cell * pitch).abs() > pitch / 2 {
        return None;
    }
    u8::try_from(cell).ok()
}
