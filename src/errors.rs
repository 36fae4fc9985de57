//! Errors used throughout the board bridge.
//!
//! `ChessGantryError` is the single error type returned by square encoding,
//! command parsing and the motion subsystem. Move detection and validation
//! never produce errors: those results are reported as `Outcome` tags by the
//! reconciler so that the session loop can re-poll or roll back.
//!
//! Usage guidelines:
//! - Encoding and command variants are recoverable and suitable for showing
//!   to the operator before reprompting.
//! - `HomingGuardExceeded` and `MotionHalted` mean the gantry must not move
//!   again until an operator has fixed the hardware and re-homed it.

use thiserror::Error;

use crate::board::square::Move;
use crate::motion::gantry_io::Axis;

/// Unified error type for the crate.
#[derive(Error, Debug)]
pub enum ChessGantryError {
    /// An algebraic square or move token could not be parsed.
    #[error("invalid algebraic notation: {0}")]
    InvalidAlgebraic(String),

    /// A bitmap bit index outside `0..=63`.
    #[error("invalid bit index: {0} (must be 0-63)")]
    InvalidBitIndex(u8),

    /// An engine coordinate that is off the 0x88 board (or the sentinel).
    #[error("invalid engine coordinate: {0:#04x}")]
    InvalidEngineCoord(u8),

    /// File or rank outside `0..=7`.
    #[error("square out of range: file {file}, rank {rank}")]
    SquareOutOfRange { file: u8, rank: u8 },

    /// A FEN string that does not parse or describes an illegal position.
    #[error("invalid FEN {0}")]
    InvalidFen(String),

    /// A line on the command surface that is not a known command.
    #[error("malformed command: '{0}'")]
    MalformedCommand(String),

    /// The limit switch was not found within the step guard.
    ///
    /// Payload: the axis and how many steps were emitted before giving up.
    #[error("homing guard exceeded on {axis} axis after {steps} steps")]
    HomingGuardExceeded { axis: Axis, steps: u32 },

    /// Motion refused because homing of `axis` previously failed.
    #[error("motion halted: {axis} axis homing failed, operator intervention required")]
    MotionHalted { axis: Axis },

    /// Motion requested before the gantry was homed.
    #[error("gantry has not been homed")]
    NotHomed,

    /// A move handed to the motion subsystem has an invalid endpoint.
    #[error("cannot execute invalid move {0}")]
    InvalidMove(Move),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ChessGantryError {
    /// True for failures that leave the motion subsystem unusable.
    pub fn is_motion_fatal(&self) -> bool {
        matches!(
            self,
            ChessGantryError::HomingGuardExceeded { .. } | ChessGantryError::MotionHalted { .. }
        )
    }
}

pub type ChessGantryResult<T> = Result<T, ChessGantryError>;
