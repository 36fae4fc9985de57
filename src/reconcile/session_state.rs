//! Mutable session context threaded through the reconciler.

use crate::board::occupancy::OccupancyBitmap;

/// Bitmap captured just before an unconfirmed physical change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRollback {
    pub state_before_move: OccupancyBitmap,
}

/// Confirmed board, ignore-next-change flag and the latest rollback point.
///
/// Created once with the starting bitmap and mutated once per
/// detected/validated/rejected change. Only the reconciler writes to it.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub(crate) confirmed: OccupancyBitmap,
    pub(crate) ignore_next_change: bool,
    pub(crate) pending_rollback: Option<PendingRollback>,
}

impl SessionState {
    pub fn new(confirmed: OccupancyBitmap) -> Self {
        Self {
            confirmed,
            ignore_next_change: false,
            pending_rollback: None,
        }
    }

    #[inline]
    pub fn confirmed(&self) -> OccupancyBitmap {
        self.confirmed
    }

    #[inline]
    pub fn ignoring_next_change(&self) -> bool {
        self.ignore_next_change
    }

    #[inline]
    pub fn pending_rollback(&self) -> Option<PendingRollback> {
        self.pending_rollback
    }

    /// Hand the rollback point to the caller that restores the physical board.
    pub fn take_pending_rollback(&mut self) -> Option<PendingRollback> {
        self.pending_rollback.take()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(OccupancyBitmap::STARTING)
    }
}
