//! Crate root module declarations for the chess gantry bridge.
//!
//! This file exposes the subsystems that connect a sensor chessboard to a
//! chess engine (square encodings, move detection and reconciliation, the
//! legality oracle, sensors, gantry motion, and the session front-end) so
//! binaries, benches, and tests can import stable module paths.

pub mod errors;
pub mod config;

pub mod board {
    pub mod occupancy;
    pub mod render_occupancy;
    pub mod square;
}

pub mod reconcile {
    pub mod board_reconciler;
    pub mod move_detector;
    pub mod session_state;
}

pub mod oracle {
    pub mod board_scoring;
    pub mod oracle_trait;
    pub mod reply_search;
    pub mod shakmaty_oracle;
}

pub mod sensors {
    pub mod occupancy_source;
    pub mod simulated_sensor;
}

pub mod motion {
    pub mod gantry_driver;
    pub mod gantry_io;
    pub mod motion_planner;
    pub mod motion_simulator;
    pub mod simulated_gantry;
}

pub mod session {
    pub mod board_rig;
    pub mod commands;
    pub mod move_history;
    pub mod session_loop;
}
