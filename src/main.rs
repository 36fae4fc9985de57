//! Interactive simulation session on stdin/stdout.
//!
//! Usage:
//! `cargo run --release`
//! `RUST_LOG=debug cargo run --release`

use tracing_subscriber::EnvFilter;

use chess_gantry::errors::ChessGantryResult;
use chess_gantry::oracle::oracle_trait::SearchBudget;
use chess_gantry::oracle::shakmaty_oracle::ShakmatyOracle;
use chess_gantry::session::board_rig::SimulatedRig;
use chess_gantry::session::session_loop::{run_stdio_loop, SessionLoop};

fn main() -> ChessGantryResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut session = SessionLoop::new(
        ShakmatyOracle::new(),
        SimulatedRig::default(),
        SearchBudget::default(),
    );
    run_stdio_loop(&mut session)
}
