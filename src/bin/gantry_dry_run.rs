//! Gantry dry run against the simulated table.
//!
//! Homes a `SimulatedGantry`, drags each listed move, and prints the step
//! trace and the resulting occupancy.
//!
//! Usage:
//! `cargo run --release --bin gantry_dry_run`
//! `cargo run --release --bin gantry_dry_run -- --moves e2e4,g8f6 --guard 2000`
//! `cargo run --release --bin gantry_dry_run -- --start-x 5000 --guard 1000` (faults on X)

use chess_gantry::board::render_occupancy::render_occupancy;
use chess_gantry::board::square::Move;
use chess_gantry::config::GantryConfig;
use chess_gantry::errors::ChessGantryResult;
use chess_gantry::motion::gantry_driver::GantryDriver;
use chess_gantry::motion::gantry_io::Axis;
use chess_gantry::motion::motion_planner::StepTarget;
use chess_gantry::motion::simulated_gantry::SimulatedGantry;
use tracing_subscriber::EnvFilter;

fn parse_arg_string(flag: &str, default: &str) -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    default.to_owned()
}

fn parse_arg_u32(flag: &str, default: u32) -> u32 {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            if let Ok(v) = args[i + 1].parse::<u32>() {
                return v.max(1);
            }
        }
    }
    default
}

fn main() -> ChessGantryResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = GantryConfig::default();
    config.homing.max_guard_steps = parse_arg_u32("--guard", config.homing.max_guard_steps);
    let moves = parse_arg_string("--moves", "e2e4,e7e5,g1f3,b8c6")
        .split(',')
        .map(|token| Move::from_long_algebraic(token.trim()))
        .collect::<ChessGantryResult<Vec<_>>>()?;

    let start = StepTarget {
        x: parse_arg_u32("--start-x", 750) as i32,
        y: parse_arg_u32("--start-y", 900) as i32,
    };
    let table = SimulatedGantry::with_geometry(start, config.geometry);
    let mut driver = GantryDriver::new(table, config);

    println!("dry run: guard={} moves={}", config.homing.max_guard_steps, moves.len());
    driver.home()?;
    println!("homed: pulses={}", driver.io().pulse_count());

    for mv in moves {
        let before = driver.io().pulse_count();
        driver.execute_move(mv)?;
        let pose = driver.pose();
        println!(
            "{mv}: pulses={} pose=({}, {}) elapsed_ms={}",
            driver.io().pulse_count() - before,
            pose.get(Axis::X),
            pose.get(Axis::Y),
            driver.io().elapsed().as_millis()
        );
    }

    for drag in driver.io().drags() {
        println!(
            "drag ({}, {}) -> ({}, {})",
            drag.engaged_at.x, drag.engaged_at.y, drag.released_at.x, drag.released_at.y
        );
    }
    println!("{}", render_occupancy(driver.io().board()));
    Ok(())
}
