//! Line-oriented command surface.
//!
//! Case-sensitive. One command per line:
//! - `e2e4`: submit a human move (four characters, `[a-h][1-8][a-h][1-8]`)
//! - `show`: print the sensor occupancy
//! - `board`: print the oracle's pieces
//! - `history`: print the move history
//! - `quit`

use crate::board::square::Move;
use crate::errors::{ChessGantryError, ChessGantryResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Move),
    Show,
    Board,
    History,
    Quit,
}

/// Parse one line. `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> ChessGantryResult<Option<Command>> {
    let trimmed = line.trim();
    let command = match trimmed {
        "" => return Ok(None),
        "show" => Command::Show,
        "board" => Command::Board,
        "history" => Command::History,
        "quit" => Command::Quit,
        token => Command::Move(
            Move::from_long_algebraic(token)
                .map_err(|_| ChessGantryError::MalformedCommand(token.to_owned()))?,
        ),
    };
    Ok(Some(command))
}
