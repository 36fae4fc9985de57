//! Session front-end: command handling and hardware polling.
//!
//! One thread of control. Each poll reads the rig, feeds the reconciler and,
//! after an accepted human move, requests the engine reply and drives the rig
//! through it before returning. Motion runs to completion once started.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use tracing::{error, warn};

use crate::board::occupancy::OccupancyBitmap;
use crate::board::render_occupancy::{render_occupancy, render_oracle_board};
use crate::board::square::Move;
use crate::errors::{ChessGantryError, ChessGantryResult};
use crate::oracle::oracle_trait::{LegalityOracle, SearchBudget};
use crate::reconcile::board_reconciler::{BoardReconciler, Outcome, ReplyOutcome};
use crate::reconcile::session_state::SessionState;
use crate::session::board_rig::BoardRig;
use crate::session::commands::{parse_command, Command};
use crate::session::move_history::{MoveHistory, Mover};

pub fn run_stdio_loop<O: LegalityOracle, R: BoardRig>(
    session: &mut SessionLoop<O, R>,
) -> ChessGantryResult<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    writeln!(stdout, "enter a move like e2e4, or show / board / history / quit")?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        let should_quit = session.handle_command(&line, &mut stdout)?;
        stdout.flush()?;
        if should_quit {
            break;
        }
    }

    Ok(())
}

pub struct SessionLoop<O: LegalityOracle, R: BoardRig> {
    reconciler: BoardReconciler<O>,
    session: SessionState,
    rig: R,
    budget: SearchBudget,
    history: MoveHistory,
    game_over: bool,
}

impl<O: LegalityOracle, R: BoardRig> SessionLoop<O, R> {
    /// Starts from the standard position on both the oracle and the
    /// confirmed bitmap.
    pub fn new(mut oracle: O, rig: R, budget: SearchBudget) -> Self {
        oracle.init_position();
        Self {
            reconciler: BoardReconciler::new(oracle),
            session: SessionState::new(OccupancyBitmap::STARTING),
            rig,
            budget,
            history: MoveHistory::new(),
            game_over: false,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn oracle(&self) -> &O {
        self.reconciler.oracle()
    }

    pub fn rig(&self) -> &R {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut R {
        &mut self.rig
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Returns true when the session should end.
    pub fn handle_command(&mut self, line: &str, out: &mut impl Write) -> ChessGantryResult<bool> {
        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(false),
            Err(err) => {
                writeln!(out, "{err}")?;
                writeln!(out, "enter a move like e2e4, or show / board / history / quit")?;
                return Ok(false);
            }
        };

        match command {
            Command::Quit => return Ok(true),
            Command::Show => {
                writeln!(out, "{}", render_occupancy(self.rig.read_occupancy()))?;
            }
            Command::Board => {
                writeln!(out, "{}", render_oracle_board(self.reconciler.oracle()))?;
            }
            Command::History => {
                if self.history.is_empty() {
                    writeln!(out, "no moves yet")?;
                } else {
                    writeln!(out, "{}", self.history.render())?;
                }
            }
            Command::Move(mv) => self.submit_typed_move(mv, out)?,
        }

        Ok(false)
    }

    fn submit_typed_move(&mut self, mv: Move, out: &mut impl Write) -> ChessGantryResult<()> {
        if self.game_over {
            writeln!(out, "game over")?;
            return Ok(());
        }

        // Only a lift-and-place onto an empty square is detectable.
        let (from, to) = mv.squares()?;
        let board = self.session.confirmed();
        if !board.is_occupied(from) {
            writeln!(out, "no piece on {from}")?;
            return Ok(());
        }
        if board.is_occupied(to) {
            writeln!(out, "{to} is occupied, captures cannot be detected")?;
            return Ok(());
        }

        if report_motion(self.rig.drag_piece(mv), out)? {
            self.poll_once(out)?;
        }
        Ok(())
    }

    /// Read the rig once and act on the outcome.
    pub fn poll_once(&mut self, out: &mut impl Write) -> ChessGantryResult<Outcome> {
        let snapshot = self.rig.read_occupancy();
        let outcome = self.reconciler.on_snapshot(&mut self.session, snapshot);

        match outcome {
            Outcome::NoChange | Outcome::SelfMoveAbsorbed => {}
            Outcome::Unrecognized => {
                writeln!(out, "unrecognized board change, waiting")?;
            }
            Outcome::IllegalMove {
                attempted,
                state_before_move,
            } => {
                writeln!(out, "illegal move {attempted}, restoring board")?;
                let rollback = self
                    .session
                    .take_pending_rollback()
                    .map(|p| p.state_before_move)
                    .unwrap_or(state_before_move);
                let restored = self.rig.restore(attempted, rollback);
                if !report_motion(restored, out)? {
                    writeln!(out, "put the piece back from {attempted} by hand")?;
                }
            }
            Outcome::MoveAccepted(mv) => {
                self.history.record(Mover::Human, mv);
                writeln!(out, "move {mv} accepted")?;
                self.play_reply(out)?;
            }
        }

        Ok(outcome)
    }

    fn play_reply(&mut self, out: &mut impl Write) -> ChessGantryResult<()> {
        let (reply, expected) = match self.reconciler.request_reply(&mut self.session, self.budget) {
            ReplyOutcome::GameOver => {
                self.game_over = true;
                writeln!(out, "game over")?;
                return Ok(());
            }
            ReplyOutcome::Reply { mv, expected } => (mv, expected),
        };

        self.history.record(Mover::Engine, reply);
        writeln!(out, "engine plays {reply}")?;

        if !report_motion(self.rig.drag_piece(reply), out)? {
            // Ignore flag stays armed: the operator's manual move is absorbed.
            writeln!(out, "move {reply} by hand")?;
            return Ok(());
        }

        let snapshot = self.rig.read_occupancy();
        match self.reconciler.on_snapshot(&mut self.session, snapshot) {
            Outcome::SelfMoveAbsorbed => {
                if snapshot != expected {
                    warn!(?snapshot, ?expected, "board after engine move differs from plan");
                }
            }
            other => warn!(?other, %reply, "engine move produced no board change"),
        }

        if self.reconciler.oracle().is_game_over() {
            self.game_over = true;
            writeln!(out, "game over")?;
        }
        Ok(())
    }

    /// Poll the rig every `interval`. Runs forever when `max_polls` is None.
    pub fn run_polling(
        &mut self,
        interval: Duration,
        max_polls: Option<u64>,
        out: &mut impl Write,
    ) -> ChessGantryResult<()> {
        let mut polls = 0u64;
        while max_polls.map_or(true, |max| polls < max) {
            self.poll_once(out)?;
            out.flush()?;
            polls += 1;
            thread::sleep(interval);
        }
        Ok(())
    }
}

/// Writes motion failures to `out` and returns whether the motion ran.
/// Only output errors propagate.
fn report_motion(result: ChessGantryResult<()>, out: &mut impl Write) -> ChessGantryResult<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(ChessGantryError::Io(err)) => Err(ChessGantryError::Io(err)),
        Err(err) => {
            if err.is_motion_fatal() {
                error!(error = %err, "motion subsystem unavailable");
            }
            writeln!(out, "{err}")?;
            Ok(false)
        }
    }
}
