//! Reconciles sensor snapshots against the legality oracle.
//!
//! Each changed snapshot is either absorbed (the system caused it), ignored
//! as unrecognised, rejected as illegal (the confirmed board is held at the
//! pre-move bitmap so the caller can restore the pieces), or committed as a
//! human move. After a commit the caller asks for the engine reply, which
//! arms the ignore flag so the bitmap delta of its physical execution is not
//! mistaken for a second human move.

use tracing::{debug, info, warn};

use crate::board::occupancy::OccupancyBitmap;
use crate::board::square::Move;
use crate::oracle::oracle_trait::{LegalityOracle, SearchBudget};
use crate::reconcile::move_detector::detect;
use crate::reconcile::session_state::{PendingRollback, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Snapshot equals the confirmed board.
    NoChange,
    /// Delta caused by our own actuation; accepted unconditionally.
    SelfMoveAbsorbed,
    /// Not a single lift-and-place; re-poll later.
    Unrecognized,
    /// Detected move rejected by the oracle. The confirmed board stays at
    /// `state_before_move`; the physical board must be put back to it.
    IllegalMove {
        attempted: Move,
        state_before_move: OccupancyBitmap,
    },
    MoveAccepted(Move),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// No legal reply. Terminal for play, not for the process.
    GameOver,
    /// Reply applied to the oracle; `expected` is the bitmap its physical
    /// execution should produce.
    Reply {
        mv: Move,
        expected: OccupancyBitmap,
    },
}

pub struct BoardReconciler<O: LegalityOracle> {
    oracle: O,
}

impl<O: LegalityOracle> BoardReconciler<O> {
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    pub fn on_snapshot(&mut self, session: &mut SessionState, snapshot: OccupancyBitmap) -> Outcome {
        if snapshot == session.confirmed {
            return Outcome::NoChange;
        }

        let state_before_move = session.confirmed;
        session.pending_rollback = Some(PendingRollback { state_before_move });

        if session.ignore_next_change {
            session.ignore_next_change = false;
            session.confirmed = snapshot;
            session.pending_rollback = None;
            info!(?snapshot, "absorbed self-caused board change");
            return Outcome::SelfMoveAbsorbed;
        }

        let Some(mv) = detect(state_before_move, snapshot) else {
            let changed = state_before_move.changed_squares(snapshot).len();
            debug!(changed, "unrecognized occupancy delta");
            session.pending_rollback = None;
            return Outcome::Unrecognized;
        };

        let legal = self.oracle.enumerate_legal_moves().contains(&mv);
        if !legal || !self.oracle.apply_move(mv) {
            session.confirmed = state_before_move;
            warn!(%mv, "illegal move, board must be restored");
            return Outcome::IllegalMove {
                attempted: mv,
                state_before_move,
            };
        }

        session.confirmed = snapshot;
        session.pending_rollback = None;
        info!(%mv, "human move accepted");
        Outcome::MoveAccepted(mv)
    }

    /// Search, apply and arm the ignore flag for the engine reply.
    pub fn request_reply(&mut self, session: &mut SessionState, budget: SearchBudget) -> ReplyOutcome {
        let reply = self.oracle.search_best_reply(budget);
        if !reply.is_valid() || !self.oracle.apply_move(reply) {
            info!("no legal reply, game over");
            return ReplyOutcome::GameOver;
        }

        session.ignore_next_change = true;
        let expected = Self::expected_snapshot(session.confirmed, reply);
        info!(%reply, "engine reply");
        ReplyOutcome::Reply {
            mv: reply,
            expected,
        }
    }

    /// Bitmap after physically moving the piece of `mv` on `board`.
    pub fn expected_snapshot(board: OccupancyBitmap, mv: Move) -> OccupancyBitmap {
        match mv.squares() {
            Ok((from, to)) => board.without_piece(from).with_piece(to),
            Err(_) => board,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardReconciler, Outcome, ReplyOutcome};
    use crate::board::occupancy::OccupancyBitmap;
    use crate::board::square::{algebraic_to_square, Move, Square};
    use crate::oracle::oracle_trait::{LegalityOracle, PieceKind, SearchBudget};
    use crate::oracle::shakmaty_oracle::ShakmatyOracle;
    use crate::reconcile::session_state::SessionState;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("square should parse")
    }

    fn lift_and_place(board: OccupancyBitmap, from: &str, to: &str) -> OccupancyBitmap {
        board.without_piece(sq(from)).with_piece(sq(to))
    }

    fn budget() -> SearchBudget {
        SearchBudget {
            max_nodes: 5_000,
            max_depth: 2,
        }
    }

    fn setup() -> (BoardReconciler<ShakmatyOracle>, SessionState) {
        (
            BoardReconciler::new(ShakmatyOracle::with_seed(11)),
            SessionState::default(),
        )
    }

    #[test]
    fn unchanged_snapshot_is_a_no_op() {
        let (mut reconciler, mut session) = setup();
        let outcome = reconciler.on_snapshot(&mut session, OccupancyBitmap::STARTING);
        assert_eq!(outcome, Outcome::NoChange);
        assert!(session.pending_rollback().is_none());
    }

    #[test]
    fn legal_move_commits_and_advances_oracle() {
        let (mut reconciler, mut session) = setup();
        let after = lift_and_place(OccupancyBitmap::STARTING, "e2", "e4");

        let outcome = reconciler.on_snapshot(&mut session, after);
        assert_eq!(outcome, Outcome::MoveAccepted(Move::between(sq("e2"), sq("e4"))));
        assert_eq!(session.confirmed(), after);
        assert!(session.pending_rollback().is_none());
        // Black to move now.
        assert!(reconciler
            .oracle()
            .enumerate_legal_moves()
            .contains(&Move::between(sq("e7"), sq("e5"))));
    }

    #[test]
    fn illegal_move_keeps_confirmed_board_and_oracle() {
        let (mut reconciler, mut session) = setup();
        let after = lift_and_place(OccupancyBitmap::STARTING, "e2", "e5");

        let outcome = reconciler.on_snapshot(&mut session, after);
        assert_eq!(
            outcome,
            Outcome::IllegalMove {
                attempted: Move::between(sq("e2"), sq("e5")),
                state_before_move: OccupancyBitmap::STARTING,
            }
        );
        assert_eq!(session.confirmed(), OccupancyBitmap::STARTING);
        assert_eq!(
            session.take_pending_rollback().map(|p| p.state_before_move),
            Some(OccupancyBitmap::STARTING)
        );
        assert_eq!(reconciler.oracle().enumerate_legal_moves().len(), 20);
    }

    #[test]
    fn partial_states_are_unrecognized_until_resolved() {
        let (mut reconciler, mut session) = setup();
        let lifted = OccupancyBitmap::STARTING.without_piece(sq("g1"));
        assert_eq!(reconciler.on_snapshot(&mut session, lifted), Outcome::Unrecognized);
        assert_eq!(session.confirmed(), OccupancyBitmap::STARTING);
        assert!(session.pending_rollback().is_none());

        let placed = lifted.with_piece(sq("f3"));
        assert_eq!(
            reconciler.on_snapshot(&mut session, placed),
            Outcome::MoveAccepted(Move::between(sq("g1"), sq("f3")))
        );
    }

    #[test]
    fn reply_arms_ignore_flag_and_next_delta_is_absorbed() {
        let (mut reconciler, mut session) = setup();
        let after = lift_and_place(OccupancyBitmap::STARTING, "e2", "e4");
        assert!(matches!(
            reconciler.on_snapshot(&mut session, after),
            Outcome::MoveAccepted(_)
        ));

        let ReplyOutcome::Reply { mv, expected } = reconciler.request_reply(&mut session, budget())
        else {
            panic!("starting position after e2e4 has replies");
        };
        assert!(mv.is_valid());
        assert!(session.ignoring_next_change());
        assert_eq!(expected, BoardReconciler::<ShakmatyOracle>::expected_snapshot(after, mv));

        assert_eq!(
            reconciler.on_snapshot(&mut session, expected),
            Outcome::SelfMoveAbsorbed
        );
        assert!(!session.ignoring_next_change());
        assert_eq!(session.confirmed(), expected);

        // White to move again after the reply.
        assert!(reconciler
            .oracle()
            .enumerate_legal_moves()
            .contains(&Move::between(sq("d2"), sq("d4"))));
    }

    fn oracle_and_board(fen: &str) -> (BoardReconciler<ShakmatyOracle>, OccupancyBitmap) {
        let oracle = ShakmatyOracle::from_fen(fen, 1).expect("FEN should be a legal position");
        let board = Square::all()
            .filter(|s| oracle.piece_at(*s).is_some())
            .fold(OccupancyBitmap::EMPTY_BOARD, |b, s| b.with_piece(s));
        (BoardReconciler::new(oracle), board)
    }

    #[test]
    fn game_over_when_no_reply_exists() {
        // Qh8 mates the cornered king.
        let (mut reconciler, board) = oracle_and_board("k7/8/1K6/8/8/8/8/7Q w - - 0 1");
        let mut session = SessionState::new(board);

        let mated = lift_and_place(board, "h1", "h8");
        assert_eq!(
            reconciler.on_snapshot(&mut session, mated),
            Outcome::MoveAccepted(Move::between(sq("h1"), sq("h8")))
        );
        assert_eq!(
            reconciler.request_reply(&mut session, budget()),
            ReplyOutcome::GameOver
        );
        assert!(!session.ignoring_next_change());
        assert!(reconciler.oracle().is_game_over());
    }

    #[test]
    fn hand_capture_is_never_recognized() {
        let (mut reconciler, board) = oracle_and_board("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1");
        let mut session = SessionState::new(board);

        // Captured pawn taken off first, then the capturing pawn placed.
        let removed = board.without_piece(sq("d5"));
        assert_eq!(reconciler.on_snapshot(&mut session, removed), Outcome::Unrecognized);
        let captured = removed.without_piece(sq("e4")).with_piece(sq("d5"));
        assert_eq!(reconciler.on_snapshot(&mut session, captured), Outcome::Unrecognized);
        assert_eq!(session.confirmed(), board);
    }

    #[test]
    fn hand_castling_and_en_passant_are_rejected() {
        let (mut reconciler, board) = oracle_and_board("4k3/pppppppp/8/8/8/8/8/4K2R w K - 0 1");
        let mut session = SessionState::new(board);
        let king_only = lift_and_place(board, "e1", "g1");
        assert!(matches!(
            reconciler.on_snapshot(&mut session, king_only),
            Outcome::IllegalMove { .. }
        ));
        assert_eq!(session.confirmed(), board);
        assert_eq!(
            reconciler.oracle().piece_at(sq("h1")).map(|p| p.kind),
            Some(PieceKind::Rook)
        );

        let (mut reconciler, board) = oracle_and_board("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        let mut session = SessionState::new(board);
        let diagonal = lift_and_place(board, "e5", "d6");
        assert!(matches!(
            reconciler.on_snapshot(&mut session, diagonal),
            Outcome::IllegalMove { .. }
        ));
        assert!(reconciler.oracle().piece_at(sq("d5")).is_some());
    }
}
