use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chess_gantry::board::occupancy::OccupancyBitmap;
use chess_gantry::board::square::{algebraic_to_square, Square};
use chess_gantry::oracle::shakmaty_oracle::ShakmatyOracle;
use chess_gantry::reconcile::board_reconciler::BoardReconciler;
use chess_gantry::reconcile::move_detector::detect;
use chess_gantry::reconcile::session_state::SessionState;

fn square(name: &str) -> Square {
    algebraic_to_square(name).unwrap_or_else(|e| panic!("bench square {name}: {e}"))
}

fn lift_and_place(board: OccupancyBitmap, from: &str, to: &str) -> OccupancyBitmap {
    board.without_piece(square(from)).with_piece(square(to))
}

fn bench_detect(c: &mut Criterion) {
    let start = OccupancyBitmap::STARTING;
    let single = lift_and_place(start, "e2", "e4");
    let lifted = start.without_piece(square("g1"));
    let back_rank = start.without_piece(square("f1")).without_piece(square("g1"));
    let castled = lift_and_place(lift_and_place(back_rank, "e1", "g1"), "h1", "f1");

    let mut group = c.benchmark_group("move_detector");
    group.bench_function("single_move", |b| {
        b.iter(|| detect(black_box(start), black_box(single)))
    });
    group.bench_function("lifted_piece", |b| {
        b.iter(|| detect(black_box(start), black_box(lifted)))
    });
    group.bench_function("four_square_delta", |b| {
        b.iter(|| detect(black_box(back_rank), black_box(castled)))
    });
    group.finish();
}

fn bench_reconcile_cycle(c: &mut Criterion) {
    let after = lift_and_place(OccupancyBitmap::STARTING, "e2", "e4");

    c.bench_function("reconcile_accept_e2e4", |b| {
        b.iter(|| {
            let mut reconciler = BoardReconciler::new(ShakmatyOracle::with_seed(1));
            let mut session = SessionState::default();
            black_box(reconciler.on_snapshot(&mut session, black_box(after)))
        })
    });
}

criterion_group!(benches, bench_detect, bench_reconcile_cycle);
criterion_main!(benches);
