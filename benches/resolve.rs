use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tile_cascade::core::{
    apply_gravity, find_match_groups, find_possible_move, Board, GameSession, SimpleRng,
    TileFactory,
};
use tile_cascade::types::Pos;

fn bench_match_scan(c: &mut Criterion) {
    let session = GameSession::new(12345);
    let board = session.board().clone();

    c.bench_function("match_scan", |b| {
        b.iter(|| find_match_groups(black_box(&board)))
    });
}

fn bench_move_search(c: &mut Criterion) {
    let session = GameSession::new(12345);
    let board = session.board().clone();

    c.bench_function("find_possible_move", |b| {
        b.iter(|| find_possible_move(black_box(&board)))
    });
}

fn bench_gravity(c: &mut Criterion) {
    let mut factory = TileFactory::default();
    let mut rng = SimpleRng::new(7);
    let full = Board::generate(&mut factory, &mut rng);

    c.bench_function("gravity_refill_third", |b| {
        b.iter(|| {
            let mut board = full.clone();
            for row in 0..3 {
                for col in 0..9 {
                    let _ = board.take(Pos::new(row * 3, col));
                }
            }
            apply_gravity(&mut board, &mut factory, &mut rng)
        })
    });
}

fn bench_full_turn(c: &mut Criterion) {
    c.bench_function("full_turn", |b| {
        let mut seed = 1u32;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let mut session = GameSession::new(seed);
            if let Some((a, b)) = find_possible_move(session.board()) {
                black_box(session.request_swap(a, b));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_match_scan,
    bench_move_search,
    bench_gravity,
    bench_full_turn
);
criterion_main!(benches);
