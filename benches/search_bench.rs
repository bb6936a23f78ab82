use criterion::{criterion_group, criterion_main, Criterion, black_box};
use fortbot::board::{Board, Player};
use fortbot::search::{find_best_move, SearchParams};

fn bench_search(c: &mut Criterion) {
    let b = Board::starting(8, 8, 2).unwrap();
    c.bench_function("search_depth_3_8x8", |ben| {
        ben.iter(|| {
            let p = SearchParams::depth(3);
            let r = find_best_move(black_box(&b), Player::ONE, &p).unwrap();
            black_box(r.stats.nodes)
        })
    });
    c.bench_function("search_depth_3_8x8_no_tt", |ben| {
        ben.iter(|| {
            let p = SearchParams { use_tt: false, ..SearchParams::depth(3) };
            let r = find_best_move(black_box(&b), Player::ONE, &p).unwrap();
            black_box(r.stats.nodes)
        })
    });
    let four = Board::starting(10, 10, 4).unwrap();
    c.bench_function("search_depth_3_10x10_4p_beam", |ben| {
        ben.iter(|| {
            let p = SearchParams { max_branching: Some(12), ..SearchParams::depth(3) };
            let r = find_best_move(black_box(&four), Player::ONE, &p).unwrap();
            black_box(r.stats.nodes)
        })
    });
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
