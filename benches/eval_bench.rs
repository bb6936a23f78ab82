use criterion::{criterion_group, criterion_main, Criterion, black_box};
use fortbot::board::{legal_moves, Board, MoveGen, Player};
use fortbot::search::{Evaluator, Weights};

fn midgame() -> Board {
    let mut b = Board::starting(12, 12, 2).unwrap();
    let mut side = Player::ONE;
    for _ in 0..40 {
        let moves = legal_moves(&b, side);
        let Some(&mv) = moves.get(moves.len() / 2) else { break };
        b.apply(mv, side);
        side = b.next_player(side);
    }
    b
}

fn bench_eval(c: &mut Criterion) {
    let b = midgame();
    let w = Weights::default();
    let mut ev = Evaluator::new();
    c.bench_function("evaluate_12x12_midgame", |ben| {
        ben.iter(|| black_box(ev.evaluate(black_box(&b), Player::ONE, &w)))
    });
    let mut mg = MoveGen::default();
    c.bench_function("movegen_12x12_midgame", |ben| {
        ben.iter(|| black_box(mg.generate(black_box(&b), Player::ONE).len()))
    });
}

criterion_group!(benches, bench_eval);
criterion_main!(benches);
