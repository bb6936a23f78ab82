use fortbot::board::{legal_moves, Board, Player};
use fortbot::search::{find_best_move, SearchParams};
use pretty_assertions::assert_eq;
use std::time::Duration;

fn midgame() -> Board {
    let mut b = Board::starting(7, 7, 2).unwrap();
    let mut side = Player::ONE;
    for i in 0..14 {
        let moves = legal_moves(&b, side);
        if moves.is_empty() { break; }
        b.apply(moves[(i * 3) % moves.len()], side);
        side = b.next_player(side);
    }
    b
}

#[test]
fn root_parallel_bestmove_equals_single_thread() {
    let b = midgame();
    for depth in 2..=3 {
        let single = find_best_move(&b, Player::ONE, &SearchParams::depth(depth)).unwrap();
        let multi = find_best_move(&b, Player::ONE, &SearchParams { threads: 4, ..SearchParams::depth(depth) }).unwrap();
        assert_eq!((multi.best_move, multi.score), (single.best_move, single.score), "depth {depth}");
    }
}

#[test]
fn root_parallel_handles_three_players() {
    let b = Board::starting(6, 6, 3).unwrap();
    let single = find_best_move(&b, Player::THREE, &SearchParams::depth(3)).unwrap();
    let multi = find_best_move(&b, Player::THREE, &SearchParams { threads: 3, ..SearchParams::depth(3) }).unwrap();
    assert_eq!(multi.best_move, single.best_move);
}

#[test]
fn root_parallel_returns_move_with_movetime() {
    let b = Board::starting(10, 10, 2).unwrap();
    let p = SearchParams { threads: 4, ..SearchParams::time_budget(Duration::from_millis(50)) };
    let r = find_best_move(&b, Player::ONE, &p).unwrap();
    assert!(r.best_move.is_some());
    assert!(r.stats.nodes > 0);
}
