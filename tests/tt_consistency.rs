use fortbot::board::{legal_moves, Board, Player};
use fortbot::board::is_legal;
use fortbot::search::{find_best_move, find_best_move_with_keys, SearchParams, ZobristKeys};
use std::sync::Arc;
use pretty_assertions::assert_eq;

fn played(rows: usize, cols: usize, players: usize, plies: usize) -> Board {
    let mut b = Board::starting(rows, cols, players).unwrap();
    let mut side = Player::ONE;
    for i in 0..plies {
        let moves = legal_moves(&b, side);
        if moves.is_empty() { break; }
        b.apply(moves[(i * 7) % moves.len()], side);
        side = b.next_player(side);
    }
    b
}

#[test]
fn cached_search_matches_uncached() {
    for (rows, cols, players, plies) in [(6, 6, 2, 0), (6, 6, 2, 10), (7, 5, 3, 12), (6, 6, 4, 16)] {
        let b = played(rows, cols, players, plies);
        for depth in 1..=3 {
            let with = find_best_move(&b, Player::ONE, &SearchParams::depth(depth)).unwrap();
            let without = find_best_move(&b, Player::ONE, &SearchParams { use_tt: false, ..SearchParams::depth(depth) }).unwrap();
            assert_eq!((with.best_move, with.score), (without.best_move, without.score), "depth {depth} on\n{b}");
            assert_eq!(without.stats.tt_hits, 0);
        }
    }
}

#[test]
fn table_is_used_on_transpositions() {
    let b = Board::starting(6, 6, 2).unwrap();
    let r = find_best_move(&b, Player::ONE, &SearchParams::depth(4)).unwrap();
    assert!(r.stats.tt_hits > 0, "{:?}", r.stats);
    assert_eq!(r.stats.tt_hits + r.stats.tt_misses, r.stats.nodes);
}

#[test]
fn each_call_starts_with_a_fresh_table() {
    let b = played(6, 6, 2, 6);
    let p = SearchParams::depth(3);
    let first = find_best_move(&b, Player::ONE, &p).unwrap();
    let second = find_best_move(&b, Player::ONE, &p).unwrap();
    assert_eq!(first.stats.nodes, second.stats.nodes);
    assert_eq!(first.best_move, second.best_move);
}

#[test]
fn keys_for_another_size_are_replaced() {
    let b = Board::starting(10, 10, 2).unwrap();
    let small = Arc::new(ZobristKeys::new(3, 3));
    let r = find_best_move_with_keys(&b, Player::ONE, &SearchParams::depth(2), small).unwrap();
    assert!(is_legal(&b, r.best_move.unwrap(), Player::ONE));
    let fresh = find_best_move(&b, Player::ONE, &SearchParams::depth(2)).unwrap();
    assert_eq!((r.best_move, r.score), (fresh.best_move, fresh.score));
}
