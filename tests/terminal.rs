use fortbot::board::{legal_moves, Board, Move, Player};
use fortbot::search::eval::{magnitude_bound, terminal_margin, MAX_WEIGHT, TERMINAL_SCORE};
use fortbot::search::{evaluate, find_best_move, SearchParams, Weights};

fn weight_profiles() -> Vec<Weights> {
    vec![
        Weights::default(),
        Weights::uniform(MAX_WEIGHT),
        Weights::uniform(-MAX_WEIGHT),
        Weights { material: -MAX_WEIGHT, mobility: 0.0, position: MAX_WEIGHT, redundancy: 1.0, cohesion: -3.0 },
    ]
}

#[test]
fn margin_exceeds_every_ordinary_score() {
    let mut b = Board::starting(9, 9, 3).unwrap();
    let mut side = Player::ONE;
    for i in 0..45 {
        let moves = legal_moves(&b, side);
        if !moves.is_empty() { b.apply(moves[(i * 5) % moves.len()], side); }
        side = b.next_player(side);
        for w in weight_profiles() {
            let bound = magnitude_bound(9, 9, &w);
            for p in b.players().collect::<Vec<_>>() {
                assert!(evaluate(&b, p, &w).abs() <= bound);
            }
            assert!(terminal_margin(9, 9, &w) > 2.0 * bound);
            assert!(terminal_margin(9, 9, &w) >= TERMINAL_SCORE);
        }
    }
}

#[test]
fn stuck_root_scores_as_a_loss() {
    let b = Board::from_ascii(
        "1b x . .
         x  x . .
         .  . . 2b",
    )
    .unwrap();
    for w in weight_profiles() {
        let p = SearchParams { weights: w, ..SearchParams::depth(2) };
        let r = find_best_move(&b, Player::ONE, &p).unwrap();
        assert_eq!(r.best_move, None);
        assert!(r.score < -magnitude_bound(3, 4, &w), "{w:?}: {}", r.score);
    }
}

#[test]
fn forced_win_beats_any_positional_gain() {
    // Capturing (2,3) walls P2's base in; the quiet move at (1,0) keeps material
    let b = Board::from_ascii(
        "1b 1 x x x
         .  1 x x x
         x  1 1 2 2b",
    )
    .unwrap();
    let mut moves = legal_moves(&b, Player::ONE);
    moves.sort();
    assert_eq!(moves, vec![Move::new(1, 0), Move::new(2, 3)]);
    assert!(legal_moves(&b.with_move(Move::new(2, 3), Player::ONE), Player::TWO).is_empty());

    for w in weight_profiles() {
        let p = SearchParams { weights: w, ..SearchParams::depth(2) };
        let r = find_best_move(&b, Player::ONE, &p).unwrap();
        assert_eq!(r.best_move, Some(Move::new(2, 3)), "{w:?}");
        assert!(r.score > magnitude_bound(3, 5, &w));
    }
}
