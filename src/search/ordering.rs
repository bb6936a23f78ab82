use crate::board::{Board, Move, Player};

const CAPTURE_BONUS: f64 = 1000.0;
const FRIENDLY_NEIGHBOR: f64 = 50.0;
const ENEMY_NEIGHBOR: f64 = 30.0;
const EMPTY_NEIGHBOR: f64 = 10.0;
const ENEMY_BASE_PULL: f64 = 3.0;
/// Own-base distance beyond which a move counts as overextended.
const SAFE_RADIUS: usize = 8;
const OVEREXTENSION_PENALTY: f64 = 5.0;

/// Cheap heuristic for trying promising moves first.
pub fn score_move(board: &Board, mv: Move, player: Player) -> f64 {
    let mut score = 0.0;
    if board.cell(mv.row, mv.col).is_enemy_of(player) { score += CAPTURE_BONUS; }

    let (mut friendly, mut enemy, mut empty) = (0u32, 0u32, 0u32);
    for (r, c) in board.neighbors(mv.row, mv.col) {
        let n = board.cell(r, c);
        if n.is_owned_by(player) { friendly += 1; } else if n.is_enemy_of(player) { enemy += 1; } else if n.is_empty() { empty += 1; }
    }
    score += friendly as f64 * FRIENDLY_NEIGHBOR + enemy as f64 * ENEMY_NEIGHBOR + empty as f64 * EMPTY_NEIGHBOR;

    if let Some(d) = board.nearest_opponent_base_distance(player, mv.pos()) { score -= ENEMY_BASE_PULL * d as f64; }
    if let Some(base) = board.base(player) {
        let d = base.manhattan(mv.pos());
        if d > SAFE_RADIUS { score -= OVEREXTENSION_PENALTY * (d - SAFE_RADIUS) as f64; }
    }
    score
}

/// Stable sort by heuristic: descending for the maximizing side, ascending for
/// the minimizing side. Equal scores keep generation order.
pub fn order_moves(board: &Board, moves: &mut [Move], player: Player, maximizing: bool) {
    let mut keyed: Vec<(f64, Move)> = moves.iter().map(|&m| (score_move(board, m, player), m)).collect();
    if maximizing {
        keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    } else {
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    }
    for (slot, (_, m)) in moves.iter_mut().zip(keyed) { *slot = m; }
}
