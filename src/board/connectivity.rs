use crate::board::cell::Player;
use crate::board::grid::{neighbors, Board};
use std::collections::VecDeque;

/// Is `(row, col)` linked to `player`'s base through the player's own cells
/// (8-neighbourhood)? The start cell itself must belong to the player.
pub fn is_connected_to_base(board: &Board, row: usize, col: usize, player: Player) -> bool {
    let Some(base) = board.base(player) else { return false };
    if !board.cell(row, col).is_owned_by(player) { return false; }
    let (rows, cols) = (board.rows(), board.cols());
    let mut visited = vec![false; board.len()];
    let mut queue = VecDeque::new();
    visited[board.index(row, col)] = true;
    queue.push_back((row, col));
    while let Some((r, c)) = queue.pop_front() {
        if r == base.row && c == base.col { return true; }
        for (nr, nc) in neighbors(rows, cols, r, c) {
            let ni = board.index(nr, nc);
            if !visited[ni] && board.cell(nr, nc).is_owned_by(player) {
                visited[ni] = true;
                queue.push_back((nr, nc));
            }
        }
    }
    false
}

/// Every cell of `player` reachable from the player's base, computed with one
/// breadth-first flood. A cell is connected to the base iff it is in the region.
#[derive(Clone, Debug, Default)]
pub struct BaseRegion {
    member: Vec<bool>,
    size: usize,
}

impl BaseRegion {
    pub fn compute(board: &Board, player: Player) -> Self {
        let mut region = BaseRegion::default();
        let mut queue = VecDeque::new();
        region.fill(board, player, &mut queue);
        region
    }

    /// Recompute in place, reusing the allocations of a previous flood.
    pub fn fill(&mut self, board: &Board, player: Player, queue: &mut VecDeque<(usize, usize)>) {
        self.member.clear();
        self.member.resize(board.len(), false);
        self.size = 0;
        queue.clear();
        let Some(base) = board.base(player) else { return };
        let (rows, cols) = (board.rows(), board.cols());
        self.member[board.index(base.row, base.col)] = true;
        self.size = 1;
        queue.push_back((base.row, base.col));
        while let Some((r, c)) = queue.pop_front() {
            for (nr, nc) in neighbors(rows, cols, r, c) {
                let ni = board.index(nr, nc);
                if !self.member[ni] && board.cell(nr, nc).is_owned_by(player) {
                    self.member[ni] = true;
                    self.size += 1;
                    queue.push_back((nr, nc));
                }
            }
        }
    }

    #[inline]
    pub fn contains(&self, idx: usize) -> bool { self.member.get(idx).copied().unwrap_or(false) }

    pub fn len(&self) -> usize { self.size }
    pub fn is_empty(&self) -> bool { self.size == 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUT: &str = "
        1b 1 . . .
        .  . x . .
        .  . . 1 .
        .  . . . 2b
    ";

    #[test]
    fn detached_cells_are_not_connected() {
        let b = Board::from_ascii(CUT).unwrap();
        assert!(is_connected_to_base(&b, 0, 1, Player::ONE));
        assert!(!is_connected_to_base(&b, 2, 3, Player::ONE));
        // start must be owned
        assert!(!is_connected_to_base(&b, 1, 1, Player::ONE));
    }

    #[test]
    fn region_agrees_with_single_cell_search() {
        let b = Board::from_ascii(CUT).unwrap();
        for p in [Player::ONE, Player::TWO] {
            let region = BaseRegion::compute(&b, p);
            for r in 0..b.rows() {
                for c in 0..b.cols() {
                    assert_eq!(region.contains(b.index(r, c)), is_connected_to_base(&b, r, c, p), "mismatch at ({r},{c}) for {p}");
                }
            }
        }
        assert_eq!(BaseRegion::compute(&b, Player::ONE).len(), 2);
    }

    #[test]
    fn diagonal_links_count() {
        let b = Board::from_ascii("1b . .\n. 1 .\n. . 1\n2b . .").unwrap();
        assert!(is_connected_to_base(&b, 2, 2, Player::ONE));
    }
}
