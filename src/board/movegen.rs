use crate::board::cell::Player;
use crate::board::connectivity::{is_connected_to_base, BaseRegion};
use crate::board::grid::{neighbors, Board, Move};
use std::collections::VecDeque;

/// Check one target against the game rules, cell by cell:
/// the target is empty or an enemy normal cell, and some 8-neighbour owned by
/// `player` is connected to the player's base.
pub fn is_legal(board: &Board, mv: Move, player: Player) -> bool {
    let Some(target) = board.get(mv.row, mv.col) else { return false };
    if !target.is_targetable() { return false; }
    if !target.is_empty() && !target.is_enemy_of(player) { return false; }
    board
        .neighbors(mv.row, mv.col)
        .any(|(r, c)| board.cell(r, c).is_owned_by(player) && is_connected_to_base(board, r, c, player))
}

/// All legal targets for `player`, row-major.
pub fn legal_moves(board: &Board, player: Player) -> Vec<Move> {
    MoveGen::default().generate(board, player)
}

/// Move generator holding scratch buffers so repeated calls inside a search do
/// not reallocate.
#[derive(Default)]
pub struct MoveGen {
    region: BaseRegion,
    queue: VecDeque<(usize, usize)>,
}

impl MoveGen {
    pub fn generate(&mut self, board: &Board, player: Player) -> Vec<Move> {
        let mut out = Vec::with_capacity(32);
        self.generate_into(board, player, &mut out);
        out
    }

    pub fn generate_into(&mut self, board: &Board, player: Player, out: &mut Vec<Move>) {
        out.clear();
        self.region.fill(board, player, &mut self.queue);
        if self.region.is_empty() { return; }
        let (rows, cols) = (board.rows(), board.cols());
        for (idx, &cell) in board.cells().iter().enumerate() {
            if !cell.is_targetable() || cell.is_owned_by(player) { continue; }
            let (r, c) = (idx / cols, idx % cols);
            if neighbors(rows, cols, r, c).any(|(nr, nc)| self.region.contains(board.index(nr, nc))) {
                out.push(Move::new(r, c));
            }
        }
    }

    pub fn count(&mut self, board: &Board, player: Player) -> usize {
        let mut out = Vec::new();
        self.generate_into(board, player, &mut out);
        out.len()
    }
}
