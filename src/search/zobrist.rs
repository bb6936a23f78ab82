use crate::board::{Board, Cell, PIECE_TYPES};

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Random keys for every `(row, col, piece type)` of one board size.
///
/// Empty cells hash to zero, so a full hash only folds in occupied cells and an
/// incremental update is a plain XOR-out / XOR-in. Read-only once built; wrap in
/// an `Arc` to share between concurrent searches on same-sized boards.
#[derive(Debug, Clone)]
pub struct ZobristKeys {
    rows: usize,
    cols: usize,
    keys: Vec<u64>,
}

impl ZobristKeys {
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut keys = vec![0u64; rows * cols * PIECE_TYPES];
        let mut seed = 0xF00D_F00D_DEAD_BEEF ^ ((rows as u64) << 32 | cols as u64);
        for (i, v) in keys.iter_mut().enumerate() {
            if i % PIECE_TYPES == 0 { continue; }
            seed = splitmix64(seed);
            *v = seed;
        }
        Self { rows, cols, keys }
    }

    pub fn for_board(board: &Board) -> Self { Self::new(board.rows(), board.cols()) }

    pub fn fits(&self, board: &Board) -> bool { self.rows == board.rows() && self.cols == board.cols() }

    #[inline]
    fn key(&self, row: usize, col: usize, cell: Cell) -> u64 {
        self.keys[(row * self.cols + col) * PIECE_TYPES + cell.piece_type()]
    }

    /// Full hash, O(board size). Used once at the search root.
    pub fn compute(&self, board: &Board) -> u64 {
        debug_assert!(self.fits(board));
        let mut key = 0u64;
        for r in 0..board.rows() {
            for c in 0..board.cols() {
                let cell = board.cell(r, c);
                if !cell.is_empty() { key ^= self.key(r, c, cell); }
            }
        }
        key
    }

    /// Replace `old` by `new` at `(row, col)` in `hash`, O(1).
    #[inline]
    pub fn update(&self, hash: u64, row: usize, col: usize, old: Cell, new: Cell) -> u64 {
        hash ^ self.key(row, col, old) ^ self.key(row, col, new)
    }
}
