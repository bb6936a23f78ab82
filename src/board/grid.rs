use crate::board::cell::{Cell, CellKind, Player};
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(row: usize, col: usize) -> Self { Self { row, col } }

    pub fn manhattan(self, other: Pos) -> usize { self.row.abs_diff(other.row) + self.col.abs_diff(other.col) }
}

/// A move targets one cell. Whether it expands or captures follows from what the
/// target holds when the move is played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub fn new(row: usize, col: usize) -> Self { Self { row, col } }
    pub fn pos(self) -> Pos { Pos::new(self.row, self.col) }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "({},{})", self.row, self.col) }
}

const DIRS: [(isize, isize); 8] = [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

/// 8-neighbourhood of `(row, col)` clipped to a `rows x cols` grid.
pub fn neighbors(rows: usize, cols: usize, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> {
    DIRS.iter().filter_map(move |&(dr, dc)| {
        let r = row as isize + dr;
        let c = col as isize + dc;
        if r >= 0 && c >= 0 && (r as usize) < rows && (c as usize) < cols { Some((r as usize, c as usize)) } else { None }
    })
}

/// Rectangular board snapshot plus the authoritative base position of every
/// active player. Dimensions never change after construction.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    bases: [Option<Pos>; 4],
}

impl Board {
    /// Validate and build a board from row-major cells.
    pub fn new(rows: usize, cols: usize, cells: Vec<Cell>, bases: [Option<Pos>; 4]) -> ConfigResult<Self> {
        if rows == 0 || cols == 0 { return Err(ConfigError::EmptyBoard { rows, cols }); }
        if cells.len() != rows * cols {
            return Err(ConfigError::CellCountMismatch { len: cells.len(), expected: rows * cols, rows, cols });
        }
        let board = Self { rows, cols, cells, bases };
        board.validate()?;
        Ok(board)
    }

    pub fn from_rows(grid: Vec<Vec<Cell>>, bases: [Option<Pos>; 4]) -> ConfigResult<Self> {
        let rows = grid.len();
        let cols = grid.first().map_or(0, |r| r.len());
        let mut cells = Vec::with_capacity(rows * cols);
        for (row, line) in grid.into_iter().enumerate() {
            if line.len() != cols { return Err(ConfigError::RaggedRow { row, len: line.len(), cols }); }
            cells.extend(line);
        }
        Self::new(rows, cols, cells, bases)
    }

    /// Opening position: bases in the corners, P1 top-left, P2 bottom-right,
    /// P3 top-right, P4 bottom-left.
    pub fn starting(rows: usize, cols: usize, players: usize) -> ConfigResult<Self> {
        if !(2..=4).contains(&players) { return Err(ConfigError::NotEnoughPlayers(players)); }
        if rows < 2 || cols < 2 { return Err(ConfigError::EmptyBoard { rows, cols }); }
        let corners = [Pos::new(0, 0), Pos::new(rows - 1, cols - 1), Pos::new(0, cols - 1), Pos::new(rows - 1, 0)];
        let mut cells = vec![Cell::EMPTY; rows * cols];
        let mut bases = [None; 4];
        for (p, &corner) in Player::ALL.iter().zip(corners.iter()).take(players) {
            cells[corner.row * cols + corner.col] = Cell::base(*p);
            bases[p.index()] = Some(corner);
        }
        Self::new(rows, cols, cells, bases)
    }

    /// Parse a whitespace-separated grid: `.` empty, `x` neutral, `N` normal,
    /// `Nf` fortified, `Nb` base. Bases are registered where their cells appear.
    pub fn from_ascii(text: &str) -> ConfigResult<Self> {
        let mut grid = Vec::new();
        let mut bases = [None; 4];
        for (row, line) in text.lines().map(str::trim).filter(|l| !l.is_empty()).enumerate() {
            let mut cells = Vec::new();
            for (col, tok) in line.split_whitespace().enumerate() {
                let cell = parse_ascii_cell(tok).ok_or_else(|| ConfigError::InvalidCell {
                    row, col, reason: format!("unknown token `{tok}`"),
                })?;
                if let (CellKind::Base, Some(p)) = (cell.kind(), cell.owner()) { bases[p.index()] = Some(Pos::new(row, col)); }
                cells.push(cell);
            }
            grid.push(cells);
        }
        Self::from_rows(grid, bases)
    }

    fn validate(&self) -> ConfigResult<()> {
        let mut active = 0;
        for p in Player::ALL {
            let Some(pos) = self.bases[p.index()] else { continue };
            active += 1;
            if pos.row >= self.rows || pos.col >= self.cols {
                return Err(ConfigError::BaseOffBoard { player: p.id(), row: pos.row, col: pos.col, rows: self.rows, cols: self.cols });
            }
            if self.cell(pos.row, pos.col) != Cell::base(p) {
                return Err(ConfigError::BaseMismatch { player: p.id(), row: pos.row, col: pos.col });
            }
        }
        for (i, c) in self.cells.iter().enumerate() {
            let Some(p) = c.owner() else { continue };
            let (row, col) = (i / self.cols, i % self.cols);
            match self.bases[p.index()] {
                None => return Err(ConfigError::UnregisteredOwner { player: p.id(), row, col }),
                Some(base) if c.is_base() && base != Pos::new(row, col) => {
                    return Err(ConfigError::StrayBase { player: p.id(), row, col });
                }
                Some(_) => {}
            }
        }
        if active < 2 { return Err(ConfigError::NotEnoughPlayers(active)); }
        Ok(())
    }

    pub fn rows(&self) -> usize { self.rows }
    pub fn cols(&self) -> usize { self.cols }
    pub fn len(&self) -> usize { self.cells.len() }
    pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize { row * self.cols + col }

    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Cell { self.cells[row * self.cols + col] }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.rows && col < self.cols { Some(self.cell(row, col)) } else { None }
    }

    pub fn cells(&self) -> &[Cell] { &self.cells }

    pub fn base(&self, p: Player) -> Option<Pos> { self.bases[p.index()] }
    pub fn bases(&self) -> [Option<Pos>; 4] { self.bases }

    pub fn is_active(&self, p: Player) -> bool { self.bases[p.index()].is_some() }

    /// Players with a registered base, in id order.
    pub fn players(&self) -> impl Iterator<Item = Player> + '_ {
        Player::ALL.into_iter().filter(move |&p| self.is_active(p))
    }

    pub fn opponents(&self, p: Player) -> impl Iterator<Item = Player> + '_ {
        self.players().filter(move |&o| o != p)
    }

    /// Next active player after `p` in cyclic id order; `p` itself when alone.
    pub fn next_player(&self, p: Player) -> Player {
        (1..=4)
            .map(|k| Player::ALL[(p.index() + k) % 4])
            .find(|&o| self.is_active(o))
            .unwrap_or(p)
    }

    /// Distance from `pos` to the closest base of any opponent of `p`.
    pub fn nearest_opponent_base_distance(&self, p: Player, pos: Pos) -> Option<usize> {
        self.opponents(p).filter_map(|o| self.base(o)).map(|b| b.manhattan(pos)).min()
    }

    pub fn neighbors(&self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> {
        neighbors(self.rows, self.cols, row, col)
    }

    /// Play `mv` for `player` in place and return `(old, new)` cell values.
    ///
    /// Empty becomes `Normal(player)`, an enemy normal cell becomes
    /// `Fortified(player)`. Any other target is a caller bug; the board is left
    /// untouched in that case.
    pub fn apply(&mut self, mv: Move, player: Player) -> (Cell, Cell) {
        let idx = self.index(mv.row, mv.col);
        let old = self.cells[idx];
        debug_assert!(old.is_empty() || (old.is_targetable() && old.is_enemy_of(player)), "illegal target {mv} for {player}: {old:?}");
        let new = if old.is_empty() {
            Cell::normal(player)
        } else if old.is_targetable() && old.is_enemy_of(player) {
            Cell::fortified(player)
        } else {
            old
        };
        self.cells[idx] = new;
        (old, new)
    }

    /// Copy-on-write variant of [`Board::apply`].
    pub fn with_move(&self, mv: Move, player: Player) -> Board {
        let mut child = self.clone();
        child.apply(mv, player);
        child
    }
}

fn parse_ascii_cell(tok: &str) -> Option<Cell> {
    match tok {
        "." => return Some(Cell::EMPTY),
        "x" => return Some(Cell::NEUTRAL),
        _ => {}
    }
    let mut chars = tok.chars();
    let p = Player::new(chars.next()?.to_digit(10)? as i64).ok()?;
    match chars.as_str() {
        "" => Some(Cell::normal(p)),
        "f" => Some(Cell::fortified(p)),
        "b" => Some(Cell::base(p)),
        _ => None,
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{self}") }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            let line: Vec<String> = (0..self.cols).map(|c| format!("{:?}", self.cell(r, c))).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
