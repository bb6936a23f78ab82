//! JSON request/response glue for hosts that hand the engine a game snapshot.
//!
//! Cells use the game's wire tokens: `null` for empty, `1..=4` for a normal
//! cell, `"N-fortified"`, `"N-base"` and `"killed"` (or `"neutral"`).

use crate::board::{Board, Cell, CellKind, Move, Player, Pos};
use crate::error::{ConfigError, ConfigResult};
use crate::search::{find_best_move, SearchMode, SearchParams, SearchResult, Weights};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireCell {
    Id(i64),
    Token(String),
}

impl WireCell {
    fn parse(&self) -> Result<Cell, String> {
        match self {
            WireCell::Id(id) => {
                let p = Player::new(*id).map_err(|e| e.to_string())?;
                Ok(Cell::normal(p))
            }
            WireCell::Token(tok) => parse_token(tok),
        }
    }
}

fn parse_token(tok: &str) -> Result<Cell, String> {
    if tok == "killed" || tok == "neutral" { return Ok(Cell::NEUTRAL); }
    let (id, kind) = match tok.split_once('-') {
        Some((id, "fortified")) => (id, CellKind::Fortified),
        Some((id, "base")) => (id, CellKind::Base),
        _ => return Err(format!("unknown cell token `{tok}`")),
    };
    let id: i64 = id.parse().map_err(|_| format!("unknown cell token `{tok}`"))?;
    let p = Player::new(id).map_err(|e| e.to_string())?;
    Cell::new(p.id(), kind).map_err(|e| format!("{e} in `{tok}`"))
}

/// Wire form of one cell; `None` is an empty cell.
pub fn encode_cell(cell: Cell) -> Option<WireCell> {
    let id = cell.owner_id();
    match cell.kind() {
        _ if cell.is_empty() => None,
        CellKind::Neutral => Some(WireCell::Token("killed".into())),
        CellKind::Normal => Some(WireCell::Id(id as i64)),
        CellKind::Fortified => Some(WireCell::Token(format!("{id}-fortified"))),
        CellKind::Base => Some(WireCell::Token(format!("{id}-base"))),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub rows: usize,
    pub cols: usize,
    pub board: Vec<Vec<Option<WireCell>>>,
    pub player: i64,
    /// Index `i` holds the base of player `i + 1`.
    pub bases: Vec<Option<Pos>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Weights>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_budget_ms: Option<u64>,
}

impl SearchRequest {
    /// Snapshot `board` into a request with the given mode.
    pub fn from_board(board: &Board, player: Player, mode: SearchMode) -> Self {
        let grid = (0..board.rows()).map(|r| (0..board.cols()).map(|c| encode_cell(board.cell(r, c))).collect()).collect();
        let (depth, time_budget_ms) = match mode {
            SearchMode::Depth(d) => (Some(d), None),
            SearchMode::TimeBudget(t) => (None, Some(t.as_millis() as u64)),
        };
        Self {
            rows: board.rows(),
            cols: board.cols(),
            board: grid,
            player: player.id() as i64,
            bases: board.bases().to_vec(),
            weights: None,
            depth,
            time_budget_ms,
        }
    }

    pub fn board(&self) -> ConfigResult<Board> {
        let (rows, cols) = (self.rows, self.cols);
        if rows == 0 || cols == 0 { return Err(ConfigError::EmptyBoard { rows, cols }); }
        if self.board.len() != rows {
            let len = self.board.iter().map(Vec::len).sum();
            return Err(ConfigError::CellCountMismatch { len, expected: rows * cols, rows, cols });
        }
        let mut cells = Vec::with_capacity(rows * cols);
        for (row, line) in self.board.iter().enumerate() {
            if line.len() != cols { return Err(ConfigError::RaggedRow { row, len: line.len(), cols }); }
            for (col, wire) in line.iter().enumerate() {
                let cell = match wire {
                    None => Cell::EMPTY,
                    Some(w) => w.parse().map_err(|reason| ConfigError::InvalidCell { row, col, reason })?,
                };
                cells.push(cell);
            }
        }
        if self.bases.len() > 4 { return Err(ConfigError::TooManyBases(self.bases.len())); }
        let mut bases = [None; 4];
        for (slot, b) in bases.iter_mut().zip(&self.bases) { *slot = *b; }
        Board::new(rows, cols, cells, bases)
    }

    pub fn params(&self) -> ConfigResult<SearchParams> {
        let mode = match (self.depth, self.time_budget_ms) {
            (Some(0), None) => return Err(ConfigError::ZeroDepth),
            (Some(d), None) => SearchMode::Depth(d),
            (None, Some(0)) => return Err(ConfigError::ZeroTimeBudget),
            (None, Some(ms)) => SearchMode::TimeBudget(Duration::from_millis(ms)),
            _ => return Err(ConfigError::AmbiguousMode),
        };
        let params = SearchParams { mode, weights: self.weights.unwrap_or_default(), ..SearchParams::default() };
        params.validate()?;
        Ok(params)
    }

    /// Validate everything and split into engine inputs.
    pub fn into_parts(&self) -> ConfigResult<(Board, Player, SearchParams)> {
        let board = self.board()?;
        let player = Player::new(self.player)?;
        if !board.is_active(player) { return Err(ConfigError::MissingBase(player.id())); }
        Ok((board, player, self.params()?))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "move")]
    pub best_move: Option<Move>,
    pub score: f64,
    pub depth: u32,
    pub nodes: u64,
}

impl From<&SearchResult> for SearchResponse {
    fn from(r: &SearchResult) -> Self {
        Self { best_move: r.best_move, score: r.score, depth: r.depth, nodes: r.stats.nodes }
    }
}

/// Parse, search and answer one request. `adjust` may tweak the parameters
/// (threads, table size) before the search runs.
pub fn handle(req: &SearchRequest, adjust: impl FnOnce(&mut SearchParams)) -> ConfigResult<SearchResponse> {
    let (board, player, mut params) = req.into_parts()?;
    adjust(&mut params);
    let result = find_best_move(&board, player, &params)?;
    Ok(SearchResponse::from(&result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_parse_exactly() {
        assert_eq!(parse_token("2-fortified"), Ok(Cell::fortified(Player::TWO)));
        assert_eq!(parse_token("3-base"), Ok(Cell::base(Player::THREE)));
        assert_eq!(parse_token("killed"), Ok(Cell::NEUTRAL));
        assert!(parse_token("2-fortifiedx").is_err());
        assert!(parse_token("x-base").is_err());
        assert!(parse_token("5-base").is_err());
        assert!(parse_token("1-base-fortified").is_err());
        assert!(parse_token("2").is_err());
        assert!(parse_token("0-fortified").is_err());
    }

    #[test]
    fn encode_is_inverse_of_parse() {
        for cell in [Cell::normal(Player::ONE), Cell::fortified(Player::FOUR), Cell::base(Player::TWO), Cell::NEUTRAL] {
            let wire = encode_cell(cell).expect("occupied");
            assert_eq!(wire.parse(), Ok(cell));
        }
        assert_eq!(encode_cell(Cell::EMPTY), None);
    }

    #[test]
    fn mode_must_be_exactly_one() {
        let b = Board::starting(4, 4, 2).unwrap();
        let mut req = SearchRequest::from_board(&b, Player::ONE, SearchMode::Depth(2));
        req.time_budget_ms = Some(100);
        assert_eq!(req.params().unwrap_err(), ConfigError::AmbiguousMode);
        req.depth = None;
        req.time_budget_ms = None;
        assert_eq!(req.params().unwrap_err(), ConfigError::AmbiguousMode);
    }
}
