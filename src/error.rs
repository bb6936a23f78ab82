//! Configuration errors reported before any search work begins.

use thiserror::Error;

/// Malformed board snapshot or search parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("board must have at least one row and one column (got {rows}x{cols})")]
    EmptyBoard { rows: usize, cols: usize },

    #[error("row {row} has {len} cells, expected {cols}")]
    RaggedRow { row: usize, len: usize, cols: usize },

    #[error("board has {len} cells, expected {expected} for {rows}x{cols}")]
    CellCountMismatch { len: usize, expected: usize, rows: usize, cols: usize },

    #[error("invalid cell at ({row}, {col}): {reason}")]
    InvalidCell { row: usize, col: usize, reason: String },

    #[error("player id {0} is outside 1..=4")]
    PlayerOutOfRange(i64),

    #[error("player {0} has no base on this board")]
    MissingBase(u8),

    #[error("base of player {player} at ({row}, {col}) is not on the {rows}x{cols} board")]
    BaseOffBoard { player: u8, row: usize, col: usize, rows: usize, cols: usize },

    #[error("cell ({row}, {col}) is registered as player {player}'s base but does not hold it")]
    BaseMismatch { player: u8, row: usize, col: usize },

    #[error("cell ({row}, {col}) belongs to player {player}, who has no registered base")]
    UnregisteredOwner { player: u8, row: usize, col: usize },

    #[error("cell ({row}, {col}) holds a base of player {player}, whose registered base is elsewhere")]
    StrayBase { player: u8, row: usize, col: usize },

    #[error("at most four bases can be given (got {0})")]
    TooManyBases(usize),

    #[error("at least two players with bases are required (got {0})")]
    NotEnoughPlayers(usize),

    #[error("search depth must be at least 1")]
    ZeroDepth,

    #[error("time budget must be at least 1ms")]
    ZeroTimeBudget,

    #[error("exactly one of depth or time budget must be given")]
    AmbiguousMode,

    #[error("weight `{name}` = {value} is outside the supported range")]
    InvalidWeight { name: &'static str, value: f64 },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
