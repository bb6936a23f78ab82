// Territory-capture move search: board model, evaluation and alpha-beta engine
pub mod board;
pub mod error;
pub mod search;
pub mod snapshot;

pub use board::{Board, Cell, Move, Player, Pos};
pub use error::{ConfigError, ConfigResult};
pub use search::{find_best_move, SearchMode, SearchParams, SearchResult, SearchStats, Weights};
