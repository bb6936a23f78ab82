pub mod alphabeta;
pub mod eval;
pub mod ordering;
pub mod tt;
pub mod zobrist;

pub use alphabeta::{find_best_move, find_best_move_with_keys, SearchMode, SearchParams, SearchResult, SearchStats};
pub use eval::{evaluate, Evaluator, Features, Weights};
pub use ordering::{order_moves, score_move};
pub use zobrist::ZobristKeys;
