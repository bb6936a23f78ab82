pub mod cell;
pub mod connectivity;
pub mod grid;
pub mod movegen;

pub use cell::{Cell, CellKind, Player, PIECE_TYPES};
pub use connectivity::{is_connected_to_base, BaseRegion};
pub use grid::{Board, Move, Pos};
pub use movegen::{is_legal, legal_moves, MoveGen};
