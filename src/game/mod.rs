//! Board model shared by both games: cells, moves, win detection, and an
//! immutable game-state wrapper used to play full games.

mod board;
mod side;
mod state;

pub use board::{
    win_length_for, Board, Cell, Move, Signature, Variant, DROP_COLS, DROP_ROWS, DROP_WIN_LENGTH,
    MAX_SIZE, MIN_SIZE,
};
pub use side::Side;
pub use state::{GameOutcome, GameState};
