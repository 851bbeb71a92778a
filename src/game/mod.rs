//! Core Connect Four game logic: board and move rules, player types, win
//! detection and the per-game session state machine.

mod board;
mod player;
mod state;
pub mod win;

pub use board::{Board, Cell, COLS, ROWS};
pub use player::Player;
pub use state::{GameSession, GameStatus, MoveError, MoveRecord};
pub use win::{has_any_win, is_win};
