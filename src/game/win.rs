//! Four-in-a-row detection local to the most recently played cell.

use super::board::{Board, COLS, ROWS};
use super::player::Player;

/// Length of a winning line.
pub const LINE: i32 = 4;

/// (row step, column step) for vertical, horizontal, `\` and `/` lines.
const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// True if `player` owns four in a row through `(row, col)`.
///
/// Every 4-cell window along each of the four orientations that contains the
/// played cell is checked. Windows reaching past the board edge never match.
pub fn is_win(board: &Board, player: Player, row: usize, col: usize) -> bool {
    let (row, col) = (row as i32, col as i32);
    DIRECTIONS.iter().any(|&(dr, dc)| {
        (0..LINE).any(|offset| {
            window_filled(board, player, row - offset * dr, col - offset * dc, dr, dc)
        })
    })
}

/// Full-board scan: true if `player` owns any four in a row anywhere.
pub fn has_any_win(board: &Board, player: Player) -> bool {
    let cell = player.to_cell();
    (0..ROWS).any(|row| {
        (0..COLS).any(|col| board.get(row, col) == cell && is_win(board, player, row, col))
    })
}

fn window_filled(board: &Board, player: Player, row: i32, col: i32, dr: i32, dc: i32) -> bool {
    let cell = player.to_cell();
    (0..LINE).all(|k| {
        let r = row + k * dr;
        let c = col + k * dc;
        in_bounds(r, c) && board.get(r as usize, c as usize) == cell
    })
}

fn in_bounds(row: i32, col: i32) -> bool {
    (0..ROWS as i32).contains(&row) && (0..COLS as i32).contains(&col)
}
