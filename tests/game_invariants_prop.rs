//! Property tests for the board, move rules and win detection.
//!
//! Invariants covered:
//! - Incremental win detection through the last placed cell agrees with a
//!   brute-force scan of the whole board on random playouts.
//! - A four-cell line is detected whichever of its cells is named as the
//!   placed one, in all four orientations.
//! - Pieces land on the lowest empty cell; full columns reject moves and leave
//!   the session unchanged.
//! - `is_draw` holds exactly when every top cell is occupied.

use proptest::prelude::*;
use q_connect_four::game::{
    has_any_win, is_win, Board, Cell, GameSession, GameStatus, MoveError, Player, COLS, ROWS,
};

const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Reference detector: try every start cell and direction.
fn brute_force_win(board: &Board, player: Player) -> bool {
    let cell = player.to_cell();
    for row in 0..ROWS as i32 {
        for col in 0..COLS as i32 {
            for (dr, dc) in DIRECTIONS {
                let owned = (0..4).all(|k| {
                    let (r, c) = (row + k * dr, col + k * dc);
                    (0..ROWS as i32).contains(&r)
                        && (0..COLS as i32).contains(&c)
                        && board.get(r as usize, c as usize) == cell
                });
                if owned {
                    return true;
                }
            }
        }
    }
    false
}

fn board_from_cells(cells: &[Cell]) -> Board {
    let rows: Vec<String> = cells
        .chunks(COLS)
        .map(|row| row.iter().map(|c| c.symbol()).collect())
        .collect();
    let rows: [&str; ROWS] = std::array::from_fn(|i| rows[i].as_str());
    Board::from_rows(rows).expect("generated rows are well formed")
}

fn cell_strategy() -> impl Strategy<Value = Cell> {
    prop_oneof![Just(Cell::Empty), Just(Cell::Red), Just(Cell::Yellow)]
}

#[test]
fn empty_board_has_no_win_and_no_draw() {
    let board = Board::new();
    assert!(!has_any_win(&board, Player::Red));
    assert!(!has_any_win(&board, Player::Yellow));
    assert!(!board.is_draw());
    assert_eq!(board.legal_columns(), (0..COLS).collect::<Vec<_>>());
}

proptest! {
    #[test]
    fn incremental_and_full_board_detection_agree(
        moves in prop::collection::vec(0usize..COLS, 1..120),
    ) {
        let mut session = GameSession::new();

        for col in moves {
            if session.is_terminal() {
                prop_assert_eq!(session.apply_move(col), Err(MoveError::GameOver));
                break;
            }
            let before = *session.board();
            let player = session.current_player();

            if !before.is_legal(col) {
                prop_assert_eq!(session.apply_move(col), Err(MoveError::ColumnFull(col)));
                prop_assert_eq!(*session.board(), before);
                prop_assert_eq!(session.current_player(), player);
                continue;
            }

            let record = session.apply_move(col).unwrap();
            let after = *session.board();

            // Gravity: landed on the lowest empty cell of the column.
            prop_assert_eq!(before.get(record.row, col), Cell::Empty);
            for row in record.row + 1..ROWS {
                prop_assert_ne!(before.get(row, col), Cell::Empty);
            }
            prop_assert_eq!(after.get(record.row, col), player.to_cell());
            prop_assert_eq!(after.piece_count(), before.piece_count() + 1);

            let incremental = is_win(&after, player, record.row, col);
            prop_assert_eq!(incremental, brute_force_win(&after, player));
            prop_assert_eq!(incremental, has_any_win(&after, player));
            prop_assert_eq!(incremental, record.status == GameStatus::Won(player));

            if !incremental {
                prop_assert_eq!(after.is_draw(), record.status == GameStatus::Draw);
            }
        }
    }

    #[test]
    fn line_detected_from_any_of_its_cells(
        dir in 0usize..4,
        start_row in 0i32..ROWS as i32,
        start_col in 0i32..COLS as i32,
        yellow in any::<bool>(),
    ) {
        let (dr, dc) = DIRECTIONS[dir];
        let (end_row, end_col) = (start_row + 3 * dr, start_col + 3 * dc);
        prop_assume!((0..ROWS as i32).contains(&end_row));
        prop_assume!((0..COLS as i32).contains(&end_col));

        let player = if yellow { Player::Yellow } else { Player::Red };
        let mut cells = vec![Cell::Empty; ROWS * COLS];
        let line: Vec<(usize, usize)> = (0..4)
            .map(|k| ((start_row + k * dr) as usize, (start_col + k * dc) as usize))
            .collect();
        for &(r, c) in &line {
            cells[r * COLS + c] = player.to_cell();
        }
        let board = board_from_cells(&cells);

        for &(r, c) in &line {
            prop_assert!(is_win(&board, player, r, c));
            prop_assert!(!is_win(&board, player.other(), r, c));
        }
    }

    #[test]
    fn full_scan_matches_reference_on_arbitrary_boards(
        cells in prop::collection::vec(cell_strategy(), ROWS * COLS),
    ) {
        let board = board_from_cells(&cells);
        for player in [Player::Red, Player::Yellow] {
            prop_assert_eq!(has_any_win(&board, player), brute_force_win(&board, player));
        }
    }

    #[test]
    fn draw_iff_top_row_full(
        cells in prop::collection::vec(cell_strategy(), ROWS * COLS),
    ) {
        let board = board_from_cells(&cells);
        let top_full = (0..COLS).all(|col| board.get(0, col) != Cell::Empty);
        prop_assert_eq!(board.is_draw(), top_full);
        for col in 0..COLS {
            prop_assert_eq!(board.is_legal(col), board.get(0, col) == Cell::Empty);
        }
        prop_assert!(!board.is_legal(COLS));
    }
}
