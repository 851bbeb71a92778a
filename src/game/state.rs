use std::fmt;

use super::board::Board;
use super::player::Player;
use super::win::is_win;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won(Player),
    Draw,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "in progress"),
            GameStatus::Won(player) => write!(f, "win:{}", player.name().to_lowercase()),
            GameStatus::Draw => write!(f, "draw"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {0} is out of range")]
    InvalidColumn(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("game is already over")]
    GameOver,
}

impl MoveError {
    /// True for the illegal-move kind (bad or full column), false once the
    /// game has already been decided.
    pub fn is_illegal(&self) -> bool {
        matches!(self, MoveError::InvalidColumn(_) | MoveError::ColumnFull(_))
    }
}

/// What a successful `apply_move` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub player: Player,
    pub row: usize,
    pub col: usize,
    pub status: GameStatus,
}

/// One game from empty board to a terminal outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSession {
    board: Board,
    current_player: Player,
    status: GameStatus,
    last_move: Option<(usize, usize)>,
    move_count: usize,
}

impl GameSession {
    /// Fresh session: empty board, Red to move.
    pub fn new() -> Self {
        GameSession {
            board: Board::new(),
            current_player: Player::Red,
            status: GameStatus::InProgress,
            last_move: None,
            move_count: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = GameSession::new();
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.status != GameStatus::InProgress
    }

    /// `(row, col)` of the most recent placement.
    pub fn last_move(&self) -> Option<(usize, usize)> {
        self.last_move
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    /// Human-readable outcome label: "in progress", "win:red", "win:yellow" or "draw".
    pub fn message(&self) -> String {
        self.status.to_string()
    }

    /// Get list of legal columns (not full). Empty once the game is over.
    pub fn legal_columns(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.legal_columns()
    }

    /// Apply a move for the side to move.
    ///
    /// The side only changes when the game continues; after a win the winner
    /// stays recorded as the current player.
    pub fn apply_move(&mut self, column: usize) -> Result<MoveRecord, MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let player = self.current_player;
        let row = self.board.drop_piece(column, player.to_cell())?;
        self.last_move = Some((row, column));
        self.move_count += 1;

        if is_win(&self.board, player, row, column) {
            self.status = GameStatus::Won(player);
        } else if self.board.is_draw() {
            self.status = GameStatus::Draw;
        } else {
            self.current_player = player.other();
        }

        Ok(MoveRecord {
            player,
            row,
            col: column,
            status: self.status,
        })
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
