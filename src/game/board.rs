use std::fmt;

use super::state::MoveError;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

impl Cell {
    /// Single-character code shared by fingerprints and `Board::from_rows`.
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Red => 'R',
            Cell::Yellow => 'Y',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Cell> {
        match symbol {
            '.' => Some(Cell::Empty),
            'R' => Some(Cell::Red),
            'Y' => Some(Cell::Yellow),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Build a board from six rows of seven symbols (`.`, `R`, `Y`), top row
    /// first. Gravity is not enforced, so this can describe positions that
    /// never arise in play.
    pub fn from_rows(rows: [&str; ROWS]) -> Option<Self> {
        let mut board = Board::new();
        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != COLS {
                return None;
            }
            for (col, symbol) in line.chars().enumerate() {
                board.cells[row][col] = Cell::from_symbol(symbol)?;
            }
        }
        Some(board)
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row 5 is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Row-major iterator over all 42 cells, top row first.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().flat_map(|row| row.iter().copied())
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        self.cells[0][col] != Cell::Empty
    }

    /// A move is legal iff the column exists and its top cell is empty.
    pub fn is_legal(&self, col: usize) -> bool {
        !self.is_column_full(col)
    }

    /// Columns that can still take a piece, ascending.
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| self.is_legal(col)).collect()
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, cell: Cell) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn(col));
        }

        if self.is_column_full(col) {
            return Err(MoveError::ColumnFull(col));
        }

        // Find the lowest empty row in this column
        for row in (0..ROWS).rev() {
            if self.cells[row][col] == Cell::Empty {
                self.cells[row][col] = cell;
                return Ok(row);
            }
        }

        unreachable!("Column should not be full if is_column_full returned false");
    }

    /// The board is drawn once every top cell is occupied.
    pub fn is_draw(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    /// Number of occupied cells.
    pub fn piece_count(&self) -> usize {
        self.cells().filter(|&cell| cell != Cell::Empty).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: String = row
                .iter()
                .map(|cell| cell.symbol().to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{line}")?;
        }
        let footer: Vec<String> = (0..COLS).map(|col| col.to_string()).collect();
        write!(f, "{}", footer.join(" "))
    }
}
