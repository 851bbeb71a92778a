use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{Board, COLS, ROWS};

/// Exact, collision-free key for a board position.
///
/// One symbol per cell (`.` empty, `R` red, `Y` yellow), row-major starting
/// at the top row, so two boards share a fingerprint iff their cells match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(board: &Board) -> Self {
        let mut encoded = String::with_capacity(ROWS * COLS);
        encoded.extend(board.cells().map(|cell| cell.symbol()));
        Fingerprint(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Board> for Fingerprint {
    fn from(board: &Board) -> Self {
        Fingerprint::of(board)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
