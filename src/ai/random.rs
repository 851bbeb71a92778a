use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use super::agent::Agent;
use crate::game::Board;

/// An agent that selects uniformly at random from legal columns.
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_move(&mut self, board: &Board, _training: bool) -> Option<usize> {
        board.legal_columns().choose(&mut self.rng).copied()
    }

    fn name(&self) -> &str {
        "Random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, GameSession, COLS, ROWS};

    #[test]
    fn test_random_agent_selects_legal_column() {
        let mut agent = RandomAgent::with_seed(7);
        let mut board = Board::new();
        for _ in 0..ROWS {
            board.drop_piece(3, Cell::Red).unwrap();
        }

        for _ in 0..100 {
            let col = agent.select_move(&board, false).unwrap();
            assert!(board.is_legal(col), "column {col} is not legal");
        }
    }

    #[test]
    fn test_random_agent_none_on_full_board() {
        let mut agent = RandomAgent::with_seed(1);
        let mut board = Board::new();
        for col in 0..COLS {
            for _ in 0..ROWS {
                board.drop_piece(col, Cell::Yellow).unwrap();
            }
        }
        assert_eq!(agent.select_move(&board, true), None);
    }

    #[test]
    fn test_random_agent_plays_full_game() {
        let mut agent1 = RandomAgent::new();
        let mut agent2 = RandomAgent::new();
        let mut session = GameSession::new();

        let mut turn = 0;
        while !session.is_terminal() {
            let col = if turn % 2 == 0 {
                agent1.select_move(session.board(), false)
            } else {
                agent2.select_move(session.board(), false)
            }
            .unwrap();
            session.apply_move(col).unwrap();
            turn += 1;
        }

        assert!(session.is_terminal());
        assert!(turn <= ROWS * COLS);
    }

    #[test]
    fn test_random_agent_name() {
        let agent = RandomAgent::new();
        assert_eq!(agent.name(), "Random");
    }
}
