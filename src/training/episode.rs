use crate::ai::{Agent, QLearningAgent, Reward};
use crate::error::TrainingError;
use crate::game::{Board, GameSession, GameStatus, Player};
use crate::training::metrics::{EpisodeResult, EvalResult, LearnerOutcome};
use crate::training::trainer::{LossCredit, TrainerConfig};

/// Play one training episode of `learner` against `opponent` and update the
/// learner's table along the way.
///
/// The learner explores; the opponent is always asked for a greedy, legal
/// column. The learner's episode counter advances once the game is over.
pub fn play_training_episode(
    learner: &mut QLearningAgent,
    opponent: &mut dyn Agent,
    config: &TrainerConfig,
) -> Result<EpisodeResult, TrainingError> {
    let mut session = GameSession::new();
    let mut illegal_attempts = 0;
    let mut last_learner_move: Option<(Board, usize)> = None;

    while !session.is_terminal() {
        let board = *session.board();

        if session.current_player() == config.learner_side {
            let col = learner_column(
                learner,
                &board,
                config.max_illegal_retries,
                &mut illegal_attempts,
            )?;
            let record = session.apply_move(col)?;
            last_learner_move = Some((board, col));

            match record.status {
                GameStatus::Won(_) => learner.assign_reward(&board, col, Reward::Win),
                GameStatus::InProgress => {
                    learner.temporal_difference_update(&board, col, session.board());
                }
                GameStatus::Draw => {}
            }
        } else {
            let col = opponent
                .select_move(&board, false)
                .ok_or(TrainingError::NoLegalMoves)?;
            if !board.is_legal(col) {
                return Err(TrainingError::IllegalOpponentMove {
                    column: col,
                    legal: board.legal_columns(),
                });
            }
            let record = session.apply_move(col)?;

            if let GameStatus::Won(_) = record.status {
                let (credit_board, credit_col) = match config.loss_credit {
                    LossCredit::OpponentMove => (board, col),
                    LossCredit::LearnerMove => last_learner_move.unwrap_or((board, col)),
                };
                learner.assign_reward(&credit_board, credit_col, Reward::Loss);
            }
        }
    }

    learner.finish_episode();

    let outcome = LearnerOutcome::from_status(session.status(), config.learner_side)
        .ok_or(TrainingError::NoLegalMoves)?;
    log::debug!(
        "episode {} finished: {} after {} moves ({} illegal picks)",
        learner.episode_count(),
        session.message(),
        session.move_count(),
        illegal_attempts
    );

    Ok(EpisodeResult {
        outcome,
        game_length: session.move_count(),
        illegal_attempts,
    })
}

/// Ask the learner for a legal column, penalizing every illegal pick.
///
/// After `max_retries` consecutive illegal picks the learner's greedy legal
/// column is used instead.
fn learner_column(
    learner: &mut QLearningAgent,
    board: &Board,
    max_retries: usize,
    illegal_attempts: &mut usize,
) -> Result<usize, TrainingError> {
    let mut retries = 0;
    loop {
        let col = learner
            .select_move(board, true)
            .ok_or(TrainingError::NoLegalMoves)?;
        if board.is_legal(col) {
            return Ok(col);
        }

        learner.assign_reward(board, col, Reward::IllegalMove);
        *illegal_attempts += 1;
        retries += 1;

        if retries >= max_retries {
            log::warn!(
                "learner picked illegal columns {} times in a row, playing its best legal column",
                retries
            );
            return learner
                .greedy_legal_column(board)
                .ok_or(TrainingError::NoLegalMoves);
        }
    }
}

/// Play a single greedy game between two agents. Returns the outcome for
/// `agent`, who plays `agent_side`.
pub fn play_eval_game(
    agent: &mut dyn Agent,
    opponent: &mut dyn Agent,
    agent_side: Player,
) -> Result<LearnerOutcome, TrainingError> {
    let mut session = GameSession::new();

    while !session.is_terminal() {
        let board = *session.board();
        let mover: &mut dyn Agent = if session.current_player() == agent_side {
            &mut *agent
        } else {
            &mut *opponent
        };
        let col = mover
            .select_move(&board, false)
            .ok_or(TrainingError::NoLegalMoves)?;
        session.apply_move(col)?;
    }

    LearnerOutcome::from_status(session.status(), agent_side).ok_or(TrainingError::NoLegalMoves)
}

/// Evaluate `agent` against `opponent` over `games` games, alternating sides.
pub fn evaluate(
    agent: &mut dyn Agent,
    opponent: &mut dyn Agent,
    games: usize,
) -> Result<EvalResult, TrainingError> {
    let mut result = EvalResult::default();
    for game_idx in 0..games {
        let side = if game_idx % 2 == 0 {
            Player::Red
        } else {
            Player::Yellow
        };
        result.record(play_eval_game(agent, opponent, side)?);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{Fingerprint, QConfig, RandomAgent};
    use crate::game::COLS;

    /// Plays a fixed column sequence, falling back to the first legal column.
    struct ScriptedAgent {
        moves: Vec<usize>,
        next: usize,
    }

    impl ScriptedAgent {
        fn new(moves: &[usize]) -> Self {
            ScriptedAgent {
                moves: moves.to_vec(),
                next: 0,
            }
        }
    }

    impl Agent for ScriptedAgent {
        fn select_move(&mut self, board: &Board, _training: bool) -> Option<usize> {
            let scripted = self.moves.get(self.next).copied();
            self.next += 1;
            match scripted {
                Some(col) if col >= COLS || board.is_legal(col) => Some(col),
                _ => board.legal_columns().first().copied(),
            }
        }

        fn name(&self) -> &str {
            "Scripted"
        }
    }

    /// A learner that always exploits.
    fn greedy_learner(seed: u64) -> QLearningAgent {
        let mut learner = QLearningAgent::with_seed(
            QConfig {
                decay_base: 1e-12,
                ..Default::default()
            },
            seed,
        );
        learner.finish_episode();
        learner
    }

    /// Boards seen before each of `learner_moves`, given alternating play
    /// starting with Red.
    fn learner_boards(learner_moves: &[usize], opponent_moves: &[usize]) -> Vec<Board> {
        let mut session = GameSession::new();
        let mut boards = Vec::new();
        for (i, &col) in learner_moves.iter().enumerate() {
            boards.push(*session.board());
            session.apply_move(col).unwrap();
            if let Some(&reply) = opponent_moves.get(i) {
                if !session.is_terminal() {
                    session.apply_move(reply).unwrap();
                }
            }
        }
        boards
    }

    #[test]
    fn test_random_episode_terminates_and_counts_once() {
        let mut learner = QLearningAgent::with_seed(QConfig::default(), 1);
        let mut opponent = RandomAgent::with_seed(2);
        let config = TrainerConfig::default();

        let result = play_training_episode(&mut learner, &mut opponent, &config).unwrap();
        assert!(result.game_length >= 7);
        assert!(result.game_length <= 42);
        assert_eq!(learner.episode_count(), 1);
        assert!(learner.table_size() > 0);
    }

    #[test]
    fn test_learner_win_rewards_winning_slot() {
        let learner_moves = [3, 3, 3, 3];
        let opponent_moves = [4, 4, 4];
        let boards = learner_boards(&learner_moves, &opponent_moves);

        let mut learner = greedy_learner(3);
        for board in &boards {
            learner.assign_reward(board, 3, Reward::Win);
        }
        let mut opponent = ScriptedAgent::new(&opponent_moves);
        let config = TrainerConfig::default();

        let result = play_training_episode(&mut learner, &mut opponent, &config).unwrap();
        assert_eq!(result.outcome, LearnerOutcome::Win);
        assert_eq!(result.game_length, 7);
        assert_eq!(learner.values(&boards[3])[3], 1.0);
        // earlier slots were revised by temporal-difference updates
        assert!(learner.values(&boards[0])[3] < 1.0);
        assert_eq!(learner.episode_count(), 2);
    }

    fn losing_setup(seed: u64) -> (QLearningAgent, Vec<Board>, Board) {
        let learner_moves = [0, 1, 5, 6];
        let opponent_moves = [3, 3, 3, 3];
        let boards = learner_boards(&learner_moves, &opponent_moves[..3]);

        let mut learner = greedy_learner(seed);
        for (board, &col) in boards.iter().zip(&learner_moves) {
            learner.assign_reward(board, col, Reward::Win);
        }

        let mut before_loss = boards[3];
        before_loss.drop_piece(6, Player::Red.to_cell()).unwrap();
        (learner, boards, before_loss)
    }

    #[test]
    fn test_loss_credited_to_opponent_move() {
        let (mut learner, _boards, before_loss) = losing_setup(4);
        let mut opponent = ScriptedAgent::new(&[3, 3, 3, 3]);
        let config = TrainerConfig::default();

        let result = play_training_episode(&mut learner, &mut opponent, &config).unwrap();
        assert_eq!(result.outcome, LearnerOutcome::Loss);
        assert_eq!(result.game_length, 8);
        assert_eq!(learner.values(&before_loss)[3], -1.0);
    }

    #[test]
    fn test_loss_credited_to_learner_move() {
        let (mut learner, boards, before_loss) = losing_setup(5);
        let mut opponent = ScriptedAgent::new(&[3, 3, 3, 3]);
        let config = TrainerConfig {
            loss_credit: LossCredit::LearnerMove,
            ..Default::default()
        };

        play_training_episode(&mut learner, &mut opponent, &config).unwrap();
        assert_eq!(learner.values(&boards[3])[6], -1.0);
        assert!(learner.values(&before_loss)[3] >= 0.0);
    }

    #[test]
    fn test_illegal_learner_pick_is_penalized() {
        // Both sides fill column 0 without four in a row.
        let learner_moves = [0, 0, 0, 0];
        let opponent_moves = [0, 0, 0];
        let boards = learner_boards(&learner_moves[..3], &opponent_moves);
        let mut full = boards[2];
        full.drop_piece(0, Player::Red.to_cell()).unwrap();
        full.drop_piece(0, Player::Yellow.to_cell()).unwrap();
        assert!(!full.is_legal(0));

        let mut learner = greedy_learner(6);
        for board in boards.iter().chain(std::iter::once(&full)) {
            learner.assign_reward(board, 0, Reward::Win);
        }
        let mut opponent = ScriptedAgent::new(&opponent_moves);
        let config = TrainerConfig::default();

        let result = play_training_episode(&mut learner, &mut opponent, &config).unwrap();
        assert!(result.illegal_attempts >= 1);
        assert_eq!(learner.values(&full)[0], -0.1);
        assert_eq!(learner.episode_count(), 2);
    }

    #[test]
    fn test_learner_retries_are_bounded() {
        let mut board = Board::new();
        for i in 0..6 {
            let player = if i % 2 == 0 { Player::Red } else { Player::Yellow };
            board.drop_piece(0, player.to_cell()).unwrap();
        }

        let mut learner = greedy_learner(7);
        learner.assign_reward(&board, 0, Reward::Win);
        for col in 1..COLS {
            learner.assign_reward(&board, col, Reward::Loss);
        }

        let mut attempts = 0;
        let col = learner_column(&mut learner, &board, 3, &mut attempts).unwrap();
        assert_eq!(attempts, 3);
        assert_eq!(col, 1);
    }

    #[test]
    fn test_illegal_opponent_move_is_surfaced() {
        let mut learner = QLearningAgent::with_seed(QConfig::default(), 8);
        let mut opponent = ScriptedAgent::new(&[9]);
        let config = TrainerConfig::default();

        let err = play_training_episode(&mut learner, &mut opponent, &config).unwrap_err();
        assert!(
            matches!(err, TrainingError::IllegalOpponentMove { column: 9, ref legal } if legal.len() == COLS),
            "unexpected error: {err}"
        );
        assert_eq!(learner.episode_count(), 0);
    }

    #[test]
    fn test_learner_can_play_yellow() {
        let mut learner = QLearningAgent::with_seed(QConfig::default(), 9);
        let mut opponent = RandomAgent::with_seed(10);
        let config = TrainerConfig {
            learner_side: Player::Yellow,
            ..Default::default()
        };

        for _ in 0..20 {
            play_training_episode(&mut learner, &mut opponent, &config).unwrap();
        }
        assert_eq!(learner.episode_count(), 20);
        // Yellow never sees the empty board.
        assert!(learner.store().get(&Fingerprint::of(&Board::new())).is_none());
    }

    #[test]
    fn test_play_eval_game_terminates() {
        let mut agent = RandomAgent::with_seed(11);
        let mut opponent = RandomAgent::with_seed(12);
        play_eval_game(&mut agent, &mut opponent, Player::Red).unwrap();
    }

    #[test]
    fn test_evaluate_counts_every_game() {
        let mut agent = QLearningAgent::with_seed(QConfig::default(), 13);
        let mut opponent = RandomAgent::with_seed(14);

        let result = evaluate(&mut agent, &mut opponent, 10).unwrap();
        assert_eq!(result.games(), 10);
        assert_eq!(agent.episode_count(), 0);
    }
}
