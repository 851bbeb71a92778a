use std::collections::VecDeque;

use crate::checkpoint::CheckpointMetrics;
use crate::game::{GameStatus, Player};

/// How a finished game went, seen from one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnerOutcome {
    Win,
    Loss,
    Draw,
}

impl LearnerOutcome {
    /// `None` while the game is still in progress.
    pub fn from_status(status: GameStatus, side: Player) -> Option<Self> {
        match status {
            GameStatus::InProgress => None,
            GameStatus::Draw => Some(LearnerOutcome::Draw),
            GameStatus::Won(winner) if winner == side => Some(LearnerOutcome::Win),
            GameStatus::Won(_) => Some(LearnerOutcome::Loss),
        }
    }
}

/// Result of a single training episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeResult {
    pub outcome: LearnerOutcome,
    pub game_length: usize,
    pub illegal_attempts: usize,
}

/// Tally of a batch of evaluation games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalResult {
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
}

impl EvalResult {
    pub fn record(&mut self, outcome: LearnerOutcome) {
        match outcome {
            LearnerOutcome::Win => self.wins += 1,
            LearnerOutcome::Loss => self.losses += 1,
            LearnerOutcome::Draw => self.draws += 1,
        }
    }

    pub fn games(&self) -> usize {
        self.wins + self.losses + self.draws
    }

    pub fn win_rate(&self) -> f32 {
        match self.games() {
            0 => 0.0,
            n => self.wins as f32 / n as f32,
        }
    }
}

/// Learner-side training metrics with rolling window computations.
pub struct TrainingMetrics {
    episode_results: VecDeque<EpisodeResult>,
    capacity: usize,
    total_episodes: usize,
    total_illegal_attempts: u64,
    last_eval: Option<EvalResult>,
}

impl TrainingMetrics {
    pub fn with_capacity(capacity: usize) -> Self {
        TrainingMetrics {
            episode_results: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            total_episodes: 0,
            total_illegal_attempts: 0,
            last_eval: None,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn record_episode(&mut self, result: EpisodeResult) {
        self.total_episodes += 1;
        self.total_illegal_attempts += result.illegal_attempts as u64;
        self.episode_results.push_back(result);
        if self.episode_results.len() > self.capacity {
            self.episode_results.pop_front();
        }
    }

    pub fn record_eval(&mut self, eval: EvalResult) {
        self.last_eval = Some(eval);
    }

    pub fn last_eval(&self) -> Option<EvalResult> {
        self.last_eval
    }

    fn rate(&self, last_n: usize, outcome: LearnerOutcome) -> f32 {
        let n = self.episode_results.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let hits = self
            .episode_results
            .iter()
            .rev()
            .take(n)
            .filter(|r| r.outcome == outcome)
            .count();
        hits as f32 / n as f32
    }

    /// Learner win rate in the last N episodes.
    pub fn win_rate(&self, last_n: usize) -> f32 {
        self.rate(last_n, LearnerOutcome::Win)
    }

    pub fn loss_rate(&self, last_n: usize) -> f32 {
        self.rate(last_n, LearnerOutcome::Loss)
    }

    pub fn draw_rate(&self, last_n: usize) -> f32 {
        self.rate(last_n, LearnerOutcome::Draw)
    }

    /// Average game length over the last N episodes.
    pub fn average_game_length(&self, last_n: usize) -> f32 {
        let n = self.episode_results.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let total: usize = self
            .episode_results
            .iter()
            .rev()
            .take(n)
            .map(|r| r.game_length)
            .sum();
        total as f32 / n as f32
    }

    /// Illegal learner picks over the last N episodes.
    pub fn illegal_attempts(&self, last_n: usize) -> usize {
        self.episode_results
            .iter()
            .rev()
            .take(last_n)
            .map(|r| r.illegal_attempts)
            .sum()
    }

    pub fn total_illegal_attempts(&self) -> u64 {
        self.total_illegal_attempts
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    /// Summary stored next to a checkpoint. Uses the last evaluation win rate
    /// when one exists.
    pub fn checkpoint_metrics(&self, last_n: usize) -> CheckpointMetrics {
        CheckpointMetrics {
            win_rate: self
                .last_eval
                .map_or_else(|| self.win_rate(last_n), |e| e.win_rate()),
            loss_rate: self.loss_rate(last_n),
            draw_rate: self.draw_rate(last_n),
            average_game_length: self.average_game_length(last_n),
            illegal_moves: self.total_illegal_attempts,
        }
    }
}

impl Default for TrainingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(outcome: LearnerOutcome, game_length: usize) -> EpisodeResult {
        EpisodeResult {
            outcome,
            game_length,
            illegal_attempts: 0,
        }
    }

    #[test]
    fn test_outcome_from_status() {
        let won = GameStatus::Won(Player::Yellow);
        assert_eq!(
            LearnerOutcome::from_status(won, Player::Yellow),
            Some(LearnerOutcome::Win)
        );
        assert_eq!(
            LearnerOutcome::from_status(won, Player::Red),
            Some(LearnerOutcome::Loss)
        );
        assert_eq!(
            LearnerOutcome::from_status(GameStatus::Draw, Player::Red),
            Some(LearnerOutcome::Draw)
        );
        assert_eq!(
            LearnerOutcome::from_status(GameStatus::InProgress, Player::Red),
            None
        );
    }

    #[test]
    fn test_rates() {
        let mut m = TrainingMetrics::new();
        for _ in 0..6 {
            m.record_episode(result(LearnerOutcome::Win, 10));
        }
        for _ in 0..3 {
            m.record_episode(result(LearnerOutcome::Loss, 10));
        }
        m.record_episode(result(LearnerOutcome::Draw, 42));

        assert!((m.win_rate(10) - 0.6).abs() < 1e-6);
        assert!((m.loss_rate(10) - 0.3).abs() < 1e-6);
        assert!((m.draw_rate(10) - 0.1).abs() < 1e-6);
        // last 1 → only the draw
        assert!((m.draw_rate(1) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_average_game_length() {
        let mut m = TrainingMetrics::new();
        m.record_episode(result(LearnerOutcome::Draw, 20));
        m.record_episode(result(LearnerOutcome::Draw, 30));
        assert!((m.average_game_length(10) - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_metrics_are_zero() {
        let m = TrainingMetrics::new();
        assert_eq!(m.win_rate(100), 0.0);
        assert_eq!(m.average_game_length(100), 0.0);
        assert_eq!(m.illegal_attempts(100), 0);
    }

    #[test]
    fn test_window_is_capped_but_totals_are_not() {
        let mut m = TrainingMetrics::with_capacity(4);
        for _ in 0..10 {
            m.record_episode(EpisodeResult {
                outcome: LearnerOutcome::Loss,
                game_length: 7,
                illegal_attempts: 2,
            });
        }
        assert_eq!(m.total_episodes(), 10);
        assert_eq!(m.total_illegal_attempts(), 20);
        assert_eq!(m.illegal_attempts(100), 8);
    }

    #[test]
    fn test_eval_result() {
        let mut eval = EvalResult::default();
        assert_eq!(eval.win_rate(), 0.0);
        eval.record(LearnerOutcome::Win);
        eval.record(LearnerOutcome::Win);
        eval.record(LearnerOutcome::Draw);
        eval.record(LearnerOutcome::Loss);
        assert_eq!(eval.games(), 4);
        assert!((eval.win_rate() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_checkpoint_metrics_prefers_eval() {
        let mut m = TrainingMetrics::new();
        m.record_episode(result(LearnerOutcome::Loss, 12));
        assert_eq!(m.checkpoint_metrics(10).win_rate, 0.0);

        m.record_eval(EvalResult {
            wins: 3,
            losses: 1,
            draws: 0,
        });
        let snapshot = m.checkpoint_metrics(10);
        assert!((snapshot.win_rate - 0.75).abs() < 1e-6);
        assert!((snapshot.loss_rate - 1.0).abs() < 1e-6);
        assert!((snapshot.average_game_length - 12.0).abs() < 1e-6);
    }
}
