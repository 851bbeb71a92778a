use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::ai::{Agent, QLearningAgent, RandomAgent};
use crate::checkpoint::CheckpointManager;
use crate::error::TrainingError;
use crate::game::Player;
use crate::training::episode::{evaluate, play_training_episode};
use crate::training::metrics::{EvalResult, TrainingMetrics};

/// Which learner slot receives the loss reward when the opponent wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossCredit {
    /// The opponent's winning (board, column) pair.
    #[default]
    OpponentMove,
    /// The learner's last (board, column) pair.
    LearnerMove,
}

/// Trainer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub num_episodes: usize,
    pub learner_side: Player,
    /// Consecutive illegal learner picks tolerated before its best legal
    /// column is played instead.
    pub max_illegal_retries: usize,
    pub loss_credit: LossCredit,
    /// Episodes between progress log lines; 0 disables.
    pub log_interval: usize,
    /// Episodes between evaluations against a random opponent; 0 disables.
    pub eval_interval: usize,
    pub eval_games: usize,
    /// Episodes between checkpoints; 0 disables.
    pub checkpoint_interval: usize,
    /// Rolling window for win/loss/draw rates.
    pub metrics_window: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            num_episodes: 10_000,
            learner_side: Player::Red,
            max_illegal_retries: 50,
            loss_credit: LossCredit::OpponentMove,
            log_interval: 1_000,
            eval_interval: 5_000,
            eval_games: 100,
            checkpoint_interval: 0,
            metrics_window: 1_000,
        }
    }
}

/// Runs Q-learning episodes of a learner against a fixed opponent.
pub struct Trainer {
    config: TrainerConfig,
    checkpoints: Option<(CheckpointManager, String)>,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Trainer {
            config,
            checkpoints: None,
        }
    }

    /// Store the learner under `name` every `checkpoint_interval` episodes.
    pub fn with_checkpoints(mut self, manager: CheckpointManager, name: impl Into<String>) -> Self {
        self.checkpoints = Some((manager, name.into()));
        self
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Run the full training loop.
    pub fn train(
        &self,
        learner: &mut QLearningAgent,
        opponent: &mut dyn Agent,
    ) -> Result<TrainingMetrics, TrainingError> {
        let mut metrics = TrainingMetrics::with_capacity(self.config.metrics_window);
        let window = self.config.metrics_window;

        let start_episode = learner.episode_count() + 1;
        let end_episode = learner.episode_count() + self.config.num_episodes as u64;

        log::info!(
            "training {} as {} against {} for {} episodes ({}..={})",
            learner.name(),
            self.config.learner_side.name(),
            opponent.name(),
            self.config.num_episodes,
            start_episode,
            end_episode
        );
        let started = Instant::now();

        for episode in start_episode..=end_episode {
            let result = play_training_episode(learner, opponent, &self.config)?;
            metrics.record_episode(result);

            if due(episode, self.config.log_interval) {
                log::info!(
                    "episode {}/{} | eps: {:.4} | win: {:.1}% | loss: {:.1}% | draw: {:.1}% | avg_len: {:.1} | illegal: {} | states: {}",
                    episode,
                    end_episode,
                    learner.epsilon(),
                    metrics.win_rate(window) * 100.0,
                    metrics.loss_rate(window) * 100.0,
                    metrics.draw_rate(window) * 100.0,
                    metrics.average_game_length(window),
                    metrics.illegal_attempts(window),
                    learner.table_size(),
                );
            }

            if due(episode, self.config.eval_interval) && self.config.eval_games > 0 {
                let eval = self.evaluate(learner)?;
                log::info!(
                    "eval vs Random ({} games): {:.1}% wins, {} losses, {} draws",
                    eval.games(),
                    eval.win_rate() * 100.0,
                    eval.losses,
                    eval.draws
                );
                metrics.record_eval(eval);
            }

            if due(episode, self.config.checkpoint_interval) {
                if let Some((manager, name)) = &self.checkpoints {
                    let path = manager.save_agent_state(
                        name,
                        learner,
                        Some(metrics.checkpoint_metrics(window)),
                    )?;
                    log::info!("checkpoint saved: {}", path.display());
                }
            }
        }

        log::info!(
            "training complete: {} episodes in {:.1}s, {} states known",
            metrics.total_episodes(),
            started.elapsed().as_secs_f64(),
            learner.table_size()
        );

        Ok(metrics)
    }

    /// Greedy games against a random opponent, alternating sides.
    pub fn evaluate(&self, learner: &mut QLearningAgent) -> Result<EvalResult, TrainingError> {
        let mut random = RandomAgent::new();
        evaluate(learner, &mut random, self.config.eval_games)
    }
}

fn due(episode: u64, interval: usize) -> bool {
    interval > 0 && episode % interval as u64 == 0
}
