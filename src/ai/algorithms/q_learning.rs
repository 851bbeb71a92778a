use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::ai::agent::{Agent, AgentState};
use crate::ai::state_encoding::Fingerprint;
use crate::ai::value_store::{ValueRow, ValueStore};
use crate::error::CheckpointError;
use crate::game::{Board, COLS};

/// Where the "best next value" of a temporal-difference update comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bootstrap {
    /// Value of the column the exploit path would pick, legal or not.
    Greedy,
    /// Highest value among the legal columns of the next position.
    #[default]
    MaxLegal,
    /// Value of the column the epsilon-greedy policy samples next.
    OnPolicy,
}

/// Terminal reward kinds; the amounts come from `QConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reward {
    Win,
    Loss,
    IllegalMove,
}

/// Tabular Q-learning hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QConfig {
    /// Epsilon is `decay_base ^ episode_count`.
    pub decay_base: f64,
    pub learning_rate: f64,
    pub gamma: f64,
    pub win_reward: f64,
    pub loss_reward: f64,
    pub illegal_move_reward: f64,
    pub bootstrap: Bootstrap,
}

impl Default for QConfig {
    fn default() -> Self {
        QConfig {
            decay_base: 0.99985,
            learning_rate: 0.5,
            gamma: 0.9,
            win_reward: 1.0,
            loss_reward: -1.0,
            illegal_move_reward: -0.1,
            bootstrap: Bootstrap::MaxLegal,
        }
    }
}

impl QConfig {
    pub fn reward(&self, reward: Reward) -> f64 {
        match reward {
            Reward::Win => self.win_reward,
            Reward::Loss => self.loss_reward,
            Reward::IllegalMove => self.illegal_move_reward,
        }
    }
}

/// Everything about a Q-learning agent that survives a save/load cycle.
#[derive(Serialize, Deserialize)]
struct QAgentSnapshot {
    config: QConfig,
    episode_count: u64,
    table: ValueStore,
}

/// Epsilon-greedy agent backed by a sparse action-value table.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    store: ValueStore,
    config: QConfig,
    episode_count: u64,
    rng: StdRng,
}

impl QLearningAgent {
    pub fn new(config: QConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    pub fn with_seed(config: QConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: QConfig, rng: StdRng) -> Self {
        QLearningAgent {
            store: ValueStore::new(),
            config,
            episode_count: 0,
            rng,
        }
    }

    pub fn config(&self) -> &QConfig {
        &self.config
    }

    pub fn episode_count(&self) -> u64 {
        self.episode_count
    }

    pub fn table_size(&self) -> usize {
        self.store.len()
    }

    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    /// Current exploration probability.
    pub fn epsilon(&self) -> f64 {
        epsilon_at(self.config.decay_base, self.episode_count)
    }

    /// Replace the random source, e.g. to replay a run deterministically.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Action values for `board`, materializing the row on first sight.
    pub fn values(&mut self, board: &Board) -> ValueRow {
        *self.store.lookup(&Fingerprint::of(board), &mut self.rng)
    }

    /// Highest-valued column over all seven slots, lowest index on ties.
    pub fn greedy_column(&mut self, board: &Board) -> usize {
        let row = self.values(board);
        argmax(&row, 0..COLS).unwrap_or(0)
    }

    /// Highest-valued legal column, lowest index on ties.
    pub fn greedy_legal_column(&mut self, board: &Board) -> Option<usize> {
        let legal = board.legal_columns();
        if legal.is_empty() {
            return None;
        }
        let row = self.values(board);
        argmax(&row, legal)
    }

    /// Explore over legal columns with probability epsilon, else exploit
    /// without legality masking.
    fn epsilon_greedy(&mut self, board: &Board) -> Option<usize> {
        if board.is_draw() {
            return None;
        }
        let u: f64 = self.rng.random();
        if u < self.epsilon() {
            return board.legal_columns().choose(&mut self.rng).copied();
        }
        Some(self.greedy_column(board))
    }

    /// Write a terminal reward straight into the `(board, column)` slot.
    pub fn assign_reward(&mut self, board: &Board, column: usize, reward: Reward) {
        let value = self.config.reward(reward);
        self.store
            .update(&Fingerprint::of(board), column, value, &mut self.rng);
    }

    /// `Q(s,a) += alpha * (gamma * best_next - Q(s,a))`, returning the new value.
    pub fn temporal_difference_update(
        &mut self,
        board: &Board,
        column: usize,
        next_board: &Board,
    ) -> f64 {
        let best_next = self.bootstrap_value(next_board);
        let fp = Fingerprint::of(board);
        let current = self.store.lookup(&fp, &mut self.rng)[column];
        let updated =
            current + self.config.learning_rate * (self.config.gamma * best_next - current);
        self.store.update(&fp, column, updated, &mut self.rng);
        updated
    }

    fn bootstrap_value(&mut self, next_board: &Board) -> f64 {
        match self.config.bootstrap {
            Bootstrap::Greedy => {
                let col = self.greedy_column(next_board);
                self.values(next_board)[col]
            }
            Bootstrap::MaxLegal => match self.greedy_legal_column(next_board) {
                Some(col) => self.values(next_board)[col],
                None => 0.0,
            },
            Bootstrap::OnPolicy => match self.epsilon_greedy(next_board) {
                Some(col) => self.values(next_board)[col],
                None => 0.0,
            },
        }
    }

    /// Count one completed episode; drives epsilon decay.
    pub fn finish_episode(&mut self) {
        self.episode_count += 1;
    }

    /// Serialize config, episode counter and value table. The RNG is not saved.
    pub fn save_state(&self) -> Result<AgentState, CheckpointError> {
        let snapshot = QAgentSnapshot {
            config: self.config.clone(),
            episode_count: self.episode_count,
            table: self.store.clone(),
        };
        let data = serde_json::to_vec(&snapshot).map_err(CheckpointError::StateEncode)?;
        Ok(AgentState { data })
    }

    /// Rebuild an agent from saved state with a fresh random source.
    pub fn from_state(state: &AgentState, seed: Option<u64>) -> Result<Self, CheckpointError> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut agent = Self::with_rng(QConfig::default(), rng);
        agent.load_state(state)?;
        Ok(agent)
    }

    /// Replace config, counter and table with saved state, keeping this
    /// agent's random source.
    pub fn load_state(&mut self, state: &AgentState) -> Result<(), CheckpointError> {
        let snapshot: QAgentSnapshot =
            serde_json::from_slice(&state.data).map_err(CheckpointError::StateDecode)?;
        self.config = snapshot.config;
        self.episode_count = snapshot.episode_count;
        self.store = snapshot.table;
        Ok(())
    }
}

impl Agent for QLearningAgent {
    fn select_move(&mut self, board: &Board, training: bool) -> Option<usize> {
        if training {
            self.epsilon_greedy(board)
        } else {
            self.greedy_legal_column(board)
        }
    }

    fn name(&self) -> &str {
        "Q-learning"
    }
}

/// `decay_base ^ episodes`, kept strictly positive.
pub fn epsilon_at(decay_base: f64, episodes: u64) -> f64 {
    decay_base.powf(episodes as f64).max(f64::MIN_POSITIVE)
}

fn argmax(row: &ValueRow, candidates: impl IntoIterator<Item = usize>) -> Option<usize> {
    let mut best: Option<usize> = None;
    for col in candidates {
        if best.map_or(true, |b| row[col] > row[b]) {
            best = Some(col);
        }
    }
    best
}
