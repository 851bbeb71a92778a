mod q_learning;

pub use q_learning::{epsilon_at, Bootstrap, QConfig, QLearningAgent, Reward};
