//! Agents: the `Agent` capability, the random baseline, board fingerprints,
//! the sparse value store and the tabular Q-learning algorithm.

mod agent;
pub mod algorithms;
mod random;
pub mod state_encoding;
pub mod value_store;

pub use agent::{Agent, AgentState};
pub use algorithms::{Bootstrap, QConfig, QLearningAgent, Reward};
pub use random::RandomAgent;
pub use state_encoding::Fingerprint;
pub use value_store::{ValueRow, ValueStore};
