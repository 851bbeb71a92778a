use serde::{Deserialize, Serialize};

use crate::ai::{Agent, QLearningAgent};

/// Training metrics snapshot recorded alongside a stored agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointMetrics {
    pub win_rate: f32,
    pub loss_rate: f32,
    pub draw_rate: f32,
    pub average_game_length: f32,
    pub illegal_moves: u64,
}

/// Human-readable description written to `<name>.meta.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMetadata {
    pub name: String,
    pub algorithm: String,
    pub episode_count: u64,
    pub table_size: usize,
    pub epsilon: f64,
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<CheckpointMetrics>,
}

impl AgentMetadata {
    pub fn describe(
        name: &str,
        agent: &QLearningAgent,
        metrics: Option<CheckpointMetrics>,
        timestamp: u64,
    ) -> Self {
        AgentMetadata {
            name: name.to_string(),
            algorithm: agent.name().to_string(),
            episode_count: agent.episode_count(),
            table_size: agent.table_size(),
            epsilon: agent.epsilon(),
            timestamp,
            metrics,
        }
    }
}
