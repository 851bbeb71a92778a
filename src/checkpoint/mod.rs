//! Agent persistence: store and load agent state by name.

mod manager;
mod metadata;

pub use manager::{CheckpointManager, CheckpointManagerConfig};
pub use metadata::{AgentMetadata, CheckpointMetrics};
