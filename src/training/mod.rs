//! Training infrastructure: the episode loop, the trainer and metrics
//! collection.

pub mod episode;
pub mod metrics;
pub mod trainer;

pub use metrics::{EpisodeResult, EvalResult, LearnerOutcome, TrainingMetrics};
pub use trainer::{LossCredit, Trainer, TrainerConfig};
