use std::path::Path;

use crate::ai::QConfig;
use crate::checkpoint::CheckpointManagerConfig;
use crate::error::ConfigError;
use crate::training::TrainerConfig;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub agent: QConfig,
    pub training: TrainerConfig,
    pub checkpoint: CheckpointManagerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let agent = &self.agent;
        if !(agent.decay_base > 0.0 && agent.decay_base < 1.0) {
            return Err(ConfigError::Validation(
                "agent.decay_base must be in (0, 1)".into(),
            ));
        }
        if !(agent.learning_rate > 0.0 && agent.learning_rate <= 1.0) {
            return Err(ConfigError::Validation(
                "agent.learning_rate must be in (0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&agent.gamma) {
            return Err(ConfigError::Validation(
                "agent.gamma must be in [0, 1]".into(),
            ));
        }
        let rewards = [agent.win_reward, agent.loss_reward, agent.illegal_move_reward];
        if rewards.iter().any(|r| !r.is_finite()) {
            return Err(ConfigError::Validation(
                "agent rewards must be finite".into(),
            ));
        }

        let training = &self.training;
        if training.num_episodes == 0 {
            return Err(ConfigError::Validation(
                "training.num_episodes must be > 0".into(),
            ));
        }
        if training.max_illegal_retries == 0 {
            return Err(ConfigError::Validation(
                "training.max_illegal_retries must be >= 1".into(),
            ));
        }
        if training.metrics_window == 0 {
            return Err(ConfigError::Validation(
                "training.metrics_window must be >= 1".into(),
            ));
        }
        if training.eval_interval > 0 && training.eval_games == 0 {
            return Err(ConfigError::Validation(
                "training.eval_games must be >= 1 when evaluation is enabled".into(),
            ));
        }

        if self.checkpoint.checkpoint_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "checkpoint.checkpoint_dir must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, ConfigError> {
        toml::to_string_pretty(&AppConfig::default())
            .map_err(|e| ConfigError::Validation(format!("default config does not serialize: {e}")))
    }
}
