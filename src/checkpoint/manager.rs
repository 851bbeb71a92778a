use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::ai::{AgentState, QLearningAgent};
use crate::checkpoint::metadata::{AgentMetadata, CheckpointMetrics};
use crate::error::CheckpointError;

const STATE_SUFFIX: &str = ".json";
const META_SUFFIX: &str = ".meta.json";

/// Configuration for the checkpoint manager.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CheckpointManagerConfig {
    pub checkpoint_dir: PathBuf,
}

impl Default for CheckpointManagerConfig {
    fn default() -> Self {
        CheckpointManagerConfig {
            checkpoint_dir: PathBuf::from("data"),
        }
    }
}

/// Stores and loads agents by name.
///
/// Each agent occupies two files in the checkpoint directory: the opaque
/// state blob `<name>.json` and its description `<name>.meta.json`.
pub struct CheckpointManager {
    config: CheckpointManagerConfig,
}

impl CheckpointManager {
    pub fn new(config: CheckpointManagerConfig) -> Self {
        CheckpointManager { config }
    }

    pub fn dir(&self) -> &Path {
        &self.config.checkpoint_dir
    }

    /// Serialize `agent` and store it under `name`, replacing any earlier state.
    pub fn save_agent_state(
        &self,
        name: &str,
        agent: &QLearningAgent,
        metrics: Option<CheckpointMetrics>,
    ) -> Result<PathBuf, CheckpointError> {
        let state = agent.save_state()?;
        let metadata = AgentMetadata::describe(name, agent, metrics, unix_timestamp());
        self.store_state(name, &state, &metadata)
    }

    /// Write a state blob and its metadata. Both files are written to a
    /// temporary path first and renamed into place.
    pub fn store_state(
        &self,
        name: &str,
        state: &AgentState,
        metadata: &AgentMetadata,
    ) -> Result<PathBuf, CheckpointError> {
        validate_name(name)?;
        fs::create_dir_all(&self.config.checkpoint_dir)?;

        let state_path = self.state_path(name);
        write_atomic(&state_path, &state.data)?;
        let meta_json = serde_json::to_string_pretty(metadata)?;
        write_atomic(&self.meta_path(name), meta_json.as_bytes())?;

        log::debug!(
            "stored agent '{}' ({} bytes) at {}",
            name,
            state.data.len(),
            state_path.display()
        );
        Ok(state_path)
    }

    /// Read the opaque state blob stored under `name`.
    pub fn load_agent_state(&self, name: &str) -> Result<AgentState, CheckpointError> {
        validate_name(name)?;
        match fs::read(self.state_path(name)) {
            Ok(data) => Ok(AgentState { data }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(CheckpointError::MissingAgentState(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load the agent stored under `name` with a fresh random source.
    pub fn load_agent(
        &self,
        name: &str,
        seed: Option<u64>,
    ) -> Result<QLearningAgent, CheckpointError> {
        let state = self.load_agent_state(name)?;
        QLearningAgent::from_state(&state, seed)
    }

    pub fn load_metadata(&self, name: &str) -> Result<AgentMetadata, CheckpointError> {
        validate_name(name)?;
        let meta_path = self.meta_path(name);
        if !meta_path.exists() {
            return Err(CheckpointError::MissingAgentState(name.to_string()));
        }
        read_metadata(&meta_path)
    }

    pub fn has_agent(&self, name: &str) -> bool {
        validate_name(name).is_ok() && self.state_path(name).is_file()
    }

    /// Metadata of every stored agent, sorted by name.
    pub fn list_agents(&self) -> Result<Vec<AgentMetadata>, CheckpointError> {
        if !self.config.checkpoint_dir.exists() {
            return Ok(Vec::new());
        }
        let mut results = Vec::new();
        for entry in fs::read_dir(&self.config.checkpoint_dir)? {
            let path = entry?.path();
            let is_meta = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(META_SUFFIX));
            if is_meta && path.is_file() {
                results.push(read_metadata(&path)?);
            }
        }
        results.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(results)
    }

    fn state_path(&self, name: &str) -> PathBuf {
        self.config
            .checkpoint_dir
            .join(format!("{name}{STATE_SUFFIX}"))
    }

    fn meta_path(&self, name: &str) -> PathBuf {
        self.config
            .checkpoint_dir
            .join(format!("{name}{META_SUFFIX}"))
    }
}

/// Names become file stems, so they are restricted to a safe alphabet.
fn validate_name(name: &str) -> Result<(), CheckpointError> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(CheckpointError::InvalidName(name.to_string()))
    }
}

fn read_metadata(path: &Path) -> Result<AgentMetadata, CheckpointError> {
    let meta_json = fs::read_to_string(path).map_err(|e| CheckpointError::MetadataRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&meta_json).map_err(|e| CheckpointError::MetadataParse {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CheckpointError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
