//! Client configuration
//!
//! Stored as TOML under `~/.interview-assistant/config.toml`. A default
//! file is written the first time the client runs; command-line flags and
//! environment variables override individual values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::form::{DifficultyLevel, RoundType, DEFAULT_NUM_QUESTIONS};

pub const APP_DIR_NAME: &str = ".interview-assistant";
pub const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the generator service
    pub server_url: String,
    /// Whole-request timeout; generation can take a while
    pub request_timeout_secs: u64,
    /// Where exports are written
    pub output_dir: PathBuf,
    pub default_round_type: RoundType,
    pub default_difficulty: DifficultyLevel,
    pub default_num_questions: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            output_dir: PathBuf::from("."),
            default_round_type: RoundType::Technical,
            default_difficulty: DifficultyLevel::Intermediate,
            default_num_questions: DEFAULT_NUM_QUESTIONS,
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Load from `path`, writing defaults there first if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Config not found at {}, creating default", path.display());
            let config = ClientConfig::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: ClientConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        debug!("Config saved to {}", path.display());
        Ok(())
    }

    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }
}

pub fn app_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(APP_DIR_NAME))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(app_dir()?.join(CONFIG_FILE_NAME))
}
