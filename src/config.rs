use crate::error::{AppError, Result};
use crate::metrics::trend::TrendConfig;
use crate::metrics::window::clamp_interval_ms;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_history_size")]
    pub history_size: usize,

    #[serde(default)]
    pub trend: TrendConfig,

    /// Where exported sessions, the saved session slot and the log file live.
    #[serde(default)]
    pub storage_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            history_size: default_history_size(),
            trend: TrendConfig::default(),
            storage_dir: None,
        }
    }
}

fn default_interval_ms() -> u64 {
    500
}

fn default_history_size() -> usize {
    5_000
}

impl Config {
    /// Loads `path` if given, else `config.toml` in the platform config dir if
    /// present, else defaults. The result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.validate()
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn validate(mut self) -> Result<Self> {
        if self.history_size == 0 {
            return Err(AppError::InvalidConfiguration(
                "history_size must be at least 1".to_string(),
            ));
        }
        if self.trend.min_points == 0 {
            return Err(AppError::InvalidConfiguration(
                "trend.min_points must be at least 1".to_string(),
            ));
        }
        self.interval_ms = clamp_interval_ms(self.interval_ms);
        Ok(self)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "perfvisualizer", "perf-visualizer")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
