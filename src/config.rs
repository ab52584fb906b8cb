//! User configuration, read from `config.toml`
//!
//! Every field has a default, so a missing file (or a partial one) is fine.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gateway::{RetryPolicy, DEFAULT_COOLDOWN, DEFAULT_INITIAL_BACKOFF, DEFAULT_MAX_RETRIES};
use crate::storage::{JsonFileStore, StorageError};
use crate::vocab::{IntervalTable, Scheduler};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config directory not found")]
    ConfigDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Overrides the stored daily goal when set
    pub daily_goal: Option<u32>,
    /// Where state and the artifact cache live
    pub data_dir: Option<PathBuf>,
    /// JSON word packs to use instead of the built-in ones
    pub catalog_path: Option<PathBuf>,
    pub scheduler: SchedulerConfig,
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SchedulerConfig {
    pub intervals_secs: Vec<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            intervals_secs: vec![3_600, 86_400, 3 * 86_400, 7 * 86_400, 14 * 86_400, 30 * 86_400],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub base_url: String,
    pub image_model: String,
    pub speech_model: String,
    pub voice: String,
    pub cooldown_ms: u64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            speech_model: "gemini-2.5-flash-preview-tts".to_string(),
            voice: "Kore".to_string(),
            cooldown_ms: DEFAULT_COOLDOWN.as_millis() as u64,
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff_ms: DEFAULT_INITIAL_BACKOFF.as_millis() as u64,
        }
    }
}

impl GatewayConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
        }
    }
}

impl AppConfig {
    /// Default config file location
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join("wordgarden").join("config.toml"))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    /// Parse a config file. Unlike [`AppConfig::load_or_default`], a missing file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `path` (or the default location), falling back to defaults when the file is absent
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Ok(p) => p,
                Err(_) => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            log::debug!("config: {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        log::info!("config: loading {}", path.display());
        Self::load(&path)
    }

    pub fn data_dir(&self) -> std::result::Result<PathBuf, StorageError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => JsonFileStore::default_data_dir(),
        }
    }

    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(IntervalTable::from_secs(&self.scheduler.intervals_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_means_defaults() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig::load_or_default(Some(&temp.path().join("nope.toml"))).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.scheduler().graduated_stage(), 6);
        assert_eq!(config.gateway.cooldown(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
daily_goal = 20

[scheduler]
intervals_secs = [60, 600]

[gateway]
max_retries = 4
"#,
        )
        .unwrap();

        let config = AppConfig::load_or_default(Some(&path)).unwrap();

        assert_eq!(config.daily_goal, Some(20));
        assert_eq!(config.scheduler().graduated_stage(), 2);
        assert_eq!(config.gateway.max_retries, 4);
        assert_eq!(config.gateway.voice, "Kore");
        assert_eq!(
            config.gateway.retry_policy().initial_backoff,
            Duration::from_secs(2)
        );
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "daily_goal = \"lots\"").unwrap();

        assert!(matches!(
            AppConfig::load_or_default(Some(&path)),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_explicit_data_dir() {
        let config = AppConfig {
            data_dir: Some(PathBuf::from("/tmp/garden")),
            ..Default::default()
        };
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/garden"));
    }
}
