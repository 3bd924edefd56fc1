use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    ReadError(String),

    #[error("Failed to write configuration: {0}")]
    WriteError(String),

    #[error("Invalid configuration format: {0}")]
    InvalidFormat(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub data_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Configured data directory, or the platform's local data directory.
    pub fn resolved_data_dir(&self) -> ConfigResult<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_local_dir()
            .map(|dir| dir.join("taskflow"))
            .ok_or_else(|| ConfigError::ReadError("Cannot determine data directory".to_string()))
    }

    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

pub trait ConfigStore: Send + Sync {
    fn load_config(&self) -> ConfigResult<AppConfig>;
    fn save_config(&self, config: &AppConfig) -> ConfigResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_data_dir_wins() {
        let config = AppConfig {
            data_dir: Some(PathBuf::from("/tmp/boards")),
            ..Default::default()
        };
        assert_eq!(
            config.resolved_data_dir().unwrap(),
            PathBuf::from("/tmp/boards")
        );
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        let config = AppConfig {
            log_level: "chatty".to_string(),
            ..Default::default()
        };
        assert_eq!(config.tracing_level(), tracing::Level::INFO);

        let config = AppConfig {
            log_level: "debug".to_string(),
            ..Default::default()
        };
        assert_eq!(config.tracing_level(), tracing::Level::DEBUG);
    }
}
