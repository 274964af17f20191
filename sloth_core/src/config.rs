//! Configuration file support for Sloth.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/sloth/config.toml`. It only
//! decides where the settings and log files live; the game state itself is
//! in those files.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_settings_file")]
    pub settings_file: String,

    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            settings_file: default_settings_file(),
            log_file: default_log_file(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_settings_file() -> String {
    "settings.json".into()
}

fn default_log_file() -> String {
    "log.jsonl".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("sloth").join("config.toml")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data.data_dir.join(&self.data.settings_file)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data.data_dir.join(&self.data.log_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.settings_path(), PathBuf::from("./settings.json"));
        assert_eq!(config.log_path(), PathBuf::from("./log.jsonl"));
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[data]
data_dir = "/tmp/sloth"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data.data_dir, PathBuf::from("/tmp/sloth"));
        assert_eq!(config.data.log_file, "log.jsonl"); // default
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[data]\nlog_file = \"runs.jsonl\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.data.log_file, "runs.jsonl");
        assert_eq!(config.data.settings_file, "settings.json");
        assert_eq!(config.log_path(), PathBuf::from("./runs.jsonl"));
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[data\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(crate::Error::Toml(_))));
    }
}
