//! Configuration schema.
//!
//! Every table is optional and every field falls back to its default, so an
//! empty file (or no file) is a valid configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use rednote_browser::BrowserManagerConfig;
pub use rednote_core::{PublishConfig, ResolverConfig, TagInputConfig};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserManagerConfig,

    #[serde(default)]
    pub publish: PublishConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub tags: TagInputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory of the daily log files; `~/.rednote/logs` when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    pub fn log_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| data_dir().join("logs"))
    }
}

/// `~/.rednote`, home of the config file, logs and browser profile.
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".rednote")
}

/// Default location of the config file.
pub fn default_config_path() -> PathBuf {
    data_dir().join("config.toml")
}
