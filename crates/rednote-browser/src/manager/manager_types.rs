//! Browser manager type definitions and configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cdp::CdpError;

/// Browser manager errors.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Action failed: {0}")]
    ActionFailed(String),

    #[error("Browser not connected")]
    NotConnected,

    #[error("Chrome not found. Please install Google Chrome or set browser.chrome_path.")]
    ChromeNotFound,

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),
}

impl From<CdpError> for BrowserError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::ConnectionFailed(msg) | CdpError::ChromeNotAvailable(msg) => {
                BrowserError::ConnectionFailed(msg)
            }
            CdpError::NavigationFailed(msg) => BrowserError::NavigationFailed(msg),
            CdpError::SessionClosed => BrowserError::NotConnected,
            _ => BrowserError::ActionFailed(e.to_string()),
        }
    }
}

/// Browser configuration, the `[browser]` table of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserManagerConfig {
    /// Chrome debugging port.
    pub debug_port: u16,
    /// Chrome executable; searched in the usual install locations when unset.
    pub chrome_path: Option<PathBuf>,
    /// Profile directory for persistent login state.
    pub profile_dir: Option<PathBuf>,
    pub headless: bool,
    /// How long to wait for a launched Chrome to accept connections.
    pub launch_timeout_ms: u64,
    /// Upper bound for a single CDP command.
    pub call_timeout_secs: u64,
    /// Upper bound for a navigation to finish loading.
    pub load_timeout_secs: u64,
    /// Extra command line switches passed to Chrome.
    pub extra_args: Vec<String>,
}

impl Default for BrowserManagerConfig {
    fn default() -> Self {
        Self {
            debug_port: 9222,
            chrome_path: None,
            profile_dir: None,
            headless: false,
            launch_timeout_ms: 6_000,
            call_timeout_secs: 30,
            load_timeout_secs: 30,
            extra_args: Vec::new(),
        }
    }
}

impl BrowserManagerConfig {
    /// Get the profile directory, defaulting to `~/.rednote/browser-profile`.
    pub fn get_profile_dir(&self) -> PathBuf {
        self.profile_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".rednote")
                .join("browser-profile")
        })
    }

    /// Get the CDP endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("http://localhost:{}", self.debug_port)
    }

    pub fn launch_timeout(&self) -> Duration {
        Duration::from_millis(self.launch_timeout_ms)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }

    /// Command line used to launch Chrome, without the executable.
    pub fn chrome_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--remote-debugging-port={}", self.debug_port),
            format!("--user-data-dir={}", self.get_profile_dir().display()),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--disable-background-networking".to_string(),
            "--disable-sync".to_string(),
            "--disable-translate".to_string(),
            "--metrics-recording-only".to_string(),
        ];
        if self.headless {
            args.push("--headless=new".to_string());
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }
}
