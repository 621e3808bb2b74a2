//! BrowserManager core: Chrome discovery, launch and connection.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{BrowserError, BrowserManagerConfig};
use crate::cdp::CdpClient;
use crate::page::CdpPage;

const LAUNCH_POLL: Duration = Duration::from_millis(200);

/// Owns the Chrome connection and, if it started Chrome, the process.
pub struct BrowserManager {
    config: BrowserManagerConfig,
    client: RwLock<Option<Arc<CdpClient>>>,
    chrome_process: RwLock<Option<Child>>,
}

impl BrowserManager {
    pub fn new(config: BrowserManagerConfig) -> Self {
        Self {
            config,
            client: RwLock::new(None),
            chrome_process: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &BrowserManagerConfig {
        &self.config
    }

    /// Chrome executable: the configured path, else the first install found.
    pub fn chrome_executable(&self) -> Option<PathBuf> {
        match &self.config.chrome_path {
            Some(path) => path.exists().then(|| path.clone()),
            None => Self::find_chrome(),
        }
    }

    /// Find a Chrome executable in the usual install locations.
    pub fn find_chrome() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        let paths: &[&str] = &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
        ];

        #[cfg(target_os = "linux")]
        let paths: &[&str] = &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ];

        #[cfg(target_os = "windows")]
        let paths: &[&str] = &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        let paths: &[&str] = &[];

        paths.iter().map(PathBuf::from).find(|p| p.exists())
    }

    /// Whether something answers on the debug port.
    pub async fn is_chrome_running(&self) -> bool {
        reqwest::get(&format!("{}/json/version", self.config.endpoint()))
            .await
            .is_ok()
    }

    async fn launch_chrome(&self) -> Result<Child, BrowserError> {
        let chrome_path = self.chrome_executable().ok_or(BrowserError::ChromeNotFound)?;
        let profile_dir = self.config.get_profile_dir();

        if let Err(e) = std::fs::create_dir_all(&profile_dir) {
            warn!("Failed to create profile directory: {}", e);
        }

        info!("Launching Chrome with profile at: {}", profile_dir.display());

        let child = Command::new(&chrome_path)
            .args(self.config.chrome_args())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false)
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        info!("Chrome launched with PID: {:?}", child.id());
        Ok(child)
    }

    async fn wait_until_listening(&self) -> Result<(), BrowserError> {
        let deadline = Instant::now() + self.config.launch_timeout();
        while Instant::now() < deadline {
            tokio::time::sleep(LAUNCH_POLL).await;
            if self.is_chrome_running().await {
                return Ok(());
            }
        }
        Err(BrowserError::LaunchFailed(format!(
            "Chrome did not open port {} within {:?}",
            self.config.debug_port,
            self.config.launch_timeout()
        )))
    }

    /// Connect to the browser, launching it if necessary.
    pub async fn connect(&self) -> Result<(), BrowserError> {
        if self.client.read().await.is_some() {
            return Ok(());
        }

        if self.is_chrome_running().await {
            info!("Chrome already running on port {}", self.config.debug_port);
        } else {
            info!(
                "Chrome not running on port {}, launching...",
                self.config.debug_port
            );
            let child = self.launch_chrome().await?;
            *self.chrome_process.write().await = Some(child);
            self.wait_until_listening().await?;
        }

        let client = CdpClient::connect(&self.config.endpoint(), self.config.call_timeout()).await?;
        *self.client.write().await = Some(Arc::new(client));

        info!("Connected to Chrome at {}", self.config.endpoint());
        Ok(())
    }

    async fn client(&self) -> Result<Arc<CdpClient>, BrowserError> {
        self.client
            .read()
            .await
            .clone()
            .ok_or(BrowserError::NotConnected)
    }

    /// Open a new tab, connecting first if needed.
    pub async fn open_page(&self) -> Result<CdpPage, BrowserError> {
        self.connect().await?;
        let client = self.client().await?;

        let session = client.new_page(None).await?;
        debug!("Opened tab {}", session.target_id());
        Ok(CdpPage::new(Arc::new(session), self.config.load_timeout()))
    }

    /// Close a tab opened with [`open_page`](Self::open_page).
    pub async fn close_page(&self, page: &CdpPage) -> Result<(), BrowserError> {
        let client = self.client().await?;
        client.close_page(page.session().target_id()).await?;
        Ok(())
    }

    /// Drop the connection, leaving Chrome running.
    pub async fn close(&self) -> Result<(), BrowserError> {
        let _ = self.client.write().await.take();
        info!("Browser connection closed");
        Ok(())
    }

    /// Close the connection and stop Chrome if this manager launched it.
    pub async fn shutdown_chrome(&self) -> Result<(), BrowserError> {
        self.close().await?;
        if let Some(mut child) = self.chrome_process.write().await.take() {
            info!("Shutting down Chrome...");
            let _ = child.kill().await;
        }
        Ok(())
    }
}
