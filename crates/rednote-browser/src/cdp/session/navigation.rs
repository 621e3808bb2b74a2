//! Navigation operations for CDP page session.

use std::time::Duration;

use serde_json::json;
use tokio::time::Instant;
use tracing::debug;

use crate::cdp::error::CdpError;

use super::core::PageSession;

const LOAD_POLL: Duration = Duration::from_millis(100);

impl PageSession {
    /// Navigate to `url` and wait until the document is interactive.
    pub async fn navigate(&self, url: &str, load_timeout: Duration) -> Result<String, CdpError> {
        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText").and_then(|e| e.as_str()) {
            return Err(CdpError::NavigationFailed(format!("{}: {}", url, error)));
        }

        let frame_id = result["frameId"]
            .as_str()
            .unwrap_or("main")
            .to_string();

        self.wait_for_load(load_timeout).await?;

        debug!("Navigated to {}", url);
        Ok(frame_id)
    }

    pub async fn wait_for_load(&self, timeout: Duration) -> Result<(), CdpError> {
        let start = Instant::now();

        loop {
            let result = self.evaluate("document.readyState").await?;

            if matches!(result.as_str(), Some("complete" | "interactive")) {
                return Ok(());
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout("Page load timeout".to_string()));
            }

            tokio::time::sleep(LOAD_POLL).await;
        }
    }

    pub async fn get_url(&self) -> Result<String, CdpError> {
        let result = self.evaluate("window.location.href").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }
}
