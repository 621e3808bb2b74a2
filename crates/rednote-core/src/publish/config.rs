//! Publish flow configuration.
//!
//! Defaults match the current creator page; every value can be overridden
//! from the `[publish]` table of the config file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Publish page of the creator center.
    pub url: String,
    /// Visible label of the image/text post tab.
    pub image_tab_label: String,
    /// Overall budget of one publish attempt.
    pub deadline_secs: u64,
    pub selectors: SelectorConfig,
    pub timeouts: TimeoutConfig,
    pub settle: SettleConfig,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            url: "https://creator.xiaohongshu.com/publish/publish?source=official".to_string(),
            image_tab_label: "上传图文".to_string(),
            deadline_secs: 300,
            selectors: SelectorConfig::default(),
            timeouts: TimeoutConfig::default(),
            settle: SettleConfig::default(),
        }
    }
}

impl PublishConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

/// CSS selectors of the fixed parts of the publish page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub upload_region: String,
    pub creator_tab: String,
    pub upload_input: String,
    pub title_input: String,
    pub submit_button: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            upload_region: "div.upload-content".to_string(),
            creator_tab: "div.creator-tab".to_string(),
            upload_input: ".upload-input".to_string(),
            title_input: "div.d-input input".to_string(),
            submit_button: "div.submit div.d-button-content".to_string(),
        }
    }
}

/// Per-operation timeouts of each step, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub setup_ms: u64,
    pub upload_ms: u64,
    pub title_ms: u64,
    pub content_ms: u64,
    pub submit_ms: u64,
    /// Interval between lookups while waiting for an element.
    pub poll_interval_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            setup_ms: 60_000,
            upload_ms: 30_000,
            title_ms: 10_000,
            content_ms: 30_000,
            submit_ms: 10_000,
            poll_interval_ms: 100,
        }
    }
}

impl TimeoutConfig {
    pub fn setup(&self) -> Duration {
        Duration::from_millis(self.setup_ms)
    }

    pub fn upload(&self) -> Duration {
        Duration::from_millis(self.upload_ms)
    }

    pub fn title(&self) -> Duration {
        Duration::from_millis(self.title_ms)
    }

    pub fn content(&self) -> Duration {
        Duration::from_millis(self.content_ms)
    }

    pub fn submit(&self) -> Duration {
        Duration::from_millis(self.submit_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Fixed waits for the page to catch up, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettleConfig {
    pub page_load_ms: u64,
    pub tab_switch_ms: u64,
    pub upload_ms: u64,
    pub title_ms: u64,
    /// After every body segment.
    pub segment_ms: u64,
    pub body_ms: u64,
    pub submit_ms: u64,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            page_load_ms: 1_000,
            tab_switch_ms: 1_000,
            upload_ms: 3_000,
            title_ms: 1_000,
            segment_ms: 200,
            body_ms: 1_000,
            submit_ms: 3_000,
        }
    }
}

impl SettleConfig {
    pub fn page_load(&self) -> Duration {
        Duration::from_millis(self.page_load_ms)
    }

    pub fn tab_switch(&self) -> Duration {
        Duration::from_millis(self.tab_switch_ms)
    }

    pub fn upload(&self) -> Duration {
        Duration::from_millis(self.upload_ms)
    }

    pub fn title(&self) -> Duration {
        Duration::from_millis(self.title_ms)
    }

    pub fn segment(&self) -> Duration {
        Duration::from_millis(self.segment_ms)
    }

    pub fn body(&self) -> Duration {
        Duration::from_millis(self.body_ms)
    }

    pub fn submit(&self) -> Duration {
        Duration::from_millis(self.submit_ms)
    }
}
