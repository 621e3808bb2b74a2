//! Hashtag entry through the editor's topic autocomplete.
//!
//! Typing `#` in the editor opens a topic list, typing the name filters it,
//! and confirming the first entry turns the text into a topic link. The list
//! is hard to detect reliably, so a missing list is a normal outcome rather
//! than an error. Only an unexpected failure while typing the marker or the
//! name makes the driver fall back to entering the tag as plain text.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::page::{Key, Page, PageError};
use crate::resolver::EditingTarget;
use crate::session::ScopedPage;
use crate::tokenizer::{ContentSegment, TAG_MARKER};

/// Whether an autocomplete entry was actually picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Suggestion {
    /// A suggestion element was found and clicked.
    Confirmed,
    /// The confirmation key was sent without seeing a suggestion list.
    Unconfirmed,
}

/// Result of driving one hashtag segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum TagOutcome {
    /// Marker and name were typed through the autocomplete sequence.
    Committed { suggestion: Suggestion },
    /// The sequence failed and the segment was typed verbatim instead.
    CommittedAsPlainText,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TagInputConfig {
    /// Wait after typing the marker for the topic list to open.
    pub trigger_settle_ms: u64,
    /// Wait after typing the name for the list to refresh.
    pub query_settle_ms: u64,
    /// Wait before looking for a suggestion.
    pub dropdown_settle_ms: u64,
    /// Wait after confirming.
    pub confirm_settle_ms: u64,
    /// First suggestion in the topic list. When unset, only the confirm key
    /// is sent and the outcome is always unconfirmed.
    pub suggestion_selector: Option<String>,
    pub confirm_key: Key,
}

impl Default for TagInputConfig {
    fn default() -> Self {
        Self {
            trigger_settle_ms: 500,
            query_settle_ms: 800,
            dropdown_settle_ms: 300,
            confirm_settle_ms: 200,
            suggestion_selector: None,
            confirm_key: Key::Enter,
        }
    }
}

fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

/// Drives the trigger / query / confirm sequence for hashtag segments.
pub struct TagInputDriver {
    config: TagInputConfig,
}

impl TagInputDriver {
    pub fn new(config: TagInputConfig) -> Self {
        Self { config }
    }

    /// Enter `segment` into `target`.
    ///
    /// Autocomplete problems never produce an error. An `Err` means the
    /// segment could not be entered at all: the plain-text fallback itself
    /// failed, or the session was cancelled or ran out of time.
    pub async fn drive(
        &self,
        page: &ScopedPage<'_>,
        target: &EditingTarget,
        segment: &ContentSegment,
    ) -> Result<TagOutcome, PageError> {
        let Some(name) = segment.tag_name() else {
            page.type_text(target.element(), &segment.text).await?;
            return Ok(TagOutcome::CommittedAsPlainText);
        };

        match self.trigger_and_query(page, target, name).await {
            Ok(()) => {
                let suggestion = self.confirm(page, target).await;
                debug!(tag = %segment.text, ?suggestion, "Tag committed");
                Ok(TagOutcome::Committed { suggestion })
            }
            Err(e) if e.is_abort() => Err(e),
            Err(e) => {
                warn!(tag = %segment.text, error = %e, "Tag entry failed, typing as plain text");
                page.type_text(target.element(), &segment.text).await?;
                Ok(TagOutcome::CommittedAsPlainText)
            }
        }
    }

    async fn trigger_and_query(
        &self,
        page: &ScopedPage<'_>,
        target: &EditingTarget,
        name: &str,
    ) -> Result<(), PageError> {
        let element = target.element();

        let mut marker = [0u8; 4];
        page.type_text(element, TAG_MARKER.encode_utf8(&mut marker))
            .await?;
        page.settle(millis(self.config.trigger_settle_ms)).await?;

        page.type_text(element, name).await?;
        page.settle(millis(self.config.query_settle_ms)).await?;
        Ok(())
    }

    /// Best effort; failures are logged and reported as unconfirmed.
    async fn confirm(&self, page: &ScopedPage<'_>, target: &EditingTarget) -> Suggestion {
        match self.try_confirm(page, target).await {
            Ok(suggestion) => suggestion,
            Err(e) => {
                warn!(error = %e, "Topic suggestion could not be confirmed");
                Suggestion::Unconfirmed
            }
        }
    }

    async fn try_confirm(
        &self,
        page: &ScopedPage<'_>,
        target: &EditingTarget,
    ) -> Result<Suggestion, PageError> {
        page.settle(millis(self.config.dropdown_settle_ms)).await?;

        if let Some(selector) = &self.config.suggestion_selector {
            if let Some(item) = page.query_one(selector).await? {
                page.click(&item).await?;
                page.settle(millis(self.config.confirm_settle_ms)).await?;
                return Ok(Suggestion::Confirmed);
            }
            debug!("No topic suggestion matches {}", selector);
        }

        page.send_key(target.element(), self.config.confirm_key)
            .await?;
        page.settle(millis(self.config.confirm_settle_ms)).await?;
        Ok(Suggestion::Unconfirmed)
    }
}

impl Default for TagInputDriver {
    fn default() -> Self {
        Self::new(TagInputConfig::default())
    }
}

#[cfg(test)]
#[path = "tag_driver_tests.rs"]
mod tests;
