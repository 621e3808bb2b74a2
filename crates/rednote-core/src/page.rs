//! Page collaborator trait.
//!
//! The core never talks to a browser directly. Everything it needs from a
//! page is expressed here; `rednote-browser` implements it over CDP and the
//! tests implement it over an in-memory DOM.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by a [`Page`] implementation.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Timed out after {}ms: {what}", .elapsed.as_millis())]
    Timeout { what: String, elapsed: Duration },

    #[error("Session deadline exceeded")]
    DeadlineExceeded,

    #[error("Operation was cancelled")]
    Cancelled,

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Interaction failed: {0}")]
    Interaction(String),
}

impl PageError {
    /// Build a timeout error.
    pub fn timeout(what: impl Into<String>, elapsed: Duration) -> Self {
        Self::Timeout {
            what: what.into(),
            elapsed,
        }
    }

    /// Whether the error comes from the session being stopped rather than
    /// from the page itself.
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

/// Opaque handle to one page element.
///
/// The identifier is owned by the [`Page`] implementation that produced it
/// and is only meaningful to that implementation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keystrokes sent with [`Page::send_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Enter,
    Tab,
    Escape,
}

impl Key {
    /// DOM `KeyboardEvent.key` value.
    pub fn name(&self) -> &'static str {
        match self {
            Key::Enter => "Enter",
            Key::Tab => "Tab",
            Key::Escape => "Escape",
        }
    }

    /// DOM `KeyboardEvent.code` value.
    pub fn code(&self) -> &'static str {
        self.name()
    }

    /// Windows virtual key code.
    pub fn virtual_key_code(&self) -> i64 {
        match self {
            Key::Enter => 13,
            Key::Tab => 9,
            Key::Escape => 27,
        }
    }

    /// Text produced by the key, if any.
    pub fn text(&self) -> Option<&'static str> {
        match self {
            Key::Enter => Some("\r"),
            Key::Tab | Key::Escape => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A browser page the core can drive.
///
/// Queries must not mutate page state; they may run concurrently while the
/// resolver races its strategies.
#[async_trait]
pub trait Page: Send + Sync {
    /// Navigate to `url` and wait for the document to load.
    async fn navigate(&self, url: &str) -> Result<(), PageError>;

    /// Wait until an element matching `selector` is present and visible.
    async fn wait_visible(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<ElementHandle, PageError>;

    /// First element matching `selector`, if any.
    async fn query_one(&self, selector: &str) -> Result<Option<ElementHandle>, PageError>;

    /// All elements matching `selector`, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>, PageError>;

    async fn click(&self, element: &ElementHandle) -> Result<(), PageError>;

    /// Type `text` into the element as user input.
    async fn type_text(&self, element: &ElementHandle, text: &str) -> Result<(), PageError>;

    /// Submit `paths` to a file input as one multi-file selection.
    async fn set_files(&self, element: &ElementHandle, paths: &[PathBuf])
    -> Result<(), PageError>;

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, PageError>;

    /// Visible text of the element.
    async fn text(&self, element: &ElementHandle) -> Result<String, PageError>;

    /// Parent element, `None` at the document root.
    async fn parent(&self, element: &ElementHandle) -> Result<Option<ElementHandle>, PageError>;

    async fn send_key(&self, element: &ElementHandle, key: Key) -> Result<(), PageError>;

    /// Drop handles that are no longer needed. Best effort; the handles
    /// must not be used afterwards.
    async fn release(&self, _elements: &[ElementHandle]) {}
}
