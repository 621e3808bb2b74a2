//! Publish request and receipt.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::error::PublishError;
use crate::resolver::Strategy;
use crate::tag_driver::TagOutcome;

/// Content of one image/text post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishRequest {
    pub title: String,
    /// Body text; `#name` runs become topics.
    pub body: String,
    /// Uploaded together, in this order.
    pub image_paths: Vec<PathBuf>,
}

impl PublishRequest {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        image_paths: impl IntoIterator<Item = impl Into<PathBuf>>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            image_paths: image_paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn validate(&self) -> Result<(), PublishError> {
        if self.image_paths.is_empty() {
            return Err(PublishError::EmptyImageSet);
        }
        Ok(())
    }

    /// Absolute paths of every image, failing on the first that is missing.
    pub(crate) fn absolute_images(&self) -> Result<Vec<PathBuf>, PublishError> {
        self.image_paths
            .iter()
            .map(|path| {
                std::fs::canonicalize(path).map_err(|_| PublishError::ImageNotFound(path.clone()))
            })
            .collect()
    }
}

/// How one hashtag was entered.
#[derive(Debug, Clone, Serialize)]
pub struct TagReport {
    pub tag: String,
    pub result: TagOutcome,
}

/// Summary of a successful publish.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReceipt {
    /// Strategy that located the body editor.
    pub strategy: Strategy,
    pub images: usize,
    pub segments: usize,
    pub tags: Vec<TagReport>,
    pub elapsed_ms: u128,
}

impl PublishReceipt {
    /// Hashtags that ended up as plain text.
    pub fn degraded_tags(&self) -> impl Iterator<Item = &str> {
        self.tags
            .iter()
            .filter(|t| t.result == TagOutcome::CommittedAsPlainText)
            .map(|t| t.tag.as_str())
    }
}
