//! Publish errors.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::page::PageError;
use crate::resolver::ResolveError;

/// Step of a publish attempt, used to attribute failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStep {
    Validate,
    SessionSetup,
    Upload,
    Title,
    Content,
    Submit,
}

impl PublishStep {
    pub fn name(&self) -> &'static str {
        match self {
            PublishStep::Validate => "validate",
            PublishStep::SessionSetup => "session setup",
            PublishStep::Upload => "upload",
            PublishStep::Title => "title",
            PublishStep::Content => "content",
            PublishStep::Submit => "submit",
        }
    }
}

impl fmt::Display for PublishStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Terminal failure of one publish attempt.
///
/// The message is prefixed with the failing step; the underlying page error
/// stays reachable through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("validate: at least one image is required")]
    EmptyImageSet,

    #[error("upload: image not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    #[error("session setup: {0}")]
    SessionSetupFailed(#[source] PageError),

    #[error("upload: {0}")]
    UploadFailed(#[source] PageError),

    #[error("title: {0}")]
    TitleInputFailed(#[source] PageError),

    #[error("content: {0}")]
    ContentTargetNotFound(#[source] ResolveError),

    #[error("content: segment {index}: {source}")]
    ContentInputFailed { index: usize, source: PageError },

    #[error("submit: {0}")]
    SubmitFailed(#[source] PageError),
}

impl PublishError {
    pub fn step(&self) -> PublishStep {
        match self {
            PublishError::EmptyImageSet => PublishStep::Validate,
            PublishError::SessionSetupFailed(_) => PublishStep::SessionSetup,
            PublishError::ImageNotFound(_) | PublishError::UploadFailed(_) => PublishStep::Upload,
            PublishError::TitleInputFailed(_) => PublishStep::Title,
            PublishError::ContentTargetNotFound(_) | PublishError::ContentInputFailed { .. } => {
                PublishStep::Content
            }
            PublishError::SubmitFailed(_) => PublishStep::Submit,
        }
    }

    /// Whether the attempt stopped because it was cancelled or ran out of
    /// time rather than because the page misbehaved.
    pub fn is_abort(&self) -> bool {
        match self {
            PublishError::SessionSetupFailed(e)
            | PublishError::UploadFailed(e)
            | PublishError::TitleInputFailed(e)
            | PublishError::ContentInputFailed { source: e, .. }
            | PublishError::SubmitFailed(e) => e.is_abort(),
            PublishError::ContentTargetNotFound(e) => e.is_abort(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;
    use crate::resolver::{Strategy, StrategyFailure};

    #[test]
    fn test_display_prefixes_step() {
        let err = PublishError::UploadFailed(PageError::ElementNotFound(".upload-input".into()));
        assert_eq!(err.to_string(), "upload: Element not found: .upload-input");
        assert_eq!(err.step(), PublishStep::Upload);
    }

    #[test]
    fn test_source_preserves_cause() {
        let err = PublishError::TitleInputFailed(PageError::Interaction("detached".into()));
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "Interaction failed: detached");
    }

    #[test]
    fn test_content_target_wraps_resolver() {
        let err = PublishError::ContentTargetNotFound(ResolveError::ElementNotFound {
            attempts: vec![StrategyFailure {
                strategy: Strategy::DirectSelector,
                reason: "timed out".into(),
            }],
        });
        assert!(err.to_string().starts_with("content: Editing target not found"));
        assert!(err.to_string().contains("direct_selector (timed out)"));
        assert_eq!(err.step(), PublishStep::Content);
    }

    #[test]
    fn test_content_input_names_segment() {
        let err = PublishError::ContentInputFailed {
            index: 3,
            source: PageError::Interaction("lost focus".into()),
        };
        assert_eq!(
            err.to_string(),
            "content: segment 3: Interaction failed: lost focus"
        );
    }

    #[test]
    fn test_is_abort() {
        assert!(PublishError::SubmitFailed(PageError::Cancelled).is_abort());
        assert!(!PublishError::EmptyImageSet.is_abort());
        assert!(!PublishError::SubmitFailed(PageError::Interaction("x".into())).is_abort());
    }

    #[test]
    fn test_aborted_resolution_is_abort() {
        let err = PublishError::ContentTargetNotFound(ResolveError::Aborted(PageError::Cancelled));
        assert!(err.is_abort());
        assert_eq!(err.step(), PublishStep::Content);
        assert_eq!(err.to_string(), "content: Operation was cancelled");

        let err = PublishError::ContentTargetNotFound(ResolveError::ElementNotFound {
            attempts: Vec::new(),
        });
        assert!(!err.is_abort());
    }

    #[test]
    fn test_step_names() {
        assert_eq!(PublishStep::SessionSetup.to_string(), "session setup");
        assert_eq!(PublishError::EmptyImageSet.step(), PublishStep::Validate);
    }
}
