//! # rednote core
//!
//! Composes an image/text post in the creator web editor.
//!
//! The editor's DOM shape changes between releases and A/B variants, so the
//! crate is split into small pieces that each own one concern:
//!
//! - [`tokenizer`] - splits body text into plain-text and hashtag segments
//! - [`resolver`] - races several strategies to locate the rich-text target
//! - [`tag_driver`] - feeds a hashtag through the editor's autocomplete
//! - [`publish`] - sequences upload, title, body and submit into one attempt
//!
//! All page access goes through the [`Page`] trait so the browser backend
//! can be swapped for an in-memory page in tests.

pub mod page;
pub mod publish;
pub mod resolver;
pub mod session;
pub mod tag_driver;
pub mod tokenizer;

#[cfg(test)]
pub(crate) mod testing;

pub use page::{ElementHandle, Key, Page, PageError};
pub use publish::{
    PublishConfig, PublishError, PublishReceipt, PublishRequest, PublishStep, Publisher,
    SelectorConfig, SettleConfig, TagReport, TimeoutConfig,
};
pub use resolver::{
    ascend, EditingTarget, ElementResolver, ResolveError, ResolverConfig, Strategy,
    StrategyFailure,
};
pub use session::{ScopedPage, Session};
pub use tag_driver::{Suggestion, TagInputConfig, TagInputDriver, TagOutcome};
pub use tokenizer::{tokenize, ContentSegment, SegmentKind, TokenizedContent, TAG_MARKER};
