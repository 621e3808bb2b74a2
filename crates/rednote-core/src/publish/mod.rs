//! Image/text post publishing.
//!
//! A [`Publisher`] owns one creator page. Each call to
//! [`Publisher::publish`] is one attempt, bounded by its own deadline:
//!
//! 1. validate the request (no page access)
//! 2. open the publish page and select the image/text tab (first attempt only)
//! 3. upload the images
//! 4. enter the title
//! 5. resolve the body editor and type the body segment by segment
//! 6. submit
//!
//! The first failing step ends the attempt; nothing already entered on the
//! page is rolled back.

mod config;
mod error;
mod publisher;
mod request;

pub use config::{PublishConfig, SelectorConfig, SettleConfig, TimeoutConfig};
pub use error::{PublishError, PublishStep};
pub use publisher::Publisher;
pub use request::{PublishReceipt, PublishRequest, TagReport};
