//! Chrome backend for the rednote publisher.
//!
//! [`BrowserManager`] launches (or reuses) a Chrome instance with a
//! persistent profile so the creator login survives between runs, and hands
//! out [`CdpPage`]s that implement [`rednote_core::Page`] over the DevTools
//! protocol.

pub mod cdp;
pub mod manager;
mod page;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use manager::{BrowserError, BrowserManager, BrowserManagerConfig};
pub use page::CdpPage;
