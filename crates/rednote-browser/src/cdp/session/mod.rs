//! CDP page session for interacting with a single page.
//!
//! Elements are addressed by Runtime object ids rather than DOM node ids:
//! object ids stay valid across `DOM.getDocument` calls, which the editor's
//! frequent re-renders would otherwise invalidate.

mod core;
mod dom;
mod input;
mod js;
mod navigation;

pub use self::core::PageSession;

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
