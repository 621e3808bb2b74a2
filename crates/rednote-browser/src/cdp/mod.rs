//! Chrome DevTools Protocol (CDP) client.
//!
//! Connects to Chrome over WebSocket and speaks the CDP JSON-RPC protocol.
//! Chrome must be running with remote debugging enabled:
//!
//! ```bash
//! chrome --remote-debugging-port=9222
//! ```
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222", Duration::from_secs(30)).await?;
//! let page = client.new_page(None).await?;
//! page.navigate("https://creator.xiaohongshu.com", Duration::from_secs(30)).await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;
