//! CDP WebSocket client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, trace, warn};
use url::Url;

use super::error::CdpError;
use super::protocol::{BrowserVersion, CdpRequest, CdpResponse, PageInfo};
use super::session::PageSession;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// Request waiting for its response.
struct PendingRequest {
    tx: oneshot::Sender<Result<Value, CdpError>>,
}

/// Request/response plumbing shared by the client and its page sessions.
pub(crate) struct Transport {
    ws_tx: tokio::sync::Mutex<WsSink>,
    pending: Mutex<HashMap<u64, PendingRequest>>,
    request_id: AtomicU64,
    call_timeout: Duration,
}

impl Transport {
    /// Send a command and wait for its response.
    pub(crate) async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(|s| s.to_string()),
        };

        let json = serde_json::to_string(&request)?;
        trace!("CDP send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, PendingRequest { tx });

        {
            let mut ws = self.ws_tx.lock().await;
            if let Err(e) = ws.send(Message::Text(json.into())).await {
                self.pending.lock().remove(&id);
                return Err(e.into());
            }
        }

        match tokio::time::timeout(self.call_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout(format!("Request {} timed out", method)))
            }
        }
    }

    /// Route one incoming message to the request waiting for it.
    fn dispatch(&self, resp: CdpResponse) {
        let Some(id) = resp.id else {
            if let Some(method) = resp.method {
                trace!("CDP event {}", method);
            }
            return;
        };

        let Some(req) = self.pending.lock().remove(&id) else {
            debug!("Dropping response to unknown request {}", id);
            return;
        };

        let result = match resp.error {
            Some(error) => Err(CdpError::Protocol {
                code: error.code,
                message: error.message,
            }),
            None => Ok(resp.result.unwrap_or(Value::Null)),
        };
        let _ = req.tx.send(result);
    }

    /// Fail every outstanding request with [`CdpError::SessionClosed`].
    fn close(&self) {
        self.pending.lock().clear();
    }
}

/// CDP client connected to a browser.
pub struct CdpClient {
    /// HTTP endpoint for page discovery.
    http_endpoint: String,
    browser_ws_url: String,
    transport: Arc<Transport>,
    _recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connect to Chrome at `endpoint` (e.g. `http://localhost:9222`).
    ///
    /// Every command sent through the client or its sessions gives up after
    /// `call_timeout`.
    pub async fn connect(endpoint: &str, call_timeout: Duration) -> Result<Self, CdpError> {
        let http_endpoint = Url::parse(endpoint)?.as_str().trim_end_matches('/').to_string();

        let version_url = format!("{}/json/version", http_endpoint);
        debug!("Fetching browser version from {}", version_url);

        let version: BrowserVersion = reqwest::get(&version_url)
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?
            .json()
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?;

        debug!(
            "Connected to browser: {} (protocol {})",
            version.browser, version.protocol_version
        );

        let browser_ws_url = version.web_socket_debugger_url;

        let (ws_stream, _) = tokio_tungstenite::connect_async(&browser_ws_url)
            .await
            .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {}", e)))?;

        let (ws_sink, ws_source) = ws_stream.split();
        let transport = Arc::new(Transport {
            ws_tx: tokio::sync::Mutex::new(ws_sink),
            pending: Mutex::new(HashMap::new()),
            request_id: AtomicU64::new(1),
            call_timeout,
        });

        let recv_task = {
            let transport = transport.clone();
            tokio::spawn(async move {
                Self::receive_loop(ws_source, &transport).await;
                transport.close();
            })
        };

        debug!("CDP client connected to {}", browser_ws_url);

        Ok(Self {
            http_endpoint,
            browser_ws_url,
            transport,
            _recv_task: recv_task,
        })
    }

    async fn receive_loop(mut ws_source: WsSource, transport: &Transport) {
        while let Some(msg) = ws_source.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    trace!("CDP recv: {}", text);
                    match serde_json::from_str::<CdpResponse>(&text) {
                        Ok(resp) => transport.dispatch(resp),
                        Err(e) => warn!("Failed to parse CDP message: {}", e),
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("WebSocket closed");
                    break;
                }
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    }

    /// Send a browser-level CDP command.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport.call(method, params, None).await
    }

    pub fn browser_ws_url(&self) -> &str {
        &self.browser_ws_url
    }

    /// List open tabs.
    pub async fn list_pages(&self) -> Result<Vec<PageInfo>, CdpError> {
        let url = format!("{}/json/list", self.http_endpoint);
        let pages: Vec<PageInfo> = reqwest::get(&url).await?.json().await?;
        Ok(pages)
    }

    /// Open a new tab and attach to it.
    pub async fn new_page(&self, url: Option<&str>) -> Result<PageSession, CdpError> {
        // Chrome requires PUT for /json/new
        let create_url = match url {
            Some(u) => format!("{}/json/new?{}", self.http_endpoint, u),
            None => format!("{}/json/new", self.http_endpoint),
        };

        let client = reqwest::Client::new();
        let page_info: PageInfo = client.put(&create_url).send().await?.json().await?;
        debug!("Created new page: {} - {}", page_info.id, page_info.url);

        self.attach_page(&page_info.id).await
    }

    /// Attach to an existing tab.
    pub async fn attach_page(&self, target_id: &str) -> Result<PageSession, CdpError> {
        let result = self
            .call(
                "Target.attachToTarget",
                Some(json!({
                    "targetId": target_id,
                    "flatten": true
                })),
            )
            .await?;

        let session_id = result["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing sessionId".to_string()))?
            .to_string();

        let session = PageSession::new(target_id.to_string(), session_id, self.transport.clone());
        session.enable_domains().await?;

        Ok(session)
    }

    pub async fn close_page(&self, target_id: &str) -> Result<(), CdpError> {
        self.call("Target.closeTarget", Some(json!({"targetId": target_id})))
            .await?;
        Ok(())
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self._recv_task.abort();
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
