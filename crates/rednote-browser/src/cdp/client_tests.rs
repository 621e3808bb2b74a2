use std::time::Duration;

use serde_json::json;
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

use super::*;

fn version_body(ws_url: &str) -> serde_json::Value {
    json!({
        "Browser": "Chrome/126.0.6478.126",
        "Protocol-Version": "1.3",
        "webSocketDebuggerUrl": ws_url,
    })
}

#[tokio::test]
async fn test_connect_without_devtools_endpoint() {
    let mock_server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/json/version"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&mock_server)
        .await;

    let result = CdpClient::connect(&mock_server.uri(), Duration::from_secs(1)).await;
    assert!(matches!(result, Err(CdpError::ChromeNotAvailable(_))));
}

#[tokio::test]
async fn test_connect_unreachable_websocket() {
    let mock_server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/json/version"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(version_body("ws://127.0.0.1:1/devtools/browser/abc")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = CdpClient::connect(&mock_server.uri(), Duration::from_secs(1)).await;
    match result {
        Err(CdpError::ConnectionFailed(msg)) => assert!(msg.starts_with("WebSocket")),
        other => panic!("expected ConnectionFailed, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn test_connect_invalid_endpoint() {
    let result = CdpClient::connect("not a url", Duration::from_secs(1)).await;
    assert!(matches!(result, Err(CdpError::ConnectionFailed(_))));
}
