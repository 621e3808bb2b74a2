//! CDP protocol types and message definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// CDP request message.
#[derive(Debug, Serialize)]
pub struct CdpRequest {
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// CDP response or event message.
#[derive(Debug, Deserialize)]
pub struct CdpResponse {
    pub id: Option<u64>,
    pub result: Option<Value>,
    pub error: Option<CdpErrorResponse>,
    pub method: Option<String>,
    pub params: Option<Value>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CdpErrorResponse {
    pub code: i64,
    pub message: String,
    pub data: Option<String>,
}

/// Page info from the `/json` endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub page_type: String,
    pub title: String,
    pub url: String,
    pub web_socket_debugger_url: Option<String>,
}

/// Browser version info.
///
/// Chrome returns PascalCase field names for this endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserVersion {
    #[serde(rename = "Browser")]
    pub browser: String,
    #[serde(rename = "Protocol-Version")]
    pub protocol_version: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

/// Box model of a rendered node.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxModel {
    pub content: Vec<f64>,
    pub width: i64,
    pub height: i64,
}

impl BoxModel {
    /// Center of the content quad.
    pub fn center(&self) -> (f64, f64) {
        let quad = &self.content;
        if quad.len() >= 8 {
            let x = (quad[0] + quad[2] + quad[4] + quad[6]) / 4.0;
            let y = (quad[1] + quad[3] + quad[5] + quad[7]) / 4.0;
            (x, y)
        } else {
            (0.0, 0.0)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Remote object from the Runtime domain.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    #[serde(rename = "type")]
    pub object_type: String,
    pub subtype: Option<String>,
    pub class_name: Option<String>,
    pub value: Option<Value>,
    pub description: Option<String>,
    pub object_id: Option<String>,
}

impl RemoteObject {
    /// Object id of a DOM node, or `None` for `null`/`undefined`.
    pub fn node_id(&self) -> Option<&str> {
        match self.subtype.as_deref() {
            Some("node") => self.object_id.as_deref(),
            _ => None,
        }
    }
}

/// Own property of a remote object, as returned by `Runtime.getProperties`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub name: String,
    pub value: Option<RemoteObject>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    None,
    Left,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MouseEventType {
    MousePressed,
    MouseReleased,
    MouseMoved,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyEventType {
    KeyDown,
    KeyUp,
    RawKeyDown,
    Char,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_omits_empty_fields() {
        let req = CdpRequest {
            id: 7,
            method: "Page.enable".into(),
            params: None,
            session_id: None,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"id": 7, "method": "Page.enable"})
        );
    }

    #[test]
    fn test_response_with_error() {
        let resp: CdpResponse = serde_json::from_value(json!({
            "id": 3,
            "error": {"code": -32000, "message": "Could not compute box model."}
        }))
        .unwrap();
        let error = resp.error.unwrap();
        assert_eq!(error.code, -32000);
        assert_eq!(resp.id, Some(3));
    }

    #[test]
    fn test_box_model_center() {
        let model = BoxModel {
            content: vec![0.0, 0.0, 100.0, 0.0, 100.0, 50.0, 0.0, 50.0],
            width: 100,
            height: 50,
        };
        assert_eq!(model.center(), (50.0, 25.0));
        assert!(!model.is_empty());
    }

    #[test]
    fn test_zero_size_box_is_empty() {
        let model = BoxModel {
            content: vec![0.0; 8],
            width: 0,
            height: 12,
        };
        assert!(model.is_empty());
    }

    #[test]
    fn test_remote_node_id() {
        let node: RemoteObject = serde_json::from_value(json!({
            "type": "object",
            "subtype": "node",
            "className": "HTMLDivElement",
            "objectId": "{\"injectedScriptId\":1,\"id\":4}"
        }))
        .unwrap();
        assert_eq!(node.node_id(), Some("{\"injectedScriptId\":1,\"id\":4}"));

        let null: RemoteObject =
            serde_json::from_value(json!({"type": "object", "subtype": "null", "value": null}))
                .unwrap();
        assert_eq!(null.node_id(), None);
    }

    #[test]
    fn test_browser_version_pascal_case() {
        let version: BrowserVersion = serde_json::from_value(json!({
            "Browser": "Chrome/131.0.0.0",
            "Protocol-Version": "1.3",
            "webSocketDebuggerUrl": "ws://localhost:9222/devtools/browser/abc"
        }))
        .unwrap();
        assert_eq!(version.browser, "Chrome/131.0.0.0");
    }

    #[test]
    fn test_event_serialization() {
        let key = serde_json::to_value(KeyEventType::RawKeyDown).unwrap();
        assert_eq!(key, json!("rawKeyDown"));
        let mouse = serde_json::to_value(MouseEventType::MousePressed).unwrap();
        assert_eq!(mouse, json!("mousePressed"));
    }
}
