use serde_json::json;

use rednote_core::Key;

use super::core::PageSession;
use crate::cdp::error::CdpError;
use crate::cdp::protocol::PropertyDescriptor;

fn property(name: &str, value: serde_json::Value) -> PropertyDescriptor {
    serde_json::from_value(json!({"name": name, "value": value})).unwrap()
}

fn node(id: &str) -> serde_json::Value {
    json!({"type": "object", "subtype": "node", "objectId": id})
}

#[test]
fn test_indexed_nodes_sorted_by_index() {
    let properties = vec![
        property("length", json!({"type": "number", "value": 3})),
        property("2", node("c")),
        property("0", node("a")),
        property("1", node("b")),
        property("__proto__", json!({"type": "object", "objectId": "proto"})),
    ];

    assert_eq!(PageSession::indexed_nodes(properties), vec!["a", "b", "c"]);
}

#[test]
fn test_indexed_nodes_skips_non_elements() {
    let properties = vec![
        property("0", json!({"type": "object", "subtype": "null"})),
        property("1", node("b")),
    ];

    assert_eq!(PageSession::indexed_nodes(properties), vec!["b"]);
}

#[test]
fn test_function_params_with_args() {
    let params = PageSession::function_params("obj-1", "function(n) {}", vec![json!("role")], true);

    assert_eq!(params["objectId"], "obj-1");
    assert_eq!(params["returnByValue"], true);
    assert_eq!(params["arguments"], json!([{"value": "role"}]));
}

#[test]
fn test_function_params_without_args() {
    let params = PageSession::function_params("obj-1", "function() {}", Vec::new(), false);

    assert_eq!(params["returnByValue"], false);
    assert!(params.get("arguments").is_none());
}

#[test]
fn test_check_exception_prefers_description() {
    let result = json!({
        "result": {"type": "object", "subtype": "error"},
        "exceptionDetails": {
            "text": "Uncaught",
            "exception": {"description": "TypeError: this.getAttribute is not a function"}
        }
    });

    match PageSession::check_exception(&result) {
        Err(CdpError::JavaScript(msg)) => {
            assert_eq!(msg, "TypeError: this.getAttribute is not a function")
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_check_exception_passes_results() {
    let result = json!({"result": {"type": "string", "value": "textbox"}});
    assert!(PageSession::check_exception(&result).is_ok());
}

#[test]
fn test_enter_key_events() {
    let [down, up] = PageSession::key_events(Key::Enter);

    assert_eq!(down["type"], "keyDown");
    assert_eq!(down["key"], "Enter");
    assert_eq!(down["windowsVirtualKeyCode"], 13);
    assert_eq!(down["text"], "\r");
    assert_eq!(up["type"], "keyUp");
    assert!(up.get("text").is_none());
}

#[test]
fn test_escape_has_no_text() {
    let [down, _] = PageSession::key_events(Key::Escape);
    assert_eq!(down["windowsVirtualKeyCode"], 27);
    assert!(down.get("text").is_none());
}
