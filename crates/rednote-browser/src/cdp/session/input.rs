//! Mouse and keyboard input for CDP page session.

use serde_json::{json, Value};
use tracing::debug;

use rednote_core::Key;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::{KeyEventType, MouseButton, MouseEventType};

use super::core::PageSession;

impl PageSession {
    /// Click at viewport coordinates.
    pub async fn click(&self, x: f64, y: f64) -> Result<(), CdpError> {
        self.call(
            "Input.dispatchMouseEvent",
            Some(json!({
                "type": MouseEventType::MouseMoved,
                "x": x,
                "y": y,
                "button": MouseButton::None,
            })),
        )
        .await?;

        for event in [MouseEventType::MousePressed, MouseEventType::MouseReleased] {
            self.call(
                "Input.dispatchMouseEvent",
                Some(json!({
                    "type": event,
                    "x": x,
                    "y": y,
                    "button": MouseButton::Left,
                    "clickCount": 1,
                })),
            )
            .await?;
        }

        debug!("Clicked at ({}, {})", x, y);
        Ok(())
    }

    /// Insert text at the current focus, as an IME commit would.
    pub async fn insert_text(&self, text: &str) -> Result<(), CdpError> {
        self.call("Input.insertText", Some(json!({"text": text})))
            .await?;
        debug!("Typed {} characters", text.chars().count());
        Ok(())
    }

    /// Press and release `key` at the current focus.
    pub async fn press_key(&self, key: Key) -> Result<(), CdpError> {
        for params in Self::key_events(key) {
            self.call("Input.dispatchKeyEvent", Some(params)).await?;
        }
        Ok(())
    }

    /// keyDown/keyUp pair for `key`. The down event carries the key's text
    /// so editors that listen for `keypress` see it too.
    pub(super) fn key_events(key: Key) -> [Value; 2] {
        let mut down = json!({
            "type": KeyEventType::KeyDown,
            "key": key.name(),
            "code": key.code(),
            "windowsVirtualKeyCode": key.virtual_key_code(),
            "nativeVirtualKeyCode": key.virtual_key_code(),
        });
        if let Some(text) = key.text() {
            down["text"] = json!(text);
            down["unmodifiedText"] = json!(text);
        }

        let up = json!({
            "type": KeyEventType::KeyUp,
            "key": key.name(),
            "code": key.code(),
            "windowsVirtualKeyCode": key.virtual_key_code(),
            "nativeVirtualKeyCode": key.virtual_key_code(),
        });
        [down, up]
    }
}
