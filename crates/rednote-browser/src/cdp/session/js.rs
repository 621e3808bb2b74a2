//! JavaScript execution operations for CDP page session.

use serde_json::{json, Value};
use tracing::debug;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::RemoteObject;

use super::core::PageSession;

impl PageSession {
    /// Evaluate an expression and return its value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        Self::check_exception(&result)?;
        Ok(result["result"]["value"].clone())
    }

    /// Evaluate an expression and return a handle to the result.
    pub async fn evaluate_handle(&self, expression: &str) -> Result<RemoteObject, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": false,
                })),
            )
            .await?;

        Self::check_exception(&result)?;
        let remote_obj: RemoteObject = serde_json::from_value(result["result"].clone())?;
        Ok(remote_obj)
    }

    /// Call `function` with `this` bound to a remote object and return its
    /// value.
    pub async fn call_function_on(
        &self,
        object_id: &str,
        function: &str,
        args: Vec<Value>,
    ) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.callFunctionOn",
                Some(Self::function_params(object_id, function, args, true)),
            )
            .await?;

        Self::check_exception(&result)?;
        Ok(result["result"]["value"].clone())
    }

    /// Like [`call_function_on`](Self::call_function_on), returning a handle.
    pub async fn call_function_handle(
        &self,
        object_id: &str,
        function: &str,
        args: Vec<Value>,
    ) -> Result<RemoteObject, CdpError> {
        let result = self
            .call(
                "Runtime.callFunctionOn",
                Some(Self::function_params(object_id, function, args, false)),
            )
            .await?;

        Self::check_exception(&result)?;
        let remote_obj: RemoteObject = serde_json::from_value(result["result"].clone())?;
        Ok(remote_obj)
    }

    pub(super) fn function_params(
        object_id: &str,
        function: &str,
        args: Vec<Value>,
        by_value: bool,
    ) -> Value {
        let mut params = json!({
            "objectId": object_id,
            "functionDeclaration": function,
            "returnByValue": by_value,
            "awaitPromise": true,
        });

        if !args.is_empty() {
            let arguments: Vec<Value> = args.into_iter().map(|v| json!({"value": v})).collect();
            params["arguments"] = Value::Array(arguments);
        }
        params
    }

    /// Release a remote object so the tab can collect it.
    pub async fn release_object(&self, object_id: &str) -> Result<(), CdpError> {
        self.call("Runtime.releaseObject", Some(json!({"objectId": object_id})))
            .await?;
        Ok(())
    }

    /// Release several objects, logging instead of failing.
    pub async fn release_objects<'a>(&self, object_ids: impl IntoIterator<Item = &'a str>) {
        for object_id in object_ids {
            if let Err(e) = self.release_object(object_id).await {
                debug!("Failed to release {}: {}", object_id, e);
            }
        }
    }

    pub(super) fn check_exception(result: &Value) -> Result<(), CdpError> {
        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception["exception"]["description"]
                .as_str()
                .or_else(|| exception["text"].as_str())
                .unwrap_or("Unknown error");
            return Err(CdpError::JavaScript(text.to_string()));
        }
        Ok(())
    }
}
