//! DOM operations for CDP page session.

use serde_json::{json, Value};

use crate::cdp::error::CdpError;
use crate::cdp::protocol::{BoxModel, PropertyDescriptor};

use super::core::PageSession;

const PARENT_FN: &str = "function() { return this.parentElement; }";
const ATTRIBUTE_FN: &str = "function(name) { return this.getAttribute(name); }";
const TEXT_FN: &str = "function() { return this.innerText || this.textContent || ''; }";

impl PageSession {
    /// First element matching `selector`, as a Runtime object id.
    pub async fn query_selector(&self, selector: &str) -> Result<Option<String>, CdpError> {
        let expression = format!("document.querySelector({})", json!(selector));
        let object = self.evaluate_handle(&expression).await?;
        Ok(object.node_id().map(str::to_string))
    }

    /// Every element matching `selector`, in document order.
    ///
    /// The intermediate array is released; the returned element ids are
    /// owned by the caller.
    pub async fn query_selector_all(&self, selector: &str) -> Result<Vec<String>, CdpError> {
        let expression = format!("Array.from(document.querySelectorAll({}))", json!(selector));
        let array = self.evaluate_handle(&expression).await?;
        let Some(array_id) = array.object_id else {
            return Ok(Vec::new());
        };

        let elements = self.array_elements(&array_id).await;
        self.release_objects([array_id.as_str()]).await;
        elements
    }

    async fn array_elements(&self, array_id: &str) -> Result<Vec<String>, CdpError> {
        let result = self
            .call(
                "Runtime.getProperties",
                Some(json!({"objectId": array_id, "ownProperties": true})),
            )
            .await?;
        let properties: Vec<PropertyDescriptor> =
            serde_json::from_value(result["result"].clone())?;

        Ok(Self::indexed_nodes(properties))
    }

    /// Element object ids of the array-index properties, sorted by index.
    pub(super) fn indexed_nodes(properties: Vec<PropertyDescriptor>) -> Vec<String> {
        let mut indexed: Vec<(usize, String)> = properties
            .into_iter()
            .filter_map(|p| {
                let index = p.name.parse::<usize>().ok()?;
                let id = p.value?.node_id()?.to_string();
                Some((index, id))
            })
            .collect();
        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, id)| id).collect()
    }

    pub async fn parent_element(&self, object_id: &str) -> Result<Option<String>, CdpError> {
        let parent = self
            .call_function_handle(object_id, PARENT_FN, Vec::new())
            .await?;
        Ok(parent.node_id().map(str::to_string))
    }

    pub async fn get_attribute(
        &self,
        object_id: &str,
        name: &str,
    ) -> Result<Option<String>, CdpError> {
        let value = self
            .call_function_on(object_id, ATTRIBUTE_FN, vec![json!(name)])
            .await?;
        Ok(match value {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    pub async fn inner_text(&self, object_id: &str) -> Result<String, CdpError> {
        let value = self.call_function_on(object_id, TEXT_FN, Vec::new()).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Box model, or `None` if the element is not rendered.
    pub async fn get_box_model(&self, object_id: &str) -> Result<Option<BoxModel>, CdpError> {
        let result = self
            .call("DOM.getBoxModel", Some(json!({"objectId": object_id})))
            .await;

        match result {
            Ok(r) => {
                let model: BoxModel = serde_json::from_value(r["model"].clone())?;
                Ok(Some(model))
            }
            Err(e) if e.is_server_error() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Whether the element is rendered with a non-empty box.
    pub async fn is_visible(&self, object_id: &str) -> Result<bool, CdpError> {
        Ok(self
            .get_box_model(object_id)
            .await?
            .is_some_and(|model| !model.is_empty()))
    }

    pub async fn scroll_into_view(&self, object_id: &str) -> Result<(), CdpError> {
        self.call(
            "DOM.scrollIntoViewIfNeeded",
            Some(json!({"objectId": object_id})),
        )
        .await?;
        Ok(())
    }

    pub async fn focus(&self, object_id: &str) -> Result<(), CdpError> {
        self.call("DOM.focus", Some(json!({"objectId": object_id})))
            .await?;
        Ok(())
    }

    /// Select local files on an `<input type="file">`.
    pub async fn set_file_input_files(
        &self,
        object_id: &str,
        files: &[String],
    ) -> Result<(), CdpError> {
        self.call(
            "DOM.setFileInputFiles",
            Some(json!({"objectId": object_id, "files": files})),
        )
        .await?;
        Ok(())
    }

    /// Scroll the element into view and click the center of its box.
    pub async fn click_element(&self, object_id: &str) -> Result<(), CdpError> {
        self.scroll_into_view(object_id).await?;
        let model = self
            .get_box_model(object_id)
            .await?
            .filter(|m| !m.is_empty())
            .ok_or_else(|| CdpError::ElementNotFound("element is not visible".to_string()))?;

        let (x, y) = model.center();
        self.click(x, y).await
    }
}
