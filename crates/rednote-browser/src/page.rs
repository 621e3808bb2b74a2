//! [`Page`] over a CDP page session.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::trace;

use rednote_core::{ElementHandle, Key, Page, PageError};

use crate::cdp::{CdpError, PageSession};

const VISIBILITY_POLL: Duration = Duration::from_millis(100);

impl From<CdpError> for PageError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::NavigationFailed(msg) => PageError::Navigation(msg),
            CdpError::ElementNotFound(msg) => PageError::ElementNotFound(msg),
            CdpError::Timeout(what) => PageError::Timeout {
                what,
                elapsed: Duration::ZERO,
            },
            other => PageError::Interaction(other.to_string()),
        }
    }
}

/// A browser tab driven over CDP.
///
/// Element handles carry Runtime object ids and are only valid for the tab
/// that produced them.
pub struct CdpPage {
    session: Arc<PageSession>,
    load_timeout: Duration,
}

impl CdpPage {
    pub fn new(session: Arc<PageSession>, load_timeout: Duration) -> Self {
        Self {
            session,
            load_timeout,
        }
    }

    pub fn session(&self) -> &PageSession {
        &self.session
    }

    /// First visible match; every other match is released.
    async fn first_visible(&self, selector: &str) -> Result<Option<String>, CdpError> {
        let ids = self.session.query_selector_all(selector).await?;

        let mut found = Ok(None);
        for id in &ids {
            match self.session.is_visible(id).await {
                Ok(true) => {
                    found = Ok(Some(id.clone()));
                    break;
                }
                Ok(false) => {}
                Err(e) => {
                    found = Err(e);
                    break;
                }
            }
        }

        let keep = found.as_ref().ok().and_then(|id| id.as_deref());
        let unused: Vec<&str> = ids
            .iter()
            .map(String::as_str)
            .filter(|id| Some(*id) != keep)
            .collect();
        self.session.release_objects(unused).await;
        found
    }
}

fn handle(object_id: String) -> ElementHandle {
    ElementHandle::new(object_id)
}

#[async_trait]
impl Page for CdpPage {
    async fn navigate(&self, url: &str) -> Result<(), PageError> {
        let parsed =
            url::Url::parse(url).map_err(|e| PageError::Navigation(format!("{}: {}", url, e)))?;
        self.session.navigate(parsed.as_str(), self.load_timeout).await?;
        Ok(())
    }

    async fn wait_visible(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<ElementHandle, PageError> {
        let start = Instant::now();
        loop {
            if let Some(id) = self.first_visible(selector).await? {
                return Ok(handle(id));
            }
            if start.elapsed() >= timeout {
                return Err(PageError::timeout(
                    format!("wait for {} to be visible", selector),
                    start.elapsed(),
                ));
            }
            trace!("{} not visible yet", selector);
            tokio::time::sleep(VISIBILITY_POLL).await;
        }
    }

    async fn query_one(&self, selector: &str) -> Result<Option<ElementHandle>, PageError> {
        Ok(self.session.query_selector(selector).await?.map(handle))
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>, PageError> {
        Ok(self
            .session
            .query_selector_all(selector)
            .await?
            .into_iter()
            .map(handle)
            .collect())
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), PageError> {
        self.session.click_element(element.id()).await?;
        Ok(())
    }

    async fn type_text(&self, element: &ElementHandle, text: &str) -> Result<(), PageError> {
        self.session.focus(element.id()).await?;
        self.session.insert_text(text).await?;
        Ok(())
    }

    async fn set_files(
        &self,
        element: &ElementHandle,
        paths: &[PathBuf],
    ) -> Result<(), PageError> {
        let files: Vec<String> = paths
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        self.session
            .set_file_input_files(element.id(), &files)
            .await?;
        Ok(())
    }

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, PageError> {
        Ok(self.session.get_attribute(element.id(), name).await?)
    }

    async fn text(&self, element: &ElementHandle) -> Result<String, PageError> {
        Ok(self.session.inner_text(element.id()).await?)
    }

    async fn parent(&self, element: &ElementHandle) -> Result<Option<ElementHandle>, PageError> {
        Ok(self.session.parent_element(element.id()).await?.map(handle))
    }

    async fn send_key(&self, element: &ElementHandle, key: Key) -> Result<(), PageError> {
        self.session.focus(element.id()).await?;
        self.session.press_key(key).await?;
        Ok(())
    }

    async fn release(&self, elements: &[ElementHandle]) {
        self.session
            .release_objects(elements.iter().map(ElementHandle::id))
            .await
    }
}

#[cfg(test)]
#[path = "page_tests.rs"]
mod tests;
