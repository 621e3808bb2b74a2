//! Per-attempt page session with deadline and cancellation.
//!
//! A [`Session`] is acquired once per publish attempt. It carries the
//! overall deadline and the caller's cancellation token; every step works
//! through a [`ScopedPage`] view obtained with [`Session::with_timeout`],
//! which bounds each page operation by `min(step timeout, time left)`.
//!
//! Cancellation is observed at wait boundaries only: before an operation
//! starts, while polling, and while settling. An operation that is already
//! typing or clicking is allowed to finish.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::page::{ElementHandle, Key, Page, PageError};

/// One attempt's view of a browser page.
pub struct Session {
    page: Arc<dyn Page>,
    deadline: Instant,
    cancel: CancellationToken,
}

impl Session {
    /// Acquire a session whose deadline is `budget` from now.
    pub fn new(page: Arc<dyn Page>, budget: Duration) -> Self {
        Self {
            page,
            deadline: Instant::now() + budget,
            cancel: CancellationToken::new(),
        }
    }

    /// Use a caller-owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left before the deadline.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Scoped view whose operations are bounded by `timeout`.
    pub fn with_timeout(&self, timeout: Duration) -> ScopedPage<'_> {
        ScopedPage {
            page: self.page.as_ref(),
            timeout,
            deadline: self.deadline,
            cancel: &self.cancel,
        }
    }
}

/// A [`Page`] view bounded by a step timeout and the session deadline.
#[derive(Clone, Copy)]
pub struct ScopedPage<'a> {
    page: &'a dyn Page,
    timeout: Duration,
    deadline: Instant,
    cancel: &'a CancellationToken,
}

impl<'a> ScopedPage<'a> {
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Same session, different step timeout.
    pub fn with_timeout(&self, timeout: Duration) -> ScopedPage<'a> {
        ScopedPage { timeout, ..*self }
    }

    /// Fail fast if the session was cancelled or its deadline passed.
    pub fn check(&self) -> Result<(), PageError> {
        if self.cancel.is_cancelled() {
            return Err(PageError::Cancelled);
        }
        if Instant::now() >= self.deadline {
            return Err(PageError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Effective budget and whether the deadline (not the step) caps it.
    fn budget(&self) -> (Duration, bool) {
        let left = self.deadline.saturating_duration_since(Instant::now());
        if left < self.timeout {
            (left, true)
        } else {
            (self.timeout, false)
        }
    }

    async fn bounded<T, F>(&self, what: &str, interruptible: bool, op: F) -> Result<T, PageError>
    where
        F: Future<Output = Result<T, PageError>>,
    {
        self.check()?;
        let (budget, capped) = self.budget();
        let timed = tokio::time::timeout(budget, op);

        let outcome = if interruptible {
            tokio::select! {
                _ = self.cancel.cancelled() => return Err(PageError::Cancelled),
                res = timed => res,
            }
        } else {
            timed.await
        };

        match outcome {
            Ok(result) => result,
            Err(_) if capped => Err(PageError::DeadlineExceeded),
            Err(_) => Err(PageError::timeout(what, budget)),
        }
    }

    /// Wait a fixed interval for the UI to settle.
    ///
    /// Returns early with [`PageError::Cancelled`] if the session is
    /// cancelled, and with [`PageError::DeadlineExceeded`] if the interval
    /// would run past the deadline.
    pub async fn settle(&self, interval: Duration) -> Result<(), PageError> {
        self.check()?;
        let left = self.deadline.saturating_duration_since(Instant::now());
        let wait = interval.min(left);

        tokio::select! {
            _ = self.cancel.cancelled() => return Err(PageError::Cancelled),
            _ = tokio::time::sleep(wait) => {}
        }

        if interval > left {
            return Err(PageError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Run `lookup` every `interval` until it yields a value or the scope
    /// times out. Lookup errors end the poll.
    pub async fn poll<T, F, Fut>(
        &self,
        what: &str,
        interval: Duration,
        mut lookup: F,
    ) -> Result<T, PageError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>, PageError>>,
    {
        let attempts = async {
            loop {
                if let Some(found) = lookup().await? {
                    return Ok(found);
                }
                trace!("{} not ready, retrying in {:?}", what, interval);
                tokio::time::sleep(interval).await;
            }
        };
        self.bounded(what, true, attempts).await
    }

    /// Poll for an element matching `selector`, visible or not.
    pub async fn locate(
        &self,
        selector: &str,
        interval: Duration,
    ) -> Result<ElementHandle, PageError> {
        let what = format!("locate {}", selector);
        self.poll(&what, interval, || self.page.query_one(selector))
            .await
            .map_err(|e| match e {
                PageError::Timeout { .. } => PageError::ElementNotFound(selector.to_string()),
                other => other,
            })
    }
}

#[async_trait]
impl Page for ScopedPage<'_> {
    async fn navigate(&self, url: &str) -> Result<(), PageError> {
        self.bounded(&format!("navigate to {}", url), false, self.page.navigate(url))
            .await
    }

    async fn wait_visible(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<ElementHandle, PageError> {
        let scope = self.with_timeout(timeout.min(self.timeout));
        let wait = self.page.wait_visible(selector, scope.timeout);
        scope
            .bounded(&format!("wait for {} to be visible", selector), true, wait)
            .await
    }

    async fn query_one(&self, selector: &str) -> Result<Option<ElementHandle>, PageError> {
        self.bounded(&format!("query {}", selector), true, self.page.query_one(selector))
            .await
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>, PageError> {
        self.bounded(&format!("query all {}", selector), true, self.page.query_all(selector))
            .await
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), PageError> {
        self.bounded("click", false, self.page.click(element)).await
    }

    async fn type_text(&self, element: &ElementHandle, text: &str) -> Result<(), PageError> {
        self.bounded("type text", false, self.page.type_text(element, text))
            .await
    }

    async fn set_files(
        &self,
        element: &ElementHandle,
        paths: &[PathBuf],
    ) -> Result<(), PageError> {
        self.bounded("set files", false, self.page.set_files(element, paths))
            .await
    }

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, PageError> {
        self.bounded("read attribute", true, self.page.attribute(element, name))
            .await
    }

    async fn text(&self, element: &ElementHandle) -> Result<String, PageError> {
        self.bounded("read text", true, self.page.text(element)).await
    }

    async fn parent(&self, element: &ElementHandle) -> Result<Option<ElementHandle>, PageError> {
        self.bounded("get parent", true, self.page.parent(element)).await
    }

    async fn send_key(&self, element: &ElementHandle, key: Key) -> Result<(), PageError> {
        self.bounded(&format!("send {}", key), false, self.page.send_key(element, key))
            .await
    }

    async fn release(&self, elements: &[ElementHandle]) {
        self.page.release(elements).await
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
