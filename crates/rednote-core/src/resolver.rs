//! Editing target resolution.
//!
//! The body editor ships in more than one DOM shape. Each known shape has
//! its own lookup [`Strategy`]; [`ElementResolver::resolve`] runs all of
//! them against the page at once and commits to the first one that finds an
//! element. Strategies only read the page, so the losers are simply
//! dropped.

use std::fmt;
use std::future::poll_fn;
use std::task::Poll;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::page::{ElementHandle, Page, PageError};
use crate::session::ScopedPage;

/// One independent way of locating the editing target.
///
/// Declaration order is the tie-break order of the race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Query the stable class of the primary rich-text editor.
    DirectSelector,
    /// Find the placeholder paragraph and climb to its `textbox` ancestor.
    PlaceholderAscent,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::DirectSelector, Strategy::PlaceholderAscent];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::DirectSelector => "direct_selector",
            Strategy::PlaceholderAscent => "placeholder_ascent",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The element that receives body keystrokes.
///
/// Valid for one publish attempt only; the page may reload between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditingTarget {
    element: ElementHandle,
    strategy: Strategy,
}

impl EditingTarget {
    pub fn new(element: ElementHandle, strategy: Strategy) -> Self {
        Self { element, strategy }
    }

    pub fn element(&self) -> &ElementHandle {
        &self.element
    }

    /// Strategy that located the element.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
}

/// Why a strategy gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyFailure {
    pub strategy: Strategy,
    pub reason: String,
}

impl fmt::Display for StrategyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.strategy, self.reason)
    }
}

fn describe(attempts: &[StrategyFailure]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Editing target not found, tried: {}", describe(.attempts))]
    ElementNotFound { attempts: Vec<StrategyFailure> },

    /// The session was cancelled or hit its deadline mid-race.
    #[error(transparent)]
    Aborted(PageError),
}

impl ResolveError {
    /// Strategies that ran to their own timeout, in declaration order.
    pub fn attempted(&self) -> Vec<Strategy> {
        match self {
            ResolveError::ElementNotFound { attempts } => {
                attempts.iter().map(|a| a.strategy).collect()
            }
            ResolveError::Aborted(_) => Vec::new(),
        }
    }

    pub fn is_abort(&self) -> bool {
        matches!(self, ResolveError::Aborted(_))
    }
}

/// Resolver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Strategies to race, in tie-break order.
    pub strategies: Vec<Strategy>,
    pub editor_selector: String,
    pub paragraph_selector: String,
    pub placeholder_attribute: String,
    /// Matched as a substring of the placeholder attribute.
    pub placeholder_text: String,
    pub role_attribute: String,
    pub sentinel_role: String,
    /// Maximum number of parent hops from the placeholder paragraph.
    pub max_ascent: usize,
    pub strategy_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            strategies: Strategy::ALL.to_vec(),
            editor_selector: "div.ql-editor".to_string(),
            paragraph_selector: "p".to_string(),
            placeholder_attribute: "data-placeholder".to_string(),
            placeholder_text: "输入正文描述".to_string(),
            role_attribute: "role".to_string(),
            sentinel_role: "textbox".to_string(),
            max_ascent: 5,
            strategy_timeout_ms: 10_000,
            poll_interval_ms: 100,
        }
    }
}

impl ResolverConfig {
    pub fn strategy_timeout(&self) -> Duration {
        Duration::from_millis(self.strategy_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Why one lookup of a strategy came back empty.
#[derive(Debug, Clone)]
enum Miss {
    NoEditor,
    NoPlaceholder,
    NoSentinel,
    /// The page errored mid-lookup, typically a node that re-rendered.
    PageFailed(String),
}

type Attempt<'a> = BoxFuture<'a, Result<ElementHandle, Failure>>;

/// How one strategy ended without a target.
enum Failure {
    Missed(StrategyFailure),
    Aborted(PageError),
}

/// Climb at most `max_depth` parents from `element`, returning the first
/// ancestor whose `attribute` equals `expected`.
///
/// The element itself is not considered; an ancestor exactly `max_depth`
/// hops up is.
pub async fn ascend<P>(
    page: &P,
    element: &ElementHandle,
    max_depth: usize,
    attribute: &str,
    expected: &str,
) -> Result<Option<ElementHandle>, PageError>
where
    P: Page + ?Sized,
{
    let mut visited = Vec::new();
    let found = climb(page, element, max_depth, attribute, expected, &mut visited).await;
    page.release(&visited).await;
    found
}

async fn climb<P>(
    page: &P,
    element: &ElementHandle,
    max_depth: usize,
    attribute: &str,
    expected: &str,
    visited: &mut Vec<ElementHandle>,
) -> Result<Option<ElementHandle>, PageError>
where
    P: Page + ?Sized,
{
    let mut current = element.clone();
    for depth in 1..=max_depth {
        let Some(parent) = page.parent(&current).await? else {
            return Ok(None);
        };
        if page.attribute(&parent, attribute).await?.as_deref() == Some(expected) {
            debug!("Found {}={} ancestor {} hops up", attribute, expected, depth);
            return Ok(Some(parent));
        }
        visited.push(parent.clone());
        current = parent;
    }
    Ok(None)
}

/// Locates the body editing target.
pub struct ElementResolver {
    config: ResolverConfig,
}

impl ElementResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Race every configured strategy and return the first element found.
    pub async fn resolve(&self, page: &ScopedPage<'_>) -> Result<EditingTarget, ResolveError> {
        let scope = page.with_timeout(self.config.strategy_timeout());

        let mut pending: Vec<Option<(Strategy, Attempt<'_>)>> =
            self.config
                .strategies
                .iter()
                .map(|&strategy| Some((strategy, self.attempt(scope, strategy).boxed())))
                .collect();
        let mut failures = Vec::new();

        // Slots are polled in declaration order on every wake, so when two
        // strategies complete together the earlier one wins.
        let outcome = poll_fn(|cx| {
            for slot in pending.iter_mut() {
                let Some((strategy, attempt)) = slot else {
                    continue;
                };
                match attempt.as_mut().poll(cx) {
                    Poll::Ready(Ok(element)) => {
                        return Poll::Ready(Ok(EditingTarget::new(element, *strategy)));
                    }
                    Poll::Ready(Err(Failure::Aborted(e))) => {
                        return Poll::Ready(Err(ResolveError::Aborted(e)));
                    }
                    Poll::Ready(Err(Failure::Missed(failure))) => {
                        debug!("Strategy {} failed: {}", failure.strategy, failure.reason);
                        failures.push(failure);
                        *slot = None;
                    }
                    Poll::Pending => {}
                }
            }
            if pending.iter().all(Option::is_none) {
                failures.sort_by_key(|f: &StrategyFailure| f.strategy);
                Poll::Ready(Err(ResolveError::ElementNotFound {
                    attempts: std::mem::take(&mut failures),
                }))
            } else {
                Poll::Pending
            }
        })
        .await;

        match &outcome {
            Ok(target) => info!("Editing target located via {}", target.strategy()),
            Err(e) => warn!("{}", e),
        }
        outcome
    }

    /// Poll one strategy until it finds the target or its timeout expires.
    ///
    /// Page errors count as a miss and the strategy keeps polling; only a
    /// cancelled or expired session ends it early.
    async fn attempt(
        &self,
        page: ScopedPage<'_>,
        strategy: Strategy,
    ) -> Result<ElementHandle, Failure> {
        let timeout = page.timeout();
        let mut last_miss = None;

        let search = async {
            loop {
                match self.lookup(&page, strategy).await {
                    Ok(Ok(element)) => return Ok(element),
                    Ok(Err(miss)) => last_miss = Some(miss),
                    Err(e) if e.is_abort() => return Err(e),
                    Err(e) => {
                        debug!("Strategy {} lookup failed, retrying: {}", strategy, e);
                        last_miss = Some(Miss::PageFailed(e.to_string()));
                    }
                }
                page.settle(self.config.poll_interval()).await?;
            }
        };
        let outcome: Result<Result<ElementHandle, PageError>, _> =
            tokio::time::timeout(timeout, search).await;

        match outcome {
            Ok(Ok(element)) => Ok(element),
            Ok(Err(e)) => Err(Failure::Aborted(e)),
            Err(_) => Err(Failure::Missed(StrategyFailure {
                strategy,
                reason: format!(
                    "timed out after {}ms, {}",
                    timeout.as_millis(),
                    self.explain(last_miss)
                ),
            })),
        }
    }

    fn explain(&self, miss: Option<Miss>) -> String {
        match miss {
            None => "no lookup completed".to_string(),
            Some(Miss::PageFailed(reason)) => format!("last lookup failed: {}", reason),
            Some(Miss::NoEditor) => format!("no element matches {}", self.config.editor_selector),
            Some(Miss::NoPlaceholder) => format!(
                "no {} with {} containing {:?}",
                self.config.paragraph_selector,
                self.config.placeholder_attribute,
                self.config.placeholder_text
            ),
            Some(Miss::NoSentinel) => format!(
                "no {}={} ancestor within {} hops",
                self.config.role_attribute, self.config.sentinel_role, self.config.max_ascent
            ),
        }
    }

    async fn lookup(
        &self,
        page: &ScopedPage<'_>,
        strategy: Strategy,
    ) -> Result<Result<ElementHandle, Miss>, PageError> {
        match strategy {
            Strategy::DirectSelector => Ok(page
                .query_one(&self.config.editor_selector)
                .await?
                .ok_or(Miss::NoEditor)),
            Strategy::PlaceholderAscent => self.placeholder_ascent(page).await,
        }
    }

    async fn placeholder_ascent(
        &self,
        page: &ScopedPage<'_>,
    ) -> Result<Result<ElementHandle, Miss>, PageError> {
        let config = &self.config;
        let paragraphs = page.query_all(&config.paragraph_selector).await?;

        let found = self.ascend_from_placeholder(page, &paragraphs).await;
        page.release(&paragraphs).await;
        found
    }

    async fn ascend_from_placeholder(
        &self,
        page: &ScopedPage<'_>,
        paragraphs: &[ElementHandle],
    ) -> Result<Result<ElementHandle, Miss>, PageError> {
        let config = &self.config;

        let mut placeholder = None;
        for paragraph in paragraphs {
            // A paragraph can re-render between the query and the read.
            let value = match page.attribute(paragraph, &config.placeholder_attribute).await {
                Ok(value) => value,
                Err(e) if e.is_abort() => return Err(e),
                Err(e) => {
                    debug!("Skipping paragraph {}: {}", paragraph, e);
                    continue;
                }
            };
            if value.is_some_and(|v| v.contains(&config.placeholder_text)) {
                placeholder = Some(paragraph);
                break;
            }
        }
        let Some(placeholder) = placeholder else {
            return Ok(Err(Miss::NoPlaceholder));
        };

        let found = ascend(
            page,
            placeholder,
            config.max_ascent,
            &config.role_attribute,
            &config.sentinel_role,
        )
        .await?;
        Ok(found.ok_or(Miss::NoSentinel))
    }
}

impl Default for ElementResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
