use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::config::PublishConfig;
use super::error::PublishError;
use super::request::{PublishReceipt, PublishRequest, TagReport};
use crate::page::{Page, PageError};
use crate::resolver::{ElementResolver, ResolverConfig, Strategy};
use crate::session::{ScopedPage, Session};
use crate::tag_driver::{TagInputConfig, TagInputDriver};
use crate::tokenizer::{tokenize, SegmentKind};

/// Publishes posts through one creator page.
pub struct Publisher {
    page: Arc<dyn Page>,
    config: PublishConfig,
    resolver: ElementResolver,
    tags: TagInputDriver,
    cancel: CancellationToken,
    prepared: OnceCell<()>,
}

impl Publisher {
    /// Does not touch the page; setup runs with the first attempt.
    pub fn new(page: Arc<dyn Page>, config: PublishConfig) -> Self {
        Self {
            page,
            config,
            resolver: ElementResolver::default(),
            tags: TagInputDriver::default(),
            cancel: CancellationToken::new(),
            prepared: OnceCell::new(),
        }
    }

    pub fn with_resolver(mut self, config: ResolverConfig) -> Self {
        self.resolver = ElementResolver::new(config);
        self
    }

    pub fn with_tag_input(mut self, config: TagInputConfig) -> Self {
        self.tags = TagInputDriver::new(config);
        self
    }

    /// Cancelling `token` stops the running attempt at its next wait.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn config(&self) -> &PublishConfig {
        &self.config
    }

    fn session(&self) -> Session {
        Session::new(self.page.clone(), self.config.deadline())
            .with_cancellation(self.cancel.clone())
    }

    /// Open the publish page and select the image/text tab.
    ///
    /// Runs at most once per publisher; later calls return immediately. A
    /// failed setup is retried by the next call.
    pub async fn prepare(&self) -> Result<(), PublishError> {
        let session = self.session();
        self.prepare_in(&session).await
    }

    async fn prepare_in(&self, session: &Session) -> Result<(), PublishError> {
        self.prepared
            .get_or_try_init(|| self.open_publish_page(session))
            .await
            .map(|_| ())
            .map_err(PublishError::SessionSetupFailed)
    }

    /// Run one publish attempt.
    pub async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt, PublishError> {
        request.validate()?;
        let images = request.absolute_images()?;

        let started = Instant::now();
        let session = self.session();
        info!(
            title = %request.title,
            images = images.len(),
            "Publishing post"
        );

        self.prepare_in(&session).await?;

        self.upload(&session, &images)
            .await
            .map_err(PublishError::UploadFailed)?;

        self.enter_title(&session, &request.title)
            .await
            .map_err(PublishError::TitleInputFailed)?;

        let (strategy, segments, tags) = self.compose_body(&session, &request.body).await?;

        self.submit(&session)
            .await
            .map_err(PublishError::SubmitFailed)?;

        let receipt = PublishReceipt {
            strategy,
            images: images.len(),
            segments,
            tags,
            elapsed_ms: started.elapsed().as_millis(),
        };
        info!(
            strategy = %receipt.strategy,
            segments = receipt.segments,
            tags = receipt.tags.len(),
            elapsed_ms = receipt.elapsed_ms as u64,
            "Post submitted"
        );
        Ok(receipt)
    }

    async fn open_publish_page(&self, session: &Session) -> Result<(), PageError> {
        let page = session.with_timeout(self.config.timeouts.setup());
        let selectors = &self.config.selectors;

        info!("Opening {}", self.config.url);
        page.navigate(&self.config.url).await?;
        page.wait_visible(&selectors.upload_region, page.timeout())
            .await?;
        page.settle(self.config.settle.page_load()).await?;

        if !self.select_image_tab(&page).await? {
            warn!(
                label = %self.config.image_tab_label,
                "Image/text tab not found, staying on the current tab"
            );
        }
        page.settle(self.config.settle.tab_switch()).await?;
        debug!("Publish page ready");
        Ok(())
    }

    /// Click the first creator tab whose text matches the configured label.
    ///
    /// Only aborts are errors; a tab that cannot be read or clicked is
    /// skipped.
    async fn select_image_tab(&self, page: &ScopedPage<'_>) -> Result<bool, PageError> {
        let tabs = page.query_all(&self.config.selectors.creator_tab).await?;
        let label = self.config.image_tab_label.as_str();

        for tab in tabs {
            let text = match page.text(&tab).await {
                Ok(text) => text,
                Err(e) if e.is_abort() => return Err(e),
                Err(e) => {
                    debug!(error = %e, "Skipping unreadable creator tab");
                    continue;
                }
            };
            if text.trim() != label {
                continue;
            }
            match page.click(&tab).await {
                Ok(()) => {
                    debug!("Selected creator tab {}", label);
                    return Ok(true);
                }
                Err(e) if e.is_abort() => return Err(e),
                Err(e) => warn!(error = %e, "Creator tab click failed"),
            }
        }
        Ok(false)
    }

    async fn upload(&self, session: &Session, images: &[PathBuf]) -> Result<(), PageError> {
        let page = session.with_timeout(self.config.timeouts.upload());
        let input = page
            .locate(
                &self.config.selectors.upload_input,
                self.config.timeouts.poll_interval(),
            )
            .await?;

        page.set_files(&input, images).await?;
        info!(count = images.len(), "Images uploaded");
        page.settle(self.config.settle.upload()).await
    }

    async fn enter_title(&self, session: &Session, title: &str) -> Result<(), PageError> {
        let page = session.with_timeout(self.config.timeouts.title());
        let input = page
            .locate(
                &self.config.selectors.title_input,
                self.config.timeouts.poll_interval(),
            )
            .await?;

        page.type_text(&input, title).await?;
        page.settle(self.config.settle.title()).await
    }

    async fn compose_body(
        &self,
        session: &Session,
        body: &str,
    ) -> Result<(Strategy, usize, Vec<TagReport>), PublishError> {
        let page = session.with_timeout(self.config.timeouts.content());
        let target = self
            .resolver
            .resolve(&page)
            .await
            .map_err(PublishError::ContentTargetNotFound)?;

        let content = tokenize(body);
        debug!(
            segments = content.len(),
            hashtags = content.hashtags().count(),
            "Body tokenized"
        );

        let mut tags = Vec::new();
        for (index, segment) in content.iter().enumerate() {
            let entered = match segment.kind {
                SegmentKind::PlainText => page.type_text(target.element(), &segment.text).await,
                SegmentKind::Hashtag => {
                    self.tags
                        .drive(&page, &target, segment)
                        .await
                        .map(|result| {
                            tags.push(TagReport {
                                tag: segment.text.clone(),
                                result,
                            })
                        })
                }
            };
            entered.map_err(|source| PublishError::ContentInputFailed { index, source })?;

            page.settle(self.config.settle.segment())
                .await
                .map_err(|source| PublishError::ContentInputFailed { index, source })?;
        }

        page.settle(self.config.settle.body())
            .await
            .map_err(|source| PublishError::ContentInputFailed {
                index: content.len(),
                source,
            })?;
        Ok((target.strategy(), content.len(), tags))
    }

    async fn submit(&self, session: &Session) -> Result<(), PageError> {
        let page = session.with_timeout(self.config.timeouts.submit());
        let button = page
            .locate(
                &self.config.selectors.submit_button,
                self.config.timeouts.poll_interval(),
            )
            .await?;

        page.click(&button).await?;
        page.settle(self.config.settle.submit()).await
    }
}

#[cfg(test)]
#[path = "publisher_tests.rs"]
mod tests;
