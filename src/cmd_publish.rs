//! `rednote publish` handler.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use rednote_browser::BrowserManager;
use rednote_core::{Page, PublishRequest, Publisher};
use rednote_config::Config;

use crate::cli::PublishArgs;

/// Publish one note in a fresh tab, then release the browser.
pub(crate) async fn handle_publish(
    args: PublishArgs,
    mut config: Config,
    cancel: CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(secs) = args.deadline_secs {
        config.publish.deadline_secs = secs;
    }
    crate::ensure_valid(&config)?;

    let body = match (args.content, &args.content_file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => String::new(),
    };
    let request = PublishRequest::new(args.title, body, args.images);
    request.validate()?;

    let browser = BrowserManager::new(config.browser.clone());
    let page = Arc::new(browser.open_page().await?);
    let shared: Arc<dyn Page> = page.clone();

    let publisher = Publisher::new(shared, config.publish.clone())
        .with_resolver(config.resolver.clone())
        .with_tag_input(config.tags.clone())
        .with_cancellation(cancel);

    let outcome = publisher.publish(&request).await;

    if let Err(e) = browser.close_page(&page).await {
        warn!("Failed to close tab: {}", e);
    }
    if args.keep_browser {
        browser.close().await?;
    } else {
        browser.shutdown_chrome().await?;
    }

    let receipt = outcome?;
    for tag in receipt.degraded_tags() {
        warn!("#{} was not confirmed as a topic and stays plain text", tag);
    }
    info!("Published \"{}\" in {}ms", request.title, receipt.elapsed_ms);
    println!("{}", serde_json::to_string_pretty(&receipt)?);
    Ok(())
}
