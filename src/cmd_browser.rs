//! `rednote browser` handler.

use tokio_util::sync::CancellationToken;
use tracing::info;

use rednote_browser::BrowserManager;
use rednote_core::Page;
use rednote_config::Config;

/// Open the publish page in a headed browser on the configured profile and
/// keep it until Ctrl-C, so the login cookie lands in that profile.
pub(crate) async fn handle_browser(
    config: Config,
    cancel: CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut browser_config = config.browser.clone();
    browser_config.headless = false;

    let browser = BrowserManager::new(browser_config);
    let page = browser.open_page().await?;
    page.navigate(&config.publish.url).await?;

    info!(
        "Publish page open with profile {}; press Ctrl-C to quit",
        browser.config().get_profile_dir().display()
    );
    cancel.cancelled().await;

    browser.shutdown_chrome().await?;
    Ok(())
}
