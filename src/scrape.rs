use core::time::Duration;
use std::sync::Arc;

use headless_chrome::{Browser, Tab};
use tokio::time::sleep;

use crate::{
    config::BrowserConfig,
    paginate::{LoadMore, Lookup},
};

pub mod puppeteer;

/// The one browser a run drives.
///
/// Dropping the session closes its tab and then the browser process, on every
/// exit path.
pub struct Session {
    tab: Arc<Tab>,
    _browser: Browser,
}

impl Session {
    pub fn launch(config: &BrowserConfig) -> anyhow::Result<Self> {
        let browser = puppeteer::puppeteer(config)?;
        let tab = puppeteer::first_tab(&browser)?;

        match browser.get_version() {
            Ok(version) => tracing::info!(target: "browser", "launched \x1b[1;36m{}\x1b[0m", version.product),
            Err(e) => tracing::warn!(target: "browser", "launched, version unknown: {e}"),
        }

        Ok(Self {
            tab,
            _browser: browser,
        })
    }

    /// Navigates and then waits `settle` blindly for client-side rendering.
    pub async fn navigate(&self, url: &str, settle: Duration) -> anyhow::Result<()> {
        puppeteer::navigate_to(&self.tab, url.to_owned()).await?;
        sleep(settle).await;
        Ok(())
    }

    /// Rendered markup of the current page.
    pub async fn snapshot(&self) -> anyhow::Result<String> {
        puppeteer::content(&self.tab).await
    }
}

impl LoadMore for Session {
    async fn press(&self, selector: &str, wait: Duration, poll: Duration) -> anyhow::Result<Lookup> {
        puppeteer::press(&self.tab, selector, wait, poll).await
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(e) = self.tab.close(true) {
            tracing::debug!(target: "browser", "closing tab: {e}");
        }
        tracing::info!(target: "browser", "session closed");
    }
}
