use core::time::Duration;
use std::path::PathBuf;

use crate::record::{Category, CrawlTarget};

pub const MOVIES: [CrawlTarget; 2] = [
    CrawlTarget {
        title: "KPop Demon Hunters",
        categories: &[Category::TopCritics, Category::User],
    },
    CrawlTarget {
        title: "The King of Kings",
        categories: &[Category::TopCritics, Category::User],
    },
];

/// Everything tunable about a crawl run.
#[derive(Clone, Debug)]
pub struct CrawlConfig {
    /// Site root; review pages live under `<base_url>/m/<slug>/reviews`.
    pub base_url: &'static str,
    /// Directory receiving one `<title>_all_reviews.csv` per title.
    pub output_dir: PathBuf,
    /// Pause before starting each title.
    pub title_delay: Duration,
    /// Blind wait after navigation so client-side rendering can settle.
    pub page_settle: Duration,
    pub pagination: Pagination,
    pub browser: BrowserConfig,
}

/// Load-more click loop.
#[derive(Clone, Debug)]
pub struct Pagination {
    /// CSS selector of the load-more control.
    pub selector: &'static str,
    /// Hard ceiling on activations per page.
    pub max_clicks: u32,
    /// How long to wait for the control to become actionable.
    pub wait: Duration,
    /// Pause after each activation for new reviews to render.
    pub settle: Duration,
    /// Polling interval while waiting for the control.
    pub poll: Duration,
}

/// Default timeout of the session tab, bounding each navigation.
pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Clone, Debug)]
pub struct BrowserConfig {
    pub headless: bool,
    pub window: (u32, u32),
    /// Drop the browser connection after this long without any event.
    pub idle_timeout: Duration,
}

impl CrawlConfig {
    /// Twice the sum of every wait the crawl can sit in without browser
    /// traffic, so none of them trips the idle timeout.
    pub fn idle_allowance(&self) -> Duration {
        (NAVIGATION_TIMEOUT
            + self.title_delay
            + self.page_settle
            + self.pagination.wait
            + self.pagination.settle)
            * 2
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        let mut config = Self {
            base_url: "https://www.rottentomatoes.com",
            output_dir: PathBuf::from("movie_data"),
            title_delay: Duration::from_secs(5),
            page_settle: Duration::from_secs(3),
            pagination: Pagination::default(),
            browser: BrowserConfig {
                headless: false,
                window: (1920, 1080),
                idle_timeout: Duration::ZERO,
            },
        };
        config.browser.idle_timeout = config.idle_allowance();
        config
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            selector: r#"rt-button[data-qa="load-more-btn"]"#,
            max_clicks: 15,
            wait: Duration::from_secs(10),
            settle: Duration::from_secs(2),
            poll: Duration::from_millis(500),
        }
    }
}
