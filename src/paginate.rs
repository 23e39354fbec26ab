use core::time::Duration;

use crate::config::Pagination;

/// Result of one attempt to activate the load-more control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// The control was actionable and has been activated.
    Found,
    /// The control did not show up, or never became actionable, in time.
    NotFound,
    /// The control was there but the click was intercepted.
    Blocked,
}

/// Something with a load-more control on it.
pub trait LoadMore {
    /// Waits up to `wait` for the control matching `selector` to become
    /// actionable and activates it.
    async fn press(&self, selector: &str, wait: Duration, poll: Duration) -> anyhow::Result<Lookup>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stop {
    /// The control ran out; carries the lookup that ended the loop.
    Exhausted(Lookup),
    /// The click ceiling was reached.
    Ceiling,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Exhaustion {
    pub clicks: u32,
    pub stop: Stop,
}

/// Clicks "load more" until it is gone, blocked, or `cfg.max_clicks` is hit.
///
/// A single missed click ends pagination; there is no retry.
pub async fn exhaust<P: LoadMore + ?Sized>(page: &P, cfg: &Pagination) -> anyhow::Result<Exhaustion> {
    let mut clicks = 0;

    while clicks < cfg.max_clicks {
        match page.press(cfg.selector, cfg.wait, cfg.poll).await? {
            Lookup::Found => {
                tokio::time::sleep(cfg.settle).await;
                clicks += 1;
                tracing::info!(target: "paginate", " > clicked load more ({clicks}/{})", cfg.max_clicks);
            }
            lookup => {
                tracing::info!(target: "paginate", " > all reviews loaded or load more unavailable ({lookup:?})");
                return Ok(Exhaustion {
                    clicks,
                    stop: Stop::Exhausted(lookup),
                });
            }
        }
    }

    Ok(Exhaustion {
        clicks,
        stop: Stop::Ceiling,
    })
}
