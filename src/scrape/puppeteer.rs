use std::{ffi::OsStr, sync::Arc, time::Duration};

use headless_chrome::{Browser, LaunchOptions, Tab, browser::tab::NoElementFound};
use serde_json::Value;
use tokio::{
    task::spawn_blocking,
    time::{Instant, sleep},
};

use crate::{
    config::{BrowserConfig, NAVIGATION_TIMEOUT},
    paginate::Lookup,
};

/// Classifies the control as seen by a user: `hidden`, `disabled`, `covered`
/// (another element receives clicks at its centre) or `ready`.
const ACTIONABLE: &str = r"function() {
    const style = window.getComputedStyle(this);
    let rect = this.getBoundingClientRect();
    if (rect.width === 0 || rect.height === 0 || style.visibility === 'hidden' || style.display === 'none') {
        return 'hidden';
    }
    if (this.disabled || this.hasAttribute('disabled') || this.getAttribute('aria-disabled') === 'true') {
        return 'disabled';
    }
    this.scrollIntoView({ block: 'center', inline: 'center' });
    rect = this.getBoundingClientRect();
    const hit = document.elementFromPoint(rect.left + rect.width / 2, rect.top + rect.height / 2);
    if (hit && hit !== this && !this.contains(hit)) {
        return 'covered';
    }
    return 'ready';
}";

pub fn puppeteer(config: &BrowserConfig) -> anyhow::Result<Browser> {
    Browser::new(LaunchOptions {
        args: vec![OsStr::new("--disable-blink-features=AutomationControlled")],
        headless: config.headless,
        window_size: Some(config.window),
        idle_browser_timeout: config.idle_timeout,
        ..LaunchOptions::default()
    })
}

/// Opens a fresh tab and closes every other one.
pub fn first_tab(browser: &Browser) -> anyhow::Result<Arc<Tab>> {
    let tab = browser.new_tab()?;
    tab.set_default_timeout(NAVIGATION_TIMEOUT);

    let others = browser
        .get_tabs()
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .iter()
        .filter(|remain| !Arc::ptr_eq(&tab, remain))
        .cloned()
        .collect::<Vec<_>>();

    for remain in others {
        remain.close(true)?;
    }

    Ok(tab)
}

pub async fn navigate_to(tab: &Arc<Tab>, url: String) -> anyhow::Result<()> {
    let tab = Arc::clone(tab);

    spawn_blocking(move || tab.navigate_to(&url)?.wait_until_navigated().map(|_| ())).await?
}

pub async fn content(tab: &Arc<Tab>) -> anyhow::Result<String> {
    let tab = Arc::clone(tab);

    spawn_blocking(move || tab.get_content()).await?
}

#[derive(Debug)]
enum Probe {
    Absent,
    Inert,
    Covered,
    Clicked,
    Missed,
}

fn probe(tab: &Tab, selector: &str) -> anyhow::Result<Probe> {
    let element = match tab.find_element(selector) {
        Ok(element) => element,
        Err(err) if err.is::<NoElementFound>() => return Ok(Probe::Absent),
        Err(err) => return Err(err),
    };

    let state = element.call_js_fn(ACTIONABLE, Vec::new(), false)?;
    match state.value.as_ref().and_then(Value::as_str) {
        Some("ready") => {}
        Some("covered") => return Ok(Probe::Covered),
        _ => return Ok(Probe::Inert),
    }

    Ok(match element.click() {
        Ok(_) => Probe::Clicked,
        Err(err) => {
            tracing::debug!(target: "browser", "click on {selector:?} failed: {err}");
            Probe::Missed
        }
    })
}

/// Runs `attempt` every `poll` until it settles the lookup or `wait` has
/// passed. `Absent` and `Inert` keep polling; anything else ends at once.
async fn poll_until<F, Fut>(wait: Duration, poll: Duration, mut attempt: F) -> anyhow::Result<Lookup>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<Probe>>,
{
    let deadline = Instant::now() + wait;

    loop {
        match attempt().await? {
            Probe::Clicked => break Ok(Lookup::Found),
            Probe::Covered | Probe::Missed => break Ok(Lookup::Blocked),
            Probe::Absent | Probe::Inert => {}
        }

        if Instant::now() >= deadline {
            break Ok(Lookup::NotFound);
        }
        sleep(poll).await;
    }
}

/// Polls for `selector` until it is actionable, then clicks it.
pub async fn press(
    tab: &Arc<Tab>,
    selector: &str,
    wait: Duration,
    poll: Duration,
) -> anyhow::Result<Lookup> {
    poll_until(wait, poll, || {
        let arc_tab = Arc::clone(tab);
        let owned = selector.to_owned();
        async move { spawn_blocking(move || probe(&arc_tab, &owned)).await? }
    })
    .await
}

#[cfg(test)]
mod tests {
    use core::cell::{Cell, RefCell};

    use super::*;

    const WAIT: Duration = Duration::from_secs(10);
    const POLL: Duration = Duration::from_millis(500);

    struct Script {
        steps: RefCell<Vec<Probe>>,
        attempts: Cell<u32>,
    }

    impl Script {
        fn new(mut steps: Vec<Probe>) -> Self {
            steps.reverse();
            Self {
                steps: RefCell::new(steps),
                attempts: Cell::new(0),
            }
        }

        /// Next scripted probe; `Absent` once the script runs out.
        fn next(&self) -> anyhow::Result<Probe> {
            self.attempts.set(self.attempts.get() + 1);
            Ok(self.steps.borrow_mut().pop().unwrap_or(Probe::Absent))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn absent_control_times_out_as_not_found() {
        let script = &Script::new(Vec::new());
        let start = Instant::now();

        let lookup = poll_until(WAIT, POLL, || async move { script.next() }).await.unwrap();

        assert_eq!(lookup, Lookup::NotFound);
        assert_eq!(start.elapsed(), WAIT);
        assert_eq!(script.attempts.get(), 21);
    }

    #[tokio::test(start_paused = true)]
    async fn inert_control_is_clicked_once_ready() {
        let script = &Script::new(vec![Probe::Inert, Probe::Absent, Probe::Clicked]);
        let start = Instant::now();

        let lookup = poll_until(WAIT, POLL, || async move { script.next() }).await.unwrap();

        assert_eq!(lookup, Lookup::Found);
        assert_eq!(script.attempts.get(), 3);
        assert_eq!(start.elapsed(), POLL * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn covered_or_missed_click_is_blocked_without_waiting() {
        for probe in [Probe::Covered, Probe::Missed] {
            let script = &Script::new(vec![probe]);
            let start = Instant::now();

            let lookup = poll_until(WAIT, POLL, || async move { script.next() }).await.unwrap();

            assert_eq!(lookup, Lookup::Blocked);
            assert_eq!(script.attempts.get(), 1);
            assert_eq!(start.elapsed(), Duration::ZERO);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn browser_error_stops_polling() {
        let attempts = Cell::new(0);

        let err = poll_until(WAIT, POLL, || {
            attempts.set(attempts.get() + 1);
            async { Err::<Probe, _>(anyhow::anyhow!("connection closed")) }
        })
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "connection closed");
        assert_eq!(attempts.get(), 1);
    }
}
