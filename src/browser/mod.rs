//! Browser automation seam.
//!
//! The scrape engine only talks to these traits. A real backend lives behind
//! the `chromium` feature; tests drive the engine with a scripted page.

#[cfg(feature = "chromium")]
pub mod chromium;
#[cfg(test)]
pub mod testing;

use crate::config::BrowserSettings;
use crate::model::PageError;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Interval between predicate checks in [`wait_for_function`].
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[async_trait]
pub trait ElementHandle: Send + Sync {
    async fn get_attribute(&self, name: &str) -> Result<Option<String>, PageError>;
    async fn inner_text(&self) -> Result<String, PageError>;
    async fn click(&self) -> Result<(), PageError>;
    async fn is_enabled(&self) -> Result<bool, PageError>;
    async fn is_visible(&self) -> Result<bool, PageError>;
}

/// A live, navigable page owned by exactly one scrape at a time.
#[async_trait]
pub trait BrowserPage: Send + Sync {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), PageError>;
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<(), PageError>;
    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>, PageError>;
    async fn scroll(&self, dx: f64, dy: f64) -> Result<(), PageError>;
    async fn wait(&self, duration: Duration);
}

/// A launched browser with one open page. Must be closed by its owner.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    fn page(&self) -> &dyn BrowserPage;
    async fn close(self: Box<Self>) -> Result<(), PageError>;
}

#[async_trait]
pub trait PageLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, PageError>;
}

/// Stand-in used when the crate is built without a browser backend.
pub struct UnavailableLauncher;

#[async_trait]
impl PageLauncher for UnavailableLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, PageError> {
        Err(PageError::Unavailable(
            "built without the `chromium` feature".into(),
        ))
    }
}

/// Picks the launcher for this build.
#[cfg(feature = "chromium")]
pub fn default_launcher(settings: &BrowserSettings) -> Arc<dyn PageLauncher> {
    Arc::new(chromium::ChromiumLauncher::new(settings.clone()))
}

#[cfg(not(feature = "chromium"))]
pub fn default_launcher(settings: &BrowserSettings) -> Arc<dyn PageLauncher> {
    let _ = settings;
    Arc::new(UnavailableLauncher)
}

/// Polls `predicate(arg)` until it returns `true` or `limit` elapses.
///
/// Returns `Ok(false)` on expiry. Recoverable predicate errors count as "not
/// yet"; fatal ones are returned immediately.
pub async fn wait_for_function<'a, A, F, Fut>(
    predicate: F,
    arg: &'a A,
    limit: Duration,
) -> Result<bool, PageError>
where
    A: ?Sized + Sync,
    F: Fn(&'a A) -> Fut,
    Fut: Future<Output = Result<bool, PageError>>,
{
    let poll = async {
        loop {
            match predicate(arg).await {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => tracing::debug!("predicate not ready: {}", e),
            }
            sleep(POLL_INTERVAL.min(limit)).await;
        }
    };

    match timeout(limit, poll).await {
        Ok(Ok(())) => Ok(true),
        Ok(Err(e)) => Err(e),
        Err(_) => Ok(false),
    }
}
