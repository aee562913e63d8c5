use crate::browser::{BrowserPage, PageLauncher};
use crate::connector::Connector;
use crate::model::{FetchError, RawJob};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Site-specific half of a browser-driven source.
#[async_trait]
pub trait SiteScraper: Send + Sync {
    fn name(&self) -> &str;

    /// Collects every record for this run from a freshly opened page. The page
    /// must not be retained past the call.
    async fn scrape(&self, page: &dyn BrowserPage) -> Result<Vec<RawJob>, FetchError>;
}

/// Runs a [`SiteScraper`] inside its own browser session and closes that
/// session on every exit path.
pub struct BrowserConnector<S> {
    site: S,
    launcher: Arc<dyn PageLauncher>,
}

impl<S: SiteScraper> BrowserConnector<S> {
    pub fn new(site: S, launcher: Arc<dyn PageLauncher>) -> Self {
        Self { site, launcher }
    }
}

#[async_trait]
impl<S: SiteScraper> Connector for BrowserConnector<S> {
    fn name(&self) -> &str {
        self.site.name()
    }

    async fn fetch(&self) -> Result<Vec<RawJob>, FetchError> {
        let session = self.launcher.launch().await?;
        debug!("[{}] browser session opened", self.name());

        let outcome = self.site.scrape(session.page()).await;

        if let Err(e) = session.close().await {
            warn!("[{}] failed to close browser session: {}", self.name(), e);
        }
        outcome
    }
}
