// Headless Chromium backend (feature "chromium")
use super::{BrowserPage, BrowserSession, ElementHandle, PageLauncher, POLL_INTERVAL};
use crate::config::BrowserSettings;
use crate::model::PageError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info};

fn runtime(e: CdpError) -> PageError {
    PageError::Runtime(e.to_string())
}

/// CDP answers with an error for nodes that were re-rendered away; those are
/// local to one element. Transport failures are not.
fn element_error(e: CdpError) -> PageError {
    match e {
        CdpError::NotFound | CdpError::Chrome(_) | CdpError::ChromeMessage(_) => {
            PageError::Detached(e.to_string())
        }
        other => runtime(other),
    }
}

pub struct ChromiumLauncher {
    settings: BrowserSettings,
}

impl ChromiumLauncher {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    fn config(&self) -> Result<BrowserConfig, PageError> {
        let mut builder = BrowserConfig::builder();
        if !self.settings.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &self.settings.executable {
            builder = builder.chrome_executable(path);
        }
        builder.build().map_err(PageError::Unavailable)
    }
}

#[async_trait]
impl PageLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, PageError> {
        let (mut browser, mut handler) = Browser::launch(self.config()?)
            .await
            .map_err(|e| PageError::Unavailable(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                if let Err(close) = browser.close().await {
                    debug!("closing browser after failed page open: {}", close);
                }
                handler.abort();
                return Err(runtime(e));
            }
        };
        info!("chromium launched");

        Ok(Box::new(ChromiumSession {
            page: ChromiumPage { page },
            browser: Mutex::new(browser),
            handler,
        }))
    }
}

struct ChromiumSession {
    page: ChromiumPage,
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    fn page(&self) -> &dyn BrowserPage {
        &self.page
    }

    async fn close(self: Box<Self>) -> Result<(), PageError> {
        let ChromiumSession {
            page,
            browser,
            handler,
        } = *self;
        drop(page);

        let mut browser = browser.into_inner();
        let closed = browser.close().await.map(|_| ()).map_err(runtime);
        if let Err(e) = browser.wait().await {
            debug!("waiting for chromium exit: {}", e);
        }
        handler.abort();
        closed
    }
}

struct ChromiumPage {
    page: Page,
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    async fn navigate(&self, url: &str, limit: Duration) -> Result<(), PageError> {
        match timeout(limit, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(runtime(e)),
            Err(_) => Err(PageError::Timeout(format!("navigation to {url}"))),
        }
    }

    async fn wait_for_selector(&self, selector: &str, limit: Duration) -> Result<(), PageError> {
        let poll = async {
            loop {
                match self.page.find_elements(selector).await {
                    Ok(found) if !found.is_empty() => return Ok(()),
                    Ok(_) => {}
                    Err(e) => match element_error(e) {
                        PageError::Detached(_) => {}
                        fatal => return Err(fatal),
                    },
                }
                sleep(POLL_INTERVAL).await;
            }
        };

        match timeout(limit, poll).await {
            Ok(result) => result,
            Err(_) => Err(PageError::Timeout(selector.to_string())),
        }
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>, PageError> {
        let found = match self.page.find_elements(selector).await {
            Ok(found) => found,
            Err(e) => match element_error(e) {
                PageError::Detached(_) => Vec::new(),
                fatal => return Err(fatal),
            },
        };
        Ok(found
            .into_iter()
            .map(|element| Box::new(ChromiumElement { element }) as Box<dyn ElementHandle>)
            .collect())
    }

    async fn scroll(&self, dx: f64, dy: f64) -> Result<(), PageError> {
        self.page
            .evaluate(format!("window.scrollBy({dx}, {dy})"))
            .await
            .map(|_| ())
            .map_err(runtime)
    }

    async fn wait(&self, duration: Duration) {
        sleep(duration).await;
    }
}

struct ChromiumElement {
    element: Element,
}

#[async_trait]
impl ElementHandle for ChromiumElement {
    async fn get_attribute(&self, name: &str) -> Result<Option<String>, PageError> {
        self.element.attribute(name).await.map_err(element_error)
    }

    async fn inner_text(&self) -> Result<String, PageError> {
        self.element
            .inner_text()
            .await
            .map(Option::unwrap_or_default)
            .map_err(element_error)
    }

    async fn click(&self) -> Result<(), PageError> {
        self.element.click().await.map(|_| ()).map_err(element_error)
    }

    async fn is_enabled(&self) -> Result<bool, PageError> {
        if self.get_attribute("disabled").await?.is_some() {
            return Ok(false);
        }
        let aria = self.get_attribute("aria-disabled").await?;
        Ok(aria.as_deref() != Some("true"))
    }

    async fn is_visible(&self) -> Result<bool, PageError> {
        match self.element.bounding_box().await {
            Ok(bounds) => Ok(bounds.width > 0.0 && bounds.height > 0.0),
            Err(e) => match element_error(e) {
                PageError::Detached(_) => Ok(false),
                fatal => Err(fatal),
            },
        }
    }
}
