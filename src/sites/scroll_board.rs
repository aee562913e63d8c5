// Config-driven lazy-loading job boards
use crate::browser::BrowserPage;
use crate::config::ScrollBoardQuery;
use crate::connector::SiteScraper;
use crate::model::{FetchError, RawJob};
use crate::session::{LinkCardExtractor, ScrapeSession, Scroll, Surface};
use async_trait::async_trait;
use reqwest::Url;
use tracing::info;

/// A board that appends cards as the page scrolls. Everything site-specific
/// comes from its [`ScrollBoardQuery`].
pub struct ScrollBoardScraper {
    query: ScrollBoardQuery,
    start: Url,
}

impl ScrollBoardScraper {
    pub fn new(query: ScrollBoardQuery) -> Result<Self, FetchError> {
        let start = Url::parse(&query.start_url)
            .map_err(|e| FetchError::Config(format!("{}: {}", query.start_url, e)))?;
        if query.card_selector.trim().is_empty() {
            return Err(FetchError::Config(format!(
                "{}: card_selector is empty",
                query.name
            )));
        }
        Ok(Self { query, start })
    }
}

#[async_trait]
impl SiteScraper for ScrollBoardScraper {
    fn name(&self) -> &str {
        &self.query.name
    }

    async fn scrape(&self, page: &dyn BrowserPage) -> Result<Vec<RawJob>, FetchError> {
        let extractor = LinkCardExtractor::new(self.query.name.clone(), self.start.clone());
        let strategy = Scroll {
            consent_selector: self.query.consent_selector.clone(),
            timeout: self.query.timeout(),
            settle: self.query.settle(),
            step: self.query.scroll_step,
        };
        let surface = Surface {
            page,
            cards: &self.query.card_selector,
            extractor: &extractor,
        };

        let report = ScrapeSession::new(&self.query.name, surface, &strategy, self.query.max_results)
            .run(self.start.as_str())
            .await?;
        info!(
            "[{}] DONE: collected {} jobs in {} scroll rounds",
            self.query.name,
            report.records.len(),
            report.rounds
        );
        Ok(report.records)
    }
}
