// Google Careers results, paginated with a next control
use crate::browser::BrowserPage;
use crate::config::GoogleCareersQuery;
use crate::connector::SiteScraper;
use crate::model::{FetchError, RawJob};
use crate::session::{LinkCardExtractor, Paginate, ScrapeSession, Surface};
use async_trait::async_trait;
use reqwest::Url;
use tracing::info;

pub const SOURCE: &str = "google-careers";
const ORIGIN: &str = "https://www.google.com";
const RESULTS_URL: &str = "https://www.google.com/about/careers/applications/jobs/results";

/// Job cards are links into the results path.
const JOB_LINK: &str = "a[href*='/about/careers/applications/jobs/results/']";
/// The next control is an icon link (`navigate_next`) labelled for screen readers.
const NEXT_CONTROL: &str = "[aria-label='Go to next page']";

pub struct GoogleCareersScraper {
    query: GoogleCareersQuery,
}

impl GoogleCareersScraper {
    pub fn new(query: GoogleCareersQuery) -> Self {
        Self { query }
    }

    pub fn results_url(&self) -> Result<Url, FetchError> {
        let mut url = Url::parse(RESULTS_URL).map_err(|e| FetchError::Config(e.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", &self.query.keyword);
            for location in &self.query.locations {
                pairs.append_pair("location", location);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl SiteScraper for GoogleCareersScraper {
    fn name(&self) -> &str {
        SOURCE
    }

    async fn scrape(&self, page: &dyn BrowserPage) -> Result<Vec<RawJob>, FetchError> {
        let url = self.results_url()?;
        let origin = Url::parse(ORIGIN).map_err(|e| FetchError::Config(e.to_string()))?;
        let extractor = LinkCardExtractor::new(SOURCE, origin);
        let strategy = Paginate {
            next_selector: NEXT_CONTROL.to_string(),
            max_pages: self.query.max_pages,
            timeout: self.query.timeout(),
        };
        let surface = Surface {
            page,
            cards: JOB_LINK,
            extractor: &extractor,
        };

        let report = ScrapeSession::new(SOURCE, surface, &strategy, self.query.max_results)
            .run(url.as_str())
            .await?;
        info!(
            "[{}] DONE: collected {} jobs across {} pages",
            SOURCE,
            report.records.len(),
            report.rounds
        );
        Ok(report.records)
    }
}
