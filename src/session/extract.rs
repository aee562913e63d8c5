use crate::browser::ElementHandle;
use crate::model::{PageError, RawJob, RawPayload};
use crate::parser::CardText;
use crate::utils::{absolute_url, last_path_segment};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Url;

/// Turns a result element into a record. `identify` is called first and must
/// be cheap; `extract` only runs for cards not seen before.
#[async_trait]
pub trait CardExtractor: Send + Sync {
    async fn identify(&self, element: &dyn ElementHandle) -> Result<Option<String>, PageError>;
    async fn extract(&self, url: &str, element: &dyn ElementHandle) -> Result<RawJob, PageError>;
}

/// Cards that are links: identity is the resolved `href`, fields come from
/// the rendered text via [`CardText`].
pub struct LinkCardExtractor {
    source: String,
    base: Url,
}

impl LinkCardExtractor {
    pub fn new(source: impl Into<String>, base: Url) -> Self {
        Self {
            source: source.into(),
            base,
        }
    }
}

#[async_trait]
impl CardExtractor for LinkCardExtractor {
    async fn identify(&self, element: &dyn ElementHandle) -> Result<Option<String>, PageError> {
        let href = element.get_attribute("href").await?;
        Ok(href
            .map(|h| absolute_url(&self.base, &h))
            .filter(|u| !u.is_empty()))
    }

    async fn extract(&self, url: &str, element: &dyn ElementHandle) -> Result<RawJob, PageError> {
        let raw_text = element.inner_text().await?.trim().to_string();
        let card = CardText::parse(&raw_text);

        Ok(RawJob {
            source: self.source.clone(),
            source_id: last_path_segment(url),
            source_url: url.to_string(),
            title: card.title,
            location: card.location,
            team: card.team,
            office: String::new(),
            posted_hint: String::new(),
            content: String::new(),
            raw: RawPayload::Text(raw_text),
            fetched_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::testing::{card, detached, FakePage, CARDS};
    use crate::browser::BrowserPage;

    fn extractor() -> LinkCardExtractor {
        LinkCardExtractor::new("google-careers", Url::parse("https://www.google.com").unwrap())
    }

    #[tokio::test]
    async fn resolves_relative_href_and_reads_card_text() {
        let page = FakePage::scrolling(vec![vec![card(
            "/about/careers/applications/jobs/results/123-swe",
            "  Software Engineer\nMountain View, CA\nCloud \n",
        )]]);
        let elements = page.query_all(CARDS).await.unwrap();
        let ex = extractor();

        let url = ex.identify(elements[0].as_ref()).await.unwrap().unwrap();
        assert_eq!(
            url,
            "https://www.google.com/about/careers/applications/jobs/results/123-swe"
        );

        let job = ex.extract(&url, elements[0].as_ref()).await.unwrap();
        assert_eq!(job.source, "google-careers");
        assert_eq!(job.source_id, "123-swe");
        assert_eq!(job.title, "Software Engineer");
        assert_eq!(job.location, "Mountain View, CA");
        assert_eq!(job.team, "Cloud");
        assert_eq!(
            job.raw,
            RawPayload::Text("Software Engineer\nMountain View, CA\nCloud".into())
        );
    }

    #[tokio::test]
    async fn empty_href_has_no_identity() {
        let page = FakePage::scrolling(vec![vec![card("", "Ghost")]]);
        let elements = page.query_all(CARDS).await.unwrap();
        assert_eq!(extractor().identify(elements[0].as_ref()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn detached_card_reports_recoverable_error() {
        let page = FakePage::scrolling(vec![vec![detached("/jobs/1")]]);
        let elements = page.query_all(CARDS).await.unwrap();
        let err = extractor().identify(elements[0].as_ref()).await.unwrap_err();
        assert!(!err.is_fatal());
    }
}
