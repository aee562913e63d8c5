use crate::config::GreenhouseQuery;
use crate::connector::Connector;
use crate::model::{FetchError, RawJob};
use crate::parser::greenhouse::SOURCE;
use crate::parser::{GreenhouseParser, Parser};
use reqwest::Client;
use tracing::info;

const API_BASE: &str = "https://boards-api.greenhouse.io/v1/boards";

/// Greenhouse Job Board API, one public GET per board.
pub struct GreenhouseConnector {
    client: Client,
    api_base: String,
    query: GreenhouseQuery,
}

impl GreenhouseConnector {
    pub fn new(query: GreenhouseQuery) -> Result<Self, FetchError> {
        Self::with_api_base(query, API_BASE)
    }

    /// Same as [`GreenhouseConnector::new`] against another boards endpoint.
    pub fn with_api_base(
        query: GreenhouseQuery,
        api_base: impl Into<String>,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("jobscout/", env!("CARGO_PKG_VERSION")))
            .timeout(query.timeout)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            query,
        })
    }

    fn build_url(&self) -> String {
        format!("{}/{}/jobs", self.api_base, self.query.board_token)
    }

    fn params(&self) -> Vec<(&'static str, &'static str)> {
        if self.query.content {
            vec![("content", "true")]
        } else {
            Vec::new()
        }
    }
}

#[async_trait::async_trait]
impl Connector for GreenhouseConnector {
    fn name(&self) -> &str {
        SOURCE
    }

    async fn fetch(&self) -> Result<Vec<RawJob>, FetchError> {
        let url = self.build_url();

        let response = self.client.get(&url).query(&self.params()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status, url });
        }

        let body = response.text().await?;
        let jobs = GreenhouseParser::new(self.query.content).parse(&body)?;
        info!(
            "[{}] board {}: {} jobs",
            SOURCE,
            self.query.board_token,
            jobs.len()
        );
        Ok(jobs)
    }
}
