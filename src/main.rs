mod browser;
mod config;
mod connector;
mod model;
mod parser;
mod registry;
mod session;
mod sites;
mod utils;

use browser::default_launcher;
use config::{load_config, AppConfig};
use connector::Connector;
use futures::future::join_all;
use model::RawJob;
use registry::get_connectors;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());
    let config = if Path::new(&path).exists() {
        match load_config(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("Config load error: {}", e);
                return;
            }
        }
    } else {
        warn!("{} not found, using built-in sources", path);
        AppConfig::default()
    };

    info!("Getting connectors from registry");
    let launcher = default_launcher(&config.browser);
    let connectors = match get_connectors(&config, launcher) {
        Ok(connectors) => connectors,
        Err(e) => {
            error!("Registry error: {}", e);
            return;
        }
    };
    info!("Connectors to run: {}", connectors.len());

    // Each browser connector launches its own session, so running them side by
    // side never shares a page.
    let runs = connectors.iter().map(|c| run_connector(Arc::clone(c)));
    let totals = join_all(runs).await;

    info!("Finished: {} jobs from {} connectors", totals.iter().sum::<usize>(), totals.len());
}

/// Fetches one source and prints its records. Failures are logged, not fatal
/// for the other sources.
async fn run_connector(connector: Arc<dyn Connector>) -> usize {
    let name = connector.name().to_string();
    info!("Fetching {}...", name);

    match connector.fetch().await {
        Ok(jobs) => {
            println!("{} jobs: {}", name, jobs.len());
            for job in &jobs {
                println!("{}", summary_line(job));
            }
            jobs.len()
        }
        Err(e) => {
            warn!("{} fetch failed: {}", name, e);
            0
        }
    }
}

fn summary_line(job: &RawJob) -> String {
    format!(
        "- {} | {} | {} | {}",
        job.title, job.team, job.location, job.source_url
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FetchError, RawPayload};
    use async_trait::async_trait;
    use chrono::Utc;

    fn job(title: &str) -> RawJob {
        RawJob {
            source: "test".into(),
            source_id: "1".into(),
            source_url: "https://jobs.test/1".into(),
            title: title.into(),
            location: "NY".into(),
            team: String::new(),
            office: String::new(),
            posted_hint: String::new(),
            content: String::new(),
            raw: RawPayload::Text(title.into()),
            fetched_at: Utc::now(),
        }
    }

    struct Fixed(Result<usize, ()>);

    #[async_trait]
    impl Connector for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn fetch(&self) -> Result<Vec<RawJob>, FetchError> {
            match self.0 {
                Ok(n) => Ok((0..n).map(|i| job(&format!("job {i}"))).collect()),
                Err(()) => Err(FetchError::Config("boom".into())),
            }
        }
    }

    #[test]
    fn summary_keeps_empty_team_column() {
        assert_eq!(
            summary_line(&job("X")),
            "- X |  | NY | https://jobs.test/1"
        );
    }

    #[tokio::test]
    async fn failing_connector_counts_as_zero() {
        assert_eq!(run_connector(Arc::new(Fixed(Ok(3)))).await, 3);
        assert_eq!(run_connector(Arc::new(Fixed(Err(())))).await, 0);
    }
}
