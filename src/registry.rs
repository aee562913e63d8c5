// Builds the connectors to run from configuration
use crate::browser::PageLauncher;
use crate::config::{AppConfig, GreenhouseQuery, GreenhouseSource, SourceConfig};
use crate::connector::{BrowserConnector, Connector, GreenhouseConnector};
use crate::model::FetchError;
use crate::sites::{GoogleCareersScraper, ScrollBoardScraper};
use crate::utils::board_token_from_url;
use std::sync::Arc;
use std::time::Duration;

pub fn get_connectors(
    config: &AppConfig,
    launcher: Arc<dyn PageLauncher>,
) -> Result<Vec<Arc<dyn Connector>>, FetchError> {
    config
        .sources
        .iter()
        .map(|source| -> Result<Arc<dyn Connector>, FetchError> {
            let connector: Arc<dyn Connector> = match source {
                SourceConfig::Greenhouse(gh) => {
                    Arc::new(GreenhouseConnector::new(greenhouse_query(gh)?)?)
                }
                SourceConfig::GoogleCareers(query) => Arc::new(BrowserConnector::new(
                    GoogleCareersScraper::new(query.clone()),
                    Arc::clone(&launcher),
                )),
                SourceConfig::ScrollBoard(query) => Arc::new(BrowserConnector::new(
                    ScrollBoardScraper::new(query.clone())?,
                    Arc::clone(&launcher),
                )),
            };
            Ok(connector)
        })
        .collect()
}

fn greenhouse_query(source: &GreenhouseSource) -> Result<GreenhouseQuery, FetchError> {
    let board_token = match (&source.board_token, &source.board_url) {
        (Some(token), _) if !token.trim().is_empty() => token.trim().to_string(),
        (_, Some(url)) => board_token_from_url(url).ok_or_else(|| {
            FetchError::Config(format!("could not parse board token from URL: {url}"))
        })?,
        _ => {
            return Err(FetchError::Config(
                "greenhouse source needs board_token or board_url".into(),
            ));
        }
    };

    Ok(GreenhouseQuery {
        board_token,
        content: source.content,
        timeout: Duration::from_secs(source.timeout_seconds),
    })
}
