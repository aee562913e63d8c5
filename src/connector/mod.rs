pub mod greenhouse;
pub mod interactive;

use crate::model::{FetchError, RawJob};

pub use greenhouse::GreenhouseConnector;
pub use interactive::{BrowserConnector, SiteScraper};

/// A configured job source. `fetch` needs nothing beyond the connector's own
/// configuration and either returns every record or fails as a whole.
#[async_trait::async_trait]
pub trait Connector: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch(&self) -> Result<Vec<RawJob>, FetchError>;
}
