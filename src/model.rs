// Core structs: RawJob, error types
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// One job posting as collected from a source, before any normalization.
///
/// Optional fields a source does not supply are empty strings, so every record
/// emitted by one connector has the same shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawJob {
    pub source: String,
    pub source_id: String,
    pub source_url: String,
    pub title: String,
    pub location: String,
    pub team: String,
    pub office: String,
    pub posted_hint: String,
    pub content: String,
    pub raw: RawPayload,
    pub fetched_at: DateTime<Utc>,
}

/// The unparsed material a record was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawPayload {
    /// Full API object.
    Json(serde_json::Value),
    /// Rendered text of a listing card.
    Text(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("malformed response: {0}")]
    Parse(#[from] ParserError),
    #[error("results never appeared at {url}: {source}")]
    SurfaceTimeout { url: String, source: PageError },
    #[error("browser failure: {0}")]
    Page(#[from] PageError),
    #[error("invalid source configuration: {0}")]
    Config(String),
}

/// Failures reported by the browser automation runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("timed out waiting for {0}")]
    Timeout(String),
    #[error("element is no longer attached: {0}")]
    Detached(String),
    #[error("browser runtime error: {0}")]
    Runtime(String),
    #[error("browser unavailable: {0}")]
    Unavailable(String),
}

impl PageError {
    /// Fatal errors mean the page itself is gone; everything else is local to
    /// one element or one wait.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PageError::Runtime(_) | PageError::Unavailable(_))
    }
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected shape: {0}")]
    InvalidShape(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
