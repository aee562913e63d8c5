// Greenhouse Job Board API parsing
use crate::model::{ParserError, RawJob, RawPayload};
use crate::parser::Parser;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

pub const SOURCE: &str = "greenhouse";

#[derive(Debug, Deserialize)]
struct JobEntry {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    location: Option<Named>,
    #[serde(default)]
    absolute_url: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    departments: Option<Vec<Named>>,
    #[serde(default)]
    offices: Option<Vec<Named>>,
    #[serde(default)]
    updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Named {
    #[serde(default)]
    name: Option<String>,
}

fn join_names(named: Option<Vec<Named>>) -> String {
    named
        .unwrap_or_default()
        .into_iter()
        .filter_map(|n| n.name)
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Maps a `GET /v1/boards/{token}/jobs` body to records.
pub struct GreenhouseParser {
    include_content: bool,
}

impl GreenhouseParser {
    pub fn new(include_content: bool) -> Self {
        Self { include_content }
    }

    fn to_record(&self, job: Value) -> Result<RawJob, ParserError> {
        let entry = JobEntry::deserialize(&job)?;

        let source_id = match &entry.id {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };
        let content = if self.include_content {
            entry.content.unwrap_or_default()
        } else {
            String::new()
        };

        Ok(RawJob {
            source: SOURCE.to_string(),
            source_id,
            source_url: entry.absolute_url.unwrap_or_default(),
            title: entry.title.unwrap_or_default(),
            location: entry.location.and_then(|l| l.name).unwrap_or_default(),
            team: join_names(entry.departments),
            office: join_names(entry.offices),
            posted_hint: entry.updated_at.unwrap_or_default(),
            content,
            raw: RawPayload::Json(job),
            fetched_at: Utc::now(),
        })
    }
}

impl Parser for GreenhouseParser {
    fn parse(&self, body: &str) -> Result<Vec<RawJob>, ParserError> {
        let mut document: Value = serde_json::from_str(body)?;
        let jobs = match document.get_mut("jobs").map(Value::take) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(jobs)) => jobs,
            Some(other) => {
                return Err(ParserError::InvalidShape(format!(
                    "`jobs` is not a list: {other}"
                )));
            }
        };

        jobs.into_iter().map(|job| self.to_record(job)).collect()
    }
}
