//! Scrape session engine.
//!
//! One generic loop drives a results page to completion. What "advance" means
//! (clicking a next control, or scrolling to trigger lazy loading) and how a
//! card becomes a record are pluggable. Every wait is bounded, and every bound
//! expiring after the first page has loaded is a stop condition, not an error:
//! whatever was collected up to that point is returned.

pub mod extract;
pub mod paginate;
pub mod scroll;

pub use extract::{CardExtractor, LinkCardExtractor};
pub use paginate::Paginate;
pub use scroll::Scroll;

use crate::browser::{BrowserPage, ElementHandle};
use crate::model::{FetchError, PageError, RawJob};
use async_trait::async_trait;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};

/// Why a session stopped collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    PageLimit,
    EmptyPage,
    NoNextControl,
    NextDisabled,
    Stalled,
    AdvanceFailed,
    EnumerateFailed,
    Stagnant,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::TargetReached => "max results reached",
            StopReason::PageLimit => "max pages visited",
            StopReason::EmptyPage => "no result elements on page",
            StopReason::NoNextControl => "next control not found",
            StopReason::NextDisabled => "next control disabled",
            StopReason::Stalled => "results did not change after advancing",
            StopReason::AdvanceFailed => "advancing the page failed",
            StopReason::EnumerateFailed => "result elements could not be listed",
            StopReason::Stagnant => "no new results after repeated scrolling",
        };
        f.write_str(text)
    }
}

/// Mutable state of one session. Never outlives [`ScrapeSession::run`].
#[derive(Debug, Default)]
pub struct SessionState {
    pub records: Vec<RawJob>,
    pub seen: HashSet<String>,
    /// Pages visited (pagination) or scroll rounds.
    pub rounds: usize,
    pub stagnant_rounds: usize,
    pub last_count: usize,
}

#[derive(Debug)]
pub struct SessionReport {
    pub records: Vec<RawJob>,
    pub stop: StopReason,
    pub rounds: usize,
}

/// The results surface as seen by an advance strategy.
pub struct Surface<'a> {
    pub page: &'a dyn BrowserPage,
    pub cards: &'a str,
    pub extractor: &'a dyn CardExtractor,
}

impl Surface<'_> {
    /// Identity of the first visible card, or empty when there is none.
    pub async fn first_identity(&self) -> Result<String, PageError> {
        let elements = self.page.query_all(self.cards).await?;
        match elements.first() {
            Some(first) => Ok(self.extractor.identify(first.as_ref()).await?.unwrap_or_default()),
            None => Ok(String::new()),
        }
    }
}

#[async_trait]
pub trait AdvanceStrategy: Send + Sync {
    /// Loads the initial results. Errors here are fatal for the scrape.
    async fn open(&self, surface: &Surface<'_>, url: &str) -> Result<(), FetchError>;

    /// Checked before each round.
    fn exhausted(&self, state: &SessionState) -> Option<StopReason>;

    /// Checked after enumerating a round's elements, before harvesting.
    fn on_enumerate(&self, visible: usize) -> Option<StopReason> {
        let _ = visible;
        None
    }

    /// Moves the surface forward after a harvest. `Ok(Some(_))` ends the
    /// session normally; `Err` is reserved for fatal runtime failures.
    async fn advance(
        &self,
        surface: &Surface<'_>,
        state: &mut SessionState,
    ) -> Result<Option<StopReason>, FetchError>;
}

pub struct ScrapeSession<'a> {
    source: &'a str,
    surface: Surface<'a>,
    advance: &'a dyn AdvanceStrategy,
    max_results: usize,
}

impl<'a> ScrapeSession<'a> {
    pub fn new(
        source: &'a str,
        surface: Surface<'a>,
        advance: &'a dyn AdvanceStrategy,
        max_results: usize,
    ) -> Self {
        Self {
            source,
            surface,
            advance,
            max_results,
        }
    }

    pub async fn run(self, url: &str) -> Result<SessionReport, FetchError> {
        self.advance.open(&self.surface, url).await?;

        let mut state = SessionState::default();
        let stop = loop {
            if state.records.len() >= self.max_results {
                break StopReason::TargetReached;
            }
            if let Some(stop) = self.advance.exhausted(&state) {
                break stop;
            }
            state.rounds += 1;

            let elements = match self.surface.page.query_all(self.surface.cards).await {
                Ok(elements) => elements,
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    warn!("[{}] listing cards failed: {}", self.source, e);
                    break StopReason::EnumerateFailed;
                }
            };
            if let Some(stop) = self.advance.on_enumerate(elements.len()) {
                break stop;
            }

            let added = self.harvest(&elements, &mut state).await?;
            debug!(
                "[{}] round {}: {} visible, {} new, {} total",
                self.source,
                state.rounds,
                elements.len(),
                added,
                state.records.len()
            );
            if state.records.len() >= self.max_results {
                break StopReason::TargetReached;
            }

            if let Some(stop) = self.advance.advance(&self.surface, &mut state).await? {
                break stop;
            }
        };

        info!("[{}] STOP: {} (round {})", self.source, stop, state.rounds);

        let mut records = state.records;
        records.truncate(self.max_results);
        Ok(SessionReport {
            records,
            stop,
            rounds: state.rounds,
        })
    }

    /// Appends unseen cards in page order, returning how many were added.
    async fn harvest(
        &self,
        elements: &[Box<dyn ElementHandle>],
        state: &mut SessionState,
    ) -> Result<usize, FetchError> {
        let extractor = self.surface.extractor;
        let mut added = 0;

        for element in elements {
            if state.records.len() >= self.max_results {
                break;
            }

            let url = match extractor.identify(element.as_ref()).await {
                Ok(Some(url)) if !url.is_empty() => url,
                Ok(_) => continue,
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    debug!("[{}] skipping unreadable card: {}", self.source, e);
                    continue;
                }
            };
            if state.seen.contains(&url) {
                continue;
            }

            let record = match extractor.extract(&url, element.as_ref()).await {
                Ok(record) => record,
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    debug!("[{}] skipping unreadable card {}: {}", self.source, url, e);
                    continue;
                }
            };

            state.seen.insert(url);
            state.records.push(record);
            added += 1;
        }

        Ok(added)
    }
}
