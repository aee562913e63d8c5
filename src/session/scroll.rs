// Scroll-triggered lazy loading
use super::{AdvanceStrategy, SessionState, StopReason, Surface};
use crate::model::FetchError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Consecutive rounds without new records before giving up.
pub const STAGNATION_LIMIT: usize = 6;

pub struct Scroll {
    pub consent_selector: Option<String>,
    /// Bound for navigation and for the first results to show up.
    pub timeout: Duration,
    /// Pause after each scroll for lazy content to arrive.
    pub settle: Duration,
    pub step: f64,
}

impl Scroll {
    /// One attempt at a cookie/consent overlay. Nothing here is an error.
    async fn dismiss_consent(&self, surface: &Surface<'_>) {
        let Some(selector) = self.consent_selector.as_deref() else {
            return;
        };
        let controls = match surface.page.query_all(selector).await {
            Ok(controls) => controls,
            Err(e) => {
                debug!("consent lookup failed: {}", e);
                return;
            }
        };
        let Some(control) = controls.first() else {
            debug!("no consent overlay");
            return;
        };
        match control.is_visible().await {
            Ok(true) => match control.click().await {
                Ok(()) => debug!("consent overlay dismissed"),
                Err(e) => debug!("consent click failed: {}", e),
            },
            Ok(false) => debug!("consent control hidden"),
            Err(e) => debug!("consent control unreadable: {}", e),
        }
    }
}

#[async_trait]
impl AdvanceStrategy for Scroll {
    async fn open(&self, surface: &Surface<'_>, url: &str) -> Result<(), FetchError> {
        surface.page.navigate(url, self.timeout).await?;

        // Lazy boards may render nothing until the first scroll; only a dead
        // page is fatal here.
        if let Err(e) = surface.page.wait_for_selector(surface.cards, self.timeout).await {
            if e.is_fatal() {
                return Err(e.into());
            }
            debug!("page did not settle with results: {}", e);
        }

        self.dismiss_consent(surface).await;
        Ok(())
    }

    fn exhausted(&self, state: &SessionState) -> Option<StopReason> {
        (state.stagnant_rounds >= STAGNATION_LIMIT).then_some(StopReason::Stagnant)
    }

    async fn advance(
        &self,
        surface: &Surface<'_>,
        state: &mut SessionState,
    ) -> Result<Option<StopReason>, FetchError> {
        let count = state.records.len();
        if count == state.last_count {
            state.stagnant_rounds += 1;
        } else {
            state.stagnant_rounds = 0;
            state.last_count = count;
        }

        if let Err(e) = surface.page.scroll(0.0, self.step).await {
            if e.is_fatal() {
                return Err(e.into());
            }
            debug!("scroll round {} failed: {}", state.rounds, e);
        }
        surface.page.wait(self.settle).await;
        Ok(None)
    }
}
