// Discrete pagination through a "next page" control
use super::{AdvanceStrategy, SessionState, StopReason, Surface};
use crate::browser::wait_for_function;
use crate::model::{FetchError, PageError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

pub struct Paginate {
    pub next_selector: String,
    pub max_pages: usize,
    /// Bound for navigation, the first results and each page change.
    pub timeout: Duration,
}

#[async_trait]
impl AdvanceStrategy for Paginate {
    async fn open(&self, surface: &Surface<'_>, url: &str) -> Result<(), FetchError> {
        surface.page.navigate(url, self.timeout).await?;

        // SPAs go network-idle before the list renders; wait for a card instead.
        match surface.page.wait_for_selector(surface.cards, self.timeout).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_fatal() => Err(e.into()),
            Err(e) => Err(FetchError::SurfaceTimeout {
                url: url.to_string(),
                source: e,
            }),
        }
    }

    fn exhausted(&self, state: &SessionState) -> Option<StopReason> {
        (state.rounds >= self.max_pages).then_some(StopReason::PageLimit)
    }

    fn on_enumerate(&self, visible: usize) -> Option<StopReason> {
        (visible == 0).then_some(StopReason::EmptyPage)
    }

    async fn advance(
        &self,
        surface: &Surface<'_>,
        state: &mut SessionState,
    ) -> Result<Option<StopReason>, FetchError> {
        // An unreadable first card leaves the marker empty; any identity then counts as a change.
        let marker = match surface.first_identity().await {
            Ok(marker) => marker,
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                debug!("first card unreadable on page {}: {}", state.rounds, e);
                String::new()
            }
        };

        let controls = match surface.page.query_all(&self.next_selector).await {
            Ok(controls) => controls,
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                warn!("next control lookup failed on page {}: {}", state.rounds, e);
                return Ok(Some(StopReason::AdvanceFailed));
            }
        };
        let Some(next) = controls.first() else {
            return Ok(Some(StopReason::NoNextControl));
        };
        match next.is_enabled().await {
            Ok(true) => {}
            Ok(false) => return Ok(Some(StopReason::NextDisabled)),
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                warn!("next control unreadable on page {}: {}", state.rounds, e);
                return Ok(Some(StopReason::AdvanceFailed));
            }
        }

        if let Err(e) = next.click().await {
            if e.is_fatal() {
                return Err(e.into());
            }
            warn!("clicking next failed on page {}: {}", state.rounds, e);
            return Ok(Some(StopReason::AdvanceFailed));
        }

        let changed = wait_for_function(
            |prev| async move {
                let now = surface.first_identity().await?;
                Ok::<_, PageError>(!now.is_empty() && now != prev)
            },
            marker.as_str(),
            self.timeout,
        )
        .await?;

        if changed {
            Ok(None)
        } else {
            warn!(
                "results did not change after clicking next | prev_first = {}",
                marker
            );
            Ok(Some(StopReason::Stalled))
        }
    }
}
