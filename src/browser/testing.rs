//! Scripted in-memory page for exercising the scrape engine.

use super::{BrowserPage, BrowserSession, ElementHandle, PageLauncher};
use crate::model::PageError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const CARDS: &str = "a.card";
pub const NEXT: &str = "button.next";
pub const CONSENT: &str = "button.consent";

#[derive(Debug, Clone)]
pub struct FakeCard {
    href: String,
    text: String,
    detached: bool,
}

pub fn card(href: &str, text: &str) -> FakeCard {
    FakeCard {
        href: href.to_string(),
        text: text.to_string(),
        detached: false,
    }
}

pub fn detached(href: &str) -> FakeCard {
    FakeCard {
        detached: true,
        ..card(href, "")
    }
}

/// One card per index, linking to `/jobs/{prefix}-{i}`, with a three-line body.
pub fn cards(prefix: &str, range: std::ops::Range<usize>) -> Vec<FakeCard> {
    range
        .map(|i| {
            card(
                &format!("/jobs/{prefix}-{i}"),
                &format!("{prefix} role {i}\nCity {i}\nTeam {i}"),
            )
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextControl {
    Missing,
    Disabled,
    Enabled,
}

#[derive(Debug, Default)]
struct FakeState {
    frames: Vec<Vec<FakeCard>>,
    next: Vec<NextControl>,
    frame: usize,
    stall_on_click: bool,
    failing_click: Option<PageError>,
    failing_query: Option<(&'static str, usize, PageError)>,
    unreadable_next: Option<PageError>,
    consent_visible: bool,
    consent_clicked: bool,
    crash_on_query: Option<usize>,
    queries: usize,
    selector_queries: HashMap<String, usize>,
    clicks: usize,
    scrolls: usize,
    navigated: Vec<String>,
}

impl FakeState {
    fn advance(&mut self) {
        if self.frame + 1 < self.frames.len() {
            self.frame += 1;
        }
    }

    fn visible_cards(&self) -> Vec<FakeCard> {
        self.frames.get(self.frame).cloned().unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct FakePage {
    state: Arc<Mutex<FakeState>>,
}

impl FakePage {
    /// Each frame is one page of results; `next` describes the control shown
    /// on that page. Clicking an enabled control moves to the next frame.
    pub fn paged(frames: Vec<Vec<FakeCard>>, next: Vec<NextControl>) -> Self {
        Self::from_state(FakeState {
            frames,
            next,
            ..FakeState::default()
        })
    }

    /// Each scroll reveals the next frame; the last frame stays put.
    pub fn scrolling(frames: Vec<Vec<FakeCard>>) -> Self {
        Self::from_state(FakeState {
            frames,
            ..FakeState::default()
        })
    }

    fn from_state(state: FakeState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn stall_on_click(self) -> Self {
        self.state.lock().unwrap().stall_on_click = true;
        self
    }

    pub fn failing_click(self, error: PageError) -> Self {
        self.state.lock().unwrap().failing_click = Some(error);
        self
    }

    /// Fails `query_all(selector)` from its `n`th call (1-based) on.
    pub fn failing_query(self, selector: &'static str, n: usize, error: PageError) -> Self {
        self.state.lock().unwrap().failing_query = Some((selector, n, error));
        self
    }

    /// The next control is found but its state cannot be read.
    pub fn unreadable_next(self, error: PageError) -> Self {
        self.state.lock().unwrap().unreadable_next = Some(error);
        self
    }

    pub fn with_consent(self) -> Self {
        self.state.lock().unwrap().consent_visible = true;
        self
    }

    /// Fails every `query_all` from the `n`th call (1-based) on.
    pub fn crash_on_query(self, n: usize) -> Self {
        self.state.lock().unwrap().crash_on_query = Some(n);
        self
    }

    pub fn clicks(&self) -> usize {
        self.state.lock().unwrap().clicks
    }

    pub fn scrolls(&self) -> usize {
        self.state.lock().unwrap().scrolls
    }

    pub fn consent_clicked(&self) -> bool {
        self.state.lock().unwrap().consent_clicked
    }

    pub fn navigated(&self) -> Vec<String> {
        self.state.lock().unwrap().navigated.clone()
    }
}

#[async_trait]
impl BrowserPage for FakePage {
    async fn navigate(&self, url: &str, _timeout: Duration) -> Result<(), PageError> {
        self.state.lock().unwrap().navigated.push(url.to_string());
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, _timeout: Duration) -> Result<(), PageError> {
        let state = self.state.lock().unwrap();
        if selector == CARDS && !state.visible_cards().is_empty() {
            Ok(())
        } else {
            Err(PageError::Timeout(selector.to_string()))
        }
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>, PageError> {
        let mut state = self.state.lock().unwrap();
        state.queries += 1;
        if state.crash_on_query.is_some_and(|n| state.queries >= n) {
            return Err(PageError::Runtime("page crashed".into()));
        }
        let calls = {
            let count = state.selector_queries.entry(selector.to_string()).or_default();
            *count += 1;
            *count
        };
        if let Some((failing, n, error)) = &state.failing_query {
            if *failing == selector && calls >= *n {
                return Err(error.clone());
            }
        }

        let element = |kind: FakeKind| -> Box<dyn ElementHandle> {
            Box::new(FakeElement {
                state: Arc::clone(&self.state),
                kind,
            })
        };

        let found = match selector {
            CARDS => state
                .visible_cards()
                .into_iter()
                .map(|c| element(FakeKind::Card(c)))
                .collect(),
            NEXT => match state.next.get(state.frame).copied() {
                Some(NextControl::Enabled) => vec![element(FakeKind::Next { enabled: true })],
                Some(NextControl::Disabled) => vec![element(FakeKind::Next { enabled: false })],
                Some(NextControl::Missing) | None => Vec::new(),
            },
            CONSENT if state.consent_visible => vec![element(FakeKind::Consent)],
            _ => Vec::new(),
        };
        Ok(found)
    }

    async fn scroll(&self, _dx: f64, _dy: f64) -> Result<(), PageError> {
        let mut state = self.state.lock().unwrap();
        state.scrolls += 1;
        state.advance();
        Ok(())
    }

    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

enum FakeKind {
    Card(FakeCard),
    Next { enabled: bool },
    Consent,
}

struct FakeElement {
    state: Arc<Mutex<FakeState>>,
    kind: FakeKind,
}

#[async_trait]
impl ElementHandle for FakeElement {
    async fn get_attribute(&self, name: &str) -> Result<Option<String>, PageError> {
        match &self.kind {
            FakeKind::Card(c) if c.detached => Err(PageError::Detached(c.href.clone())),
            FakeKind::Card(c) if name == "href" => Ok(Some(c.href.clone())),
            _ => Ok(None),
        }
    }

    async fn inner_text(&self) -> Result<String, PageError> {
        match &self.kind {
            FakeKind::Card(c) if c.detached => Err(PageError::Detached(c.href.clone())),
            FakeKind::Card(c) => Ok(c.text.clone()),
            FakeKind::Next { .. } => Ok("navigate_next".into()),
            FakeKind::Consent => Ok("Accept all".into()),
        }
    }

    async fn click(&self) -> Result<(), PageError> {
        let mut state = self.state.lock().unwrap();
        state.clicks += 1;
        match &self.kind {
            FakeKind::Next { .. } => {
                if let Some(err) = state.failing_click.clone() {
                    return Err(err);
                }
                if !state.stall_on_click {
                    state.advance();
                }
            }
            FakeKind::Consent => {
                state.consent_visible = false;
                state.consent_clicked = true;
            }
            FakeKind::Card(_) => {}
        }
        Ok(())
    }

    async fn is_enabled(&self) -> Result<bool, PageError> {
        if let FakeKind::Next { .. } = self.kind {
            if let Some(err) = self.state.lock().unwrap().unreadable_next.clone() {
                return Err(err);
            }
        }
        Ok(match self.kind {
            FakeKind::Next { enabled } => enabled,
            _ => true,
        })
    }

    async fn is_visible(&self) -> Result<bool, PageError> {
        Ok(true)
    }
}

pub struct FakeSession {
    page: FakePage,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl BrowserSession for FakeSession {
    fn page(&self) -> &dyn BrowserPage {
        &self.page
    }

    async fn close(self: Box<Self>) -> Result<(), PageError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out sessions over the same scripted page and counts closes.
pub struct FakeLauncher {
    page: FakePage,
    closes: Arc<AtomicUsize>,
}

impl FakeLauncher {
    pub fn new(page: FakePage) -> Self {
        Self {
            page,
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, PageError> {
        Ok(Box::new(FakeSession {
            page: self.page.clone(),
            closes: Arc::clone(&self.closes),
        }))
    }
}
