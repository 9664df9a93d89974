use super::{CycleReport, SiteAdapter, Target, detect_targets, resolve_targets};
use crate::connector::detector::PageSource;
use crate::connector::message::MessageClient;
use crate::connector::render::{Action, Surface};
use crate::connector::types::MediaIdentity;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Where the current page cycle stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclePhase {
    #[default]
    Idle,
    Detecting,
    Loading,
    Resolved,
}

/// Hint from the host that a single-page app changed its content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationSignal {
    /// The URL changed through the history API
    HistoryChange,
    /// The document mutated without a URL change
    ContentMutation,
}

#[derive(Debug, Default)]
struct SessionState {
    phase: CyclePhase,
    cycle: u64,
    url: Option<String>,
    media: Vec<MediaIdentity>,
    slots: Vec<String>,
}

/// One adapter bound to one page for its lifetime.
///
/// Each detection starts a new cycle. Starting a cycle removes everything
/// the previous one injected before any new request is sent, and answers
/// that belong to an older cycle are never rendered.
pub struct PageSession {
    adapter: Arc<dyn SiteAdapter>,
    client: MessageClient,
    surface: Arc<Surface>,
    settle_delay: Duration,
    state: Mutex<SessionState>,
}

impl PageSession {
    pub fn new(adapter: Arc<dyn SiteAdapter>, client: MessageClient, surface: Arc<Surface>) -> Self {
        Self {
            adapter,
            client,
            surface,
            settle_delay: Duration::ZERO,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Builder pattern: wait this long after a navigation before re-detecting
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn phase(&self) -> CyclePhase {
        self.state.lock().phase
    }

    pub fn surface(&self) -> &Arc<Surface> {
        &self.surface
    }

    /// Media detected by the latest cycle
    pub fn current_media(&self) -> Vec<MediaIdentity> {
        self.state.lock().media.clone()
    }

    /// Initial detection after the page loaded
    pub async fn load(&self, page: &PageSource) -> CycleReport {
        self.state.lock().phase = CyclePhase::Detecting;
        let targets = detect_targets(self.adapter.as_ref(), page);
        self.run(page, targets).await
    }

    /// React to an in-page navigation. Returns `None` when no new cycle was
    /// started: the site is not a single-page app, the URL did not change,
    /// or the content still shows the same media.
    pub async fn navigate(&self, signal: NavigationSignal, page: &PageSource) -> Option<CycleReport> {
        if !self.adapter.variant().is_spa() {
            return None;
        }
        if signal == NavigationSignal::HistoryChange
            && self.state.lock().url.as_deref() == Some(page.url.as_str())
        {
            debug!("URL unchanged, skipping re-detection");
            return None;
        }

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        let targets = detect_targets(self.adapter.as_ref(), page);
        if signal == NavigationSignal::ContentMutation {
            let state = self.state.lock();
            let unchanged = state.media.len() == targets.len()
                && state.media.iter().zip(&targets).all(|(m, t)| *m == t.media);
            if unchanged {
                return None;
            }
        }

        info!("Re-detecting after {:?} on {}", signal, page.url);
        Some(self.run(page, targets).await)
    }

    /// Handle activation of the control labelled `label` inside `slot`.
    /// Dismiss controls remove their element.
    pub fn activate(&self, slot: &str, label: &str) -> Option<Action> {
        let element = self.surface.get(slot)?;
        let action = element.action_labelled(label)?.clone();
        if let Action::Dismiss { slot } = &action {
            self.surface.teardown(slot);
        }
        Some(action)
    }

    async fn run(&self, page: &PageSource, targets: Vec<Target>) -> CycleReport {
        let cycle = self.begin(page, &targets);
        if targets.is_empty() {
            return CycleReport::default();
        }

        let report = resolve_targets(self.adapter.as_ref(), &targets, &self.client, &self.surface).await;

        let mut state = self.state.lock();
        if state.cycle == cycle {
            state.phase = CyclePhase::Resolved;
        } else {
            debug!("Cycle {} finished after cycle {} started", cycle, state.cycle);
        }
        report
    }

    /// Retire the previous cycle's slots and record the new one
    fn begin(&self, page: &PageSource, targets: &[Target]) -> u64 {
        let mut state = self.state.lock();
        for slot in state.slots.drain(..) {
            self.surface.retire(&slot);
        }

        state.cycle += 1;
        state.url = Some(page.url.clone());
        state.media = targets.iter().map(|t| t.media.clone()).collect();
        state.slots = targets
            .iter()
            .flat_map(|t| t.slots().map(str::to_string))
            .collect();
        state.phase = if targets.is_empty() {
            CyclePhase::Idle
        } else {
            CyclePhase::Loading
        };
        state.cycle
    }
}

impl std::fmt::Debug for PageSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSession")
            .field("site", &self.adapter.variant())
            .field("settle_delay", &self.settle_delay)
            .field("state", &*self.state.lock())
            .finish()
    }
}
