//! Site adapters: where each supported site gets its status UI.
//!
//! An adapter finds targets on a page, says which question each target asks
//! and builds the elements for the loading and resolved views. Slot claiming,
//! message round trips and stale-response handling live in the driver, so
//! every adapter gets the same guarantees.

mod driver;
mod imdb;
mod justwatch;
mod search_engine;
mod session;
mod trakt;

pub use driver::{
    CycleReport, TargetReport, TargetState, detect_targets, resolve_targets, run_cycle,
};
pub use imdb::ImdbAdapter;
pub use justwatch::JustWatchAdapter;
pub use search_engine::{BingAdapter, GoogleAdapter};
pub use session::{CyclePhase, NavigationSignal, PageSession};
pub use trakt::TraktAdapter;

use crate::connector::detector::{Document, PageSource};
use crate::connector::message::{MessageClient, Query, Resolution};
use crate::connector::render::{
    Anchor, Element, Surface, jellyseerr_card, skeleton, status_card,
};
use crate::connector::site::{SiteVariant, classify, classify_url};
use crate::connector::types::{MediaIdentity, SearchQuery, ServerType};
use async_trait::async_trait;
use scraper::{ElementRef, Selector};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Slot of the floating fallback indicator
pub const INDICATOR_SLOT: &str = "media-connector-indicator";

/// One detected media item and the slots it renders into
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub media: MediaIdentity,
    pub query: Query,
    /// Loading view shows the configured server name
    pub needs_label: bool,
    slots: Vec<(String, Anchor)>,
}

impl Target {
    pub fn new(media: MediaIdentity, query: Query) -> Self {
        Self {
            media,
            query,
            needs_label: false,
            slots: Vec::new(),
        }
    }

    /// Builder pattern: add a slot at `anchor`
    pub fn with_slot(mut self, slot: impl Into<String>, anchor: Anchor) -> Self {
        self.slots.push((slot.into(), anchor));
        self
    }

    /// Builder pattern: fetch the server label before the first paint
    pub fn with_label(mut self) -> Self {
        self.needs_label = true;
        self
    }

    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|(slot, _)| slot.as_str())
    }

    pub fn anchor_for(&self, slot: &str) -> Option<&Anchor> {
        self.slots
            .iter()
            .find(|(s, _)| s == slot)
            .map(|(_, anchor)| anchor)
    }

    pub fn owns(&self, slot: &str) -> bool {
        self.anchor_for(slot).is_some()
    }
}

/// What an adapter is asked to draw
#[derive(Debug, Clone, Copy)]
pub enum View<'a> {
    Loading { server: Option<ServerType> },
    Resolved(&'a Resolution),
}

/// Per-site integration
#[async_trait]
pub trait SiteAdapter: Send + Sync {
    fn variant(&self) -> SiteVariant;

    /// Targets on the page, in document order. Empty when nothing is detected.
    fn detect(&self, doc: &Document) -> Vec<Target>;

    /// Ask the orchestrator about one target
    async fn resolve(&self, client: &MessageClient, target: &Target) -> Option<Resolution> {
        client.resolve(&target.query).await
    }

    /// Elements for `view`; each carries the id of one of the target's slots.
    /// Slots left out are removed.
    fn render(&self, target: &Target, view: &View<'_>) -> Vec<Element>;
}

/// Registry of adapters by site
#[derive(Clone, Default)]
pub struct AdapterTable {
    adapters: HashMap<SiteVariant, Arc<dyn SiteAdapter>>,
}

impl AdapterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with every built-in adapter
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.register(ImdbAdapter);
        table.register(JustWatchAdapter);
        table.register(TraktAdapter);
        table.register(GoogleAdapter);
        table.register(BingAdapter);
        table
    }

    /// Add an adapter, replacing any registered for the same site
    pub fn register<A: SiteAdapter + 'static>(&mut self, adapter: A) {
        self.adapters.insert(adapter.variant(), Arc::new(adapter));
    }

    pub fn get(&self, variant: SiteVariant) -> Option<Arc<dyn SiteAdapter>> {
        self.adapters.get(&variant).cloned()
    }

    pub fn for_url(&self, url: &Url) -> Option<Arc<dyn SiteAdapter>> {
        self.get(classify_url(url))
    }

    /// Run one cycle on `page` with the adapter for its site.
    /// Returns `None` when no adapter is registered for the site.
    pub async fn dispatch(
        &self,
        page: &PageSource,
        client: &MessageClient,
        surface: &Surface,
    ) -> Option<CycleReport> {
        let variant = classify(&page.url);
        info!("Page load on {} ({})", variant, page.url);

        let Some(adapter) = self.get(variant) else {
            debug!("No adapter for {}", variant);
            return None;
        };
        Some(run_cycle(adapter.as_ref(), page, client, surface).await)
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

/// Nearest ancestor of `element` matching `selector`
fn closest<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| selector.matches(ancestor))
}

/// Skeleton while loading, then a card for the answer
fn card_view(target: &Target, view: &View<'_>, skeleton_slot: &str, card_slot: &str) -> Vec<Element> {
    match view {
        View::Loading { server } => vec![skeleton(skeleton_slot, *server)],
        View::Resolved(Resolution::Search(set)) => {
            let query = match &target.query {
                Query::Search(query) => query.clone(),
                Query::Check(_) => SearchQuery::from(&target.media),
            };
            vec![jellyseerr_card(card_slot, set, &query)]
        }
        View::Resolved(Resolution::Availability(result)) => {
            vec![status_card(card_slot, result, &target.media)]
        }
    }
}

impl std::fmt::Debug for AdapterTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterTable")
            .field("sites", &self.adapters.keys().collect::<Vec<_>>())
            .finish()
    }
}
