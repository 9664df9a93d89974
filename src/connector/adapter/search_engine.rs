use super::{INDICATOR_SLOT, SiteAdapter, Target, View, card_view};
use crate::connector::detector::{Document, MediaDetector, SearchEngineDetector};
use crate::connector::message::{Query, Resolution};
use crate::connector::render::{Element, Placement, RequestIntent, floating_indicator};
use crate::connector::site::SiteVariant;
use crate::connector::types::CheckMediaRequest;
use scraper::Selector;
use std::sync::LazyLock;

pub const SEARCH_SKELETON_SLOT: &str = "media-connector-search-skeleton";
pub const SEARCH_CARD_SLOT: &str = "media-connector-search-card";

static GOOGLE_SIDEBAR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#rhs").expect("Invalid google sidebar selector"));
static BING_SIDEBAR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#b_context").expect("Invalid bing sidebar selector"));

/// Knowledge-panel targets: a card atop the sidebar, else the floating indicator
fn detect_panel(variant: SiteVariant, sidebar: &Selector, doc: &Document) -> Vec<Target> {
    let Some(media) = SearchEngineDetector::new(variant).and_then(|d| d.detect(doc)) else {
        return Vec::new();
    };
    let query = Query::Check(CheckMediaRequest::from(&media));
    let target = Target::new(media, query);

    if let Some(sidebar) = doc.select_first(sidebar) {
        let anchor = doc.anchor(sidebar, Placement::Prepend);
        return vec![
            target
                .with_slot(SEARCH_SKELETON_SLOT, anchor.clone())
                .with_slot(SEARCH_CARD_SLOT, anchor)
                .with_label(),
        ];
    }
    doc.body_anchor()
        .map(|body| target.with_slot(INDICATOR_SLOT, body))
        .into_iter()
        .collect()
}

fn render_panel(target: &Target, view: &View<'_>) -> Vec<Element> {
    if target.owns(SEARCH_CARD_SLOT) {
        return card_view(target, view, SEARCH_SKELETON_SLOT, SEARCH_CARD_SLOT);
    }
    match view {
        View::Resolved(Resolution::Availability(result)) => {
            floating_indicator(INDICATOR_SLOT, result, RequestIntent::from(&target.media))
                .into_iter()
                .collect()
        }
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleAdapter;

impl SiteAdapter for GoogleAdapter {
    fn variant(&self) -> SiteVariant {
        SiteVariant::Google
    }

    fn detect(&self, doc: &Document) -> Vec<Target> {
        detect_panel(SiteVariant::Google, &GOOGLE_SIDEBAR, doc)
    }

    fn render(&self, target: &Target, view: &View<'_>) -> Vec<Element> {
        render_panel(target, view)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BingAdapter;

impl SiteAdapter for BingAdapter {
    fn variant(&self) -> SiteVariant {
        SiteVariant::Bing
    }

    fn detect(&self, doc: &Document) -> Vec<Target> {
        detect_panel(SiteVariant::Bing, &BING_SIDEBAR, doc)
    }

    fn render(&self, target: &Target, view: &View<'_>) -> Vec<Element> {
        render_panel(target, view)
    }
}
