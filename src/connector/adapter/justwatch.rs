use super::{SiteAdapter, Target, View, card_view};
use crate::connector::detector::{Document, JustWatchDetector, MediaDetector};
use crate::connector::message::{Query, Resolution};
use crate::connector::render::{
    Anchor, Element, Phase, Placement, Presentation, RequestIntent, search_badge,
};
use crate::connector::site::{JustWatchPage, SiteVariant, justwatch_page_kind};
use crate::connector::types::SearchQuery;
use scraper::Selector;
use std::sync::LazyLock;
use tracing::debug;

pub const JUSTWATCH_SKELETON_SLOT: &str = "media-connector-justwatch-skeleton";
pub const JUSTWATCH_CARD_SLOT: &str = "media-connector-justwatch-card";
pub const JUSTWATCH_BADGE_PREFIX: &str = "media-connector-jw-search-badge-";

struct JustWatchAnchors {
    /// Tried in order for the detail card
    detail: Vec<(Selector, Placement)>,
}

static ANCHORS: LazyLock<JustWatchAnchors> = LazyLock::new(|| JustWatchAnchors {
    detail: [
        ("#buybox-anchor", Placement::Before),
        (".buybox-container", Placement::Before),
        (".title-detail-hero", Placement::After),
        ("main", Placement::Prepend),
    ]
    .into_iter()
    .map(|(css, placement)| {
        (
            Selector::parse(css).expect("Invalid justwatch anchor selector"),
            placement,
        )
    })
    .collect(),
});

/// JustWatch: a card on detail pages, one badge per row on search pages
#[derive(Debug, Clone, Copy, Default)]
pub struct JustWatchAdapter;

impl JustWatchAdapter {
    fn detail_anchor(doc: &Document) -> Option<Anchor> {
        ANCHORS
            .detail
            .iter()
            .find_map(|(selector, placement)| {
                doc.select_first(selector)
                    .map(|el| doc.anchor(el, *placement))
            })
            .or_else(|| doc.body_anchor())
    }

    fn detail_targets(doc: &Document) -> Vec<Target> {
        let (Some(media), Some(anchor)) = (JustWatchDetector.detect(doc), Self::detail_anchor(doc))
        else {
            return Vec::new();
        };
        let query = Query::Search(SearchQuery::from(&media));
        vec![
            Target::new(media, query)
                .with_slot(JUSTWATCH_SKELETON_SLOT, anchor.clone())
                .with_slot(JUSTWATCH_CARD_SLOT, anchor)
                .with_label(),
        ]
    }

    fn search_targets(doc: &Document) -> Vec<Target> {
        JustWatchDetector
            .detect_rows(doc)
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                let anchor = doc.anchor(row.title, Placement::After);
                let query = Query::Search(SearchQuery::from(&row.media));
                Target::new(row.media, query).with_slot(format!("{JUSTWATCH_BADGE_PREFIX}{i}"), anchor)
            })
            .collect()
    }

    fn badge(target: &Target, view: &View<'_>) -> Option<Element> {
        let slot = target.slots().next()?;
        let intent = RequestIntent::from(&target.media);
        Some(match view {
            View::Loading { server } => {
                search_badge(slot, Phase::Loading, None, server.unwrap_or_default(), intent)
            }
            View::Resolved(Resolution::Search(set)) => {
                let presentation = Presentation::from_search(
                    set,
                    target.media.query_title(),
                    target.media.media_type(),
                );
                search_badge(slot, Phase::Resolved, Some(&presentation), set.server_type, intent)
            }
            View::Resolved(Resolution::Availability(result)) => {
                let presentation = Presentation::from_availability(result);
                search_badge(slot, Phase::Resolved, Some(&presentation), result.server_type, intent)
            }
        })
    }
}

impl SiteAdapter for JustWatchAdapter {
    fn variant(&self) -> SiteVariant {
        SiteVariant::JustWatch
    }

    fn detect(&self, doc: &Document) -> Vec<Target> {
        let page = doc
            .url()
            .map_or(JustWatchPage::Other, |url| justwatch_page_kind(url.as_str()));
        debug!("JustWatch page kind: {:?}", page);

        match page {
            JustWatchPage::Detail => Self::detail_targets(doc),
            JustWatchPage::Search => Self::search_targets(doc),
            JustWatchPage::Other => Vec::new(),
        }
    }

    fn render(&self, target: &Target, view: &View<'_>) -> Vec<Element> {
        if target.owns(JUSTWATCH_CARD_SLOT) {
            card_view(target, view, JUSTWATCH_SKELETON_SLOT, JUSTWATCH_CARD_SLOT)
        } else {
            Self::badge(target, view).into_iter().collect()
        }
    }
}
