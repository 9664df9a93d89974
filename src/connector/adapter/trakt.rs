use super::{INDICATOR_SLOT, SiteAdapter, Target, View};
use crate::connector::detector::{Document, MediaDetector, TraktDetector, element_text};
use crate::connector::message::{Query, Resolution};
use crate::connector::render::{
    Anchor, Element, Placement, RequestIntent, action_button, floating_indicator,
    where_to_watch_item,
};
use crate::connector::site::SiteVariant;
use crate::connector::types::CheckMediaRequest;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

pub const TRAKT_WTW_SLOT: &str = "media-connector-wtw-item";
pub const TRAKT_BUTTON_SLOT: &str = "media-connector-trakt-action-btn";

const WHERE_TO_WATCH: &str = "Where to Watch";

struct TraktAnchors {
    list_title: Selector,
    list_items: Selector,
    checkin: Selector,
}

static ANCHORS: LazyLock<TraktAnchors> = LazyLock::new(|| TraktAnchors {
    list_title: Selector::parse(".trakt-list-title").expect("Invalid list_title selector"),
    list_items: Selector::parse(".trakt-list-item-container")
        .expect("Invalid list_items selector"),
    checkin: Selector::parse(".btn-checkin").expect("Invalid checkin selector"),
});

/// Trakt: an entry in "Where to Watch" and a button by "Check In",
/// or the floating indicator when the page has neither.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraktAdapter;

impl TraktAdapter {
    /// Item container of the section titled "Where to Watch"
    fn where_to_watch(doc: &Document) -> Option<ElementRef<'_>> {
        let title = doc
            .select_all(&ANCHORS.list_title)
            .find(|t| element_text(*t).contains(WHERE_TO_WATCH))?;

        title
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find_map(|section| section.select(&ANCHORS.list_items).next())
    }

    fn anchors(doc: &Document) -> Vec<(&'static str, Anchor)> {
        let mut anchors = Vec::new();
        if let Some(list) = Self::where_to_watch(doc) {
            anchors.push((TRAKT_WTW_SLOT, doc.anchor(list, Placement::Append)));
        }
        if let Some(checkin) = doc.select_first(&ANCHORS.checkin) {
            anchors.push((TRAKT_BUTTON_SLOT, doc.anchor(checkin, Placement::Before)));
        }
        if anchors.is_empty() {
            if let Some(body) = doc.body_anchor() {
                anchors.push((INDICATOR_SLOT, body));
            }
        }
        anchors
    }
}

impl SiteAdapter for TraktAdapter {
    fn variant(&self) -> SiteVariant {
        SiteVariant::Trakt
    }

    fn detect(&self, doc: &Document) -> Vec<Target> {
        let Some(media) = TraktDetector.detect(doc) else {
            return Vec::new();
        };
        let query = Query::Check(CheckMediaRequest::from(&media));
        let target = Self::anchors(doc)
            .into_iter()
            .fold(Target::new(media, query), |target, (slot, anchor)| {
                target.with_slot(slot, anchor)
            });
        vec![target]
    }

    fn render(&self, target: &Target, view: &View<'_>) -> Vec<Element> {
        let View::Resolved(Resolution::Availability(result)) = view else {
            return Vec::new();
        };
        let intent = RequestIntent::from(&target.media);

        target
            .slots()
            .filter_map(|slot| match slot {
                TRAKT_WTW_SLOT => where_to_watch_item(slot, result, intent.clone()),
                TRAKT_BUTTON_SLOT => action_button(slot, result, intent.clone()),
                INDICATOR_SLOT => floating_indicator(slot, result, intent.clone()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::detector::PageSource;
    use crate::connector::types::{AvailabilityResult, AvailabilityStatus, ServerType};

    const PAGE: &str = r#"<html><body>
        <h1>The Matrix <span class="year">1999</span></h1>
        <div class="action-buttons"><a class="btn btn-checkin">Check In</a></div>
        <div class="section">
          <div class="trakt-list-title"><span class="title">Where to Watch</span></div>
          <div class="trakt-list-item-container"><a class="service">Netflix</a></div>
        </div>
    </body></html>"#;

    fn doc(html: &str) -> Document {
        Document::parse(&PageSource::new("https://trakt.tv/movies/the-matrix-1999", html))
    }

    #[test]
    fn test_detect_both_anchors() {
        let targets = TraktAdapter.detect(&doc(PAGE));
        assert_eq!(targets.len(), 1);

        let target = &targets[0];
        assert!(matches!(&target.query, Query::Check(r) if r.title == "The Matrix"));
        assert_eq!(
            target.slots().collect::<Vec<_>>(),
            vec![TRAKT_WTW_SLOT, TRAKT_BUTTON_SLOT]
        );
        assert_eq!(
            target.anchor_for(TRAKT_WTW_SLOT).unwrap().target,
            "div.trakt-list-item-container"
        );
        assert_eq!(
            target.anchor_for(TRAKT_BUTTON_SLOT).unwrap().placement,
            Placement::Before
        );
    }

    #[test]
    fn test_indicator_fallback() {
        let targets = TraktAdapter.detect(&doc("<h1>The Matrix</h1>"));
        assert_eq!(targets[0].slots().collect::<Vec<_>>(), vec![INDICATOR_SLOT]);
    }

    #[test]
    fn test_render_only_when_resolved() {
        let target = TraktAdapter.detect(&doc(PAGE)).remove(0);
        assert!(TraktAdapter.render(&target, &View::Loading { server: None }).is_empty());

        let resolution = Resolution::Availability(
            AvailabilityResult::new(AvailabilityStatus::Available, ServerType::Jellyfin)
                .with_item_url("https://jf.test/item/603"),
        );
        let elements = TraktAdapter.render(&target, &View::Resolved(&resolution));
        let ids: Vec<_> = elements.iter().filter_map(|e| e.id.as_deref()).collect();
        assert_eq!(ids, vec![TRAKT_WTW_SLOT, TRAKT_BUTTON_SLOT]);
        assert!(elements[1].text_content().contains("Play on Jellyfin"));
    }
}
