use super::{SiteAdapter, Target, View, card_view, closest};
use crate::connector::detector::{Document, ImdbDetector, MediaDetector};
use crate::connector::message::Query;
use crate::connector::render::{Anchor, Element, Placement};
use crate::connector::site::SiteVariant;
use crate::connector::types::SearchQuery;
use scraper::Selector;
use std::sync::LazyLock;

pub const IMDB_SKELETON_SLOT: &str = "media-connector-imdb-skeleton";
pub const IMDB_CARD_SLOT: &str = "media-connector-imdb-card";

struct ImdbAnchors {
    hero_parent: Selector,
    hero_title: Selector,
    page_section: Selector,
    main: Selector,
}

static ANCHORS: LazyLock<ImdbAnchors> = LazyLock::new(|| ImdbAnchors {
    hero_parent: Selector::parse(r#"[data-testid="hero-parent"]"#)
        .expect("Invalid hero_parent selector"),
    hero_title: Selector::parse(r#"[data-testid="hero__pageTitle"]"#)
        .expect("Invalid hero_title selector"),
    page_section: Selector::parse("section.ipc-page-background--baseAlt")
        .expect("Invalid page_section selector"),
    main: Selector::parse(r#"main[role="main"], main"#).expect("Invalid main selector"),
});

/// IMDb title pages: a card below the hero section, filled from a Jellyseerr search
#[derive(Debug, Clone, Copy, Default)]
pub struct ImdbAdapter;

impl ImdbAdapter {
    fn anchor(doc: &Document) -> Option<Anchor> {
        if let Some(hero) = doc.select_first(&ANCHORS.hero_parent) {
            let section = closest(hero, &ANCHORS.page_section).unwrap_or(hero);
            return Some(doc.anchor(section, Placement::After));
        }
        if let Some(section) = doc
            .select_first(&ANCHORS.hero_title)
            .and_then(|title| closest(title, &ANCHORS.page_section))
        {
            return Some(doc.anchor(section, Placement::After));
        }
        if let Some(main) = doc.select_first(&ANCHORS.main) {
            return Some(doc.anchor(main, Placement::Prepend));
        }
        doc.body_anchor()
    }
}

impl SiteAdapter for ImdbAdapter {
    fn variant(&self) -> SiteVariant {
        SiteVariant::Imdb
    }

    fn detect(&self, doc: &Document) -> Vec<Target> {
        let Some(media) = ImdbDetector.detect(doc) else {
            return Vec::new();
        };
        let Some(anchor) = Self::anchor(doc) else {
            return Vec::new();
        };

        let query = Query::Search(SearchQuery::from(&media));
        vec![
            Target::new(media, query)
                .with_slot(IMDB_SKELETON_SLOT, anchor.clone())
                .with_slot(IMDB_CARD_SLOT, anchor)
                .with_label(),
        ]
    }

    fn render(&self, target: &Target, view: &View<'_>) -> Vec<Element> {
        card_view(target, view, IMDB_SKELETON_SLOT, IMDB_CARD_SLOT)
    }
}
