use super::{Document, MediaDetector};
use crate::connector::site::{PATTERNS, SiteVariant};
use crate::connector::types::{MediaIdentity, TitleIdentity};
use scraper::Selector;
use std::sync::LazyLock;
use tracing::debug;

struct PanelSelectors {
    title: Selector,
    subtitle: Selector,
}

static GOOGLE: LazyLock<PanelSelectors> = LazyLock::new(|| PanelSelectors {
    title: Selector::parse(r#"[data-attrid="title"]"#).expect("Invalid google title selector"),
    subtitle: Selector::parse(r#"[data-attrid="subtitle"]"#)
        .expect("Invalid google subtitle selector"),
});

static BING: LazyLock<PanelSelectors> = LazyLock::new(|| PanelSelectors {
    title: Selector::parse(".b_entityTitle").expect("Invalid bing title selector"),
    subtitle: Selector::parse(".b_entitySubTitle").expect("Invalid bing subtitle selector"),
});

/// Knowledge-panel detection on Google and Bing result pages.
///
/// The subtitle decides the type: TV wording means a series, film wording or
/// a runtime means a movie, anything else is not media.
#[derive(Debug, Clone, Copy)]
pub struct SearchEngineDetector {
    variant: SiteVariant,
}

impl SearchEngineDetector {
    /// Detector for a search engine variant, `None` for other sites
    pub fn new(variant: SiteVariant) -> Option<Self> {
        matches!(variant, SiteVariant::Google | SiteVariant::Bing).then_some(Self { variant })
    }

    fn selectors(&self) -> &'static PanelSelectors {
        match self.variant {
            SiteVariant::Bing => &BING,
            _ => &GOOGLE,
        }
    }
}

impl MediaDetector for SearchEngineDetector {
    fn detect(&self, doc: &Document) -> Option<MediaIdentity> {
        let selectors = self.selectors();
        let title = doc.text_of(&selectors.title)?;
        let subtitle = doc.text_of(&selectors.subtitle)?;

        let year = PATTERNS.first_year(&subtitle);
        let identity = TitleIdentity::new(title).with_year(year);

        if PATTERNS.tv_subtitle.is_match(&subtitle) {
            Some(MediaIdentity::Series(identity))
        } else if PATTERNS.film_subtitle.is_match(&subtitle) || PATTERNS.runtime.is_match(&subtitle) {
            Some(MediaIdentity::Movie(identity))
        } else {
            debug!("{} panel is not media: {}", self.variant, subtitle);
            None
        }
    }
}
