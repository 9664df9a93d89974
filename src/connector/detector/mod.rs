//! Per-site media detection.
//!
//! Selectors here follow third-party markup that changes without notice.
//! Every detector is best-effort: anything unexpected yields `None`, and a
//! detector never returns an identity with a required field missing.

mod document;
mod imdb;
mod justwatch;
mod search_engine;
mod trakt;

pub use document::{Document, PageSource, element_text, own_text};
pub use imdb::ImdbDetector;
pub use justwatch::{JustWatchDetector, SearchRow};
pub use search_engine::SearchEngineDetector;
pub use trakt::TraktDetector;

use crate::connector::site::SiteVariant;
use crate::connector::types::MediaIdentity;

/// Extracts a media identity from a parsed page
pub trait MediaDetector: Send + Sync {
    fn detect(&self, doc: &Document) -> Option<MediaIdentity>;
}

/// Run the detector for `variant`; unknown sites detect nothing
pub fn detect(variant: SiteVariant, doc: &Document) -> Option<MediaIdentity> {
    match variant {
        SiteVariant::Imdb => ImdbDetector.detect(doc),
        SiteVariant::JustWatch => JustWatchDetector.detect(doc),
        SiteVariant::Trakt => TraktDetector.detect(doc),
        SiteVariant::Google | SiteVariant::Bing => SearchEngineDetector::new(variant)?.detect(doc),
        SiteVariant::Unknown => None,
    }
}

/// Decode the handful of entities that show up in JSON-LD names
pub(crate) fn decode_entities(text: &str) -> String {
    text.replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}
