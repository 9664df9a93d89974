use super::{Document, MediaDetector, decode_entities, element_text};
use crate::connector::site::PATTERNS;
use crate::connector::types::{EpisodeIdentity, MediaIdentity, TitleIdentity};
use scraper::Selector;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

struct ImdbSelectors {
    linked_data: Selector,
    hero_title: Selector,
    og_type: Selector,
    release_link: Selector,
    series_link: Selector,
    episode_numbers: Selector,
}

static SELECTORS: LazyLock<ImdbSelectors> = LazyLock::new(|| ImdbSelectors {
    linked_data: Selector::parse(r#"script[type="application/ld+json"]"#)
        .expect("Invalid linked_data selector"),
    hero_title: Selector::parse(r#"[data-testid="hero__pageTitle"]"#)
        .expect("Invalid hero_title selector"),
    og_type: Selector::parse(r#"meta[property="og:type"]"#).expect("Invalid og_type selector"),
    release_link: Selector::parse(r#"a[href*="releaseinfo"]"#)
        .expect("Invalid release_link selector"),
    series_link: Selector::parse(r#"[data-testid="hero-title-block__series-link"]"#)
        .expect("Invalid series_link selector"),
    episode_numbers: Selector::parse(
        r#"[data-testid="hero-subnav-bar-season-episode-numbers-section"]"#,
    )
    .expect("Invalid episode_numbers selector"),
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TitleKind {
    Movie,
    Series,
    Episode,
}

impl TitleKind {
    fn from_schema(kind: &str) -> Option<Self> {
        match kind {
            "Movie" => Some(Self::Movie),
            "TVSeries" | "TVMiniSeries" => Some(Self::Series),
            "TVEpisode" => Some(Self::Episode),
            _ => None,
        }
    }

    fn from_open_graph(kind: &str) -> Option<Self> {
        match kind {
            "video.movie" => Some(Self::Movie),
            "video.tv_show" => Some(Self::Series),
            "video.episode" => Some(Self::Episode),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct LinkedData {
    kind: Option<TitleKind>,
    name: Option<String>,
    year: Option<i32>,
}

/// IMDb title pages (`/title/tt…/`)
#[derive(Debug, Clone, Copy, Default)]
pub struct ImdbDetector;

impl ImdbDetector {
    fn linked_data(doc: &Document) -> Option<LinkedData> {
        doc.select_all(&SELECTORS.linked_data).find_map(|script| {
            let raw: String = script.text().collect();
            let value: Value = serde_json::from_str(raw.trim()).ok()?;
            let kind = value.get("@type").and_then(Value::as_str)?;
            let kind = TitleKind::from_schema(kind)?;

            Some(LinkedData {
                kind: Some(kind),
                name: value
                    .get("name")
                    .and_then(Value::as_str)
                    .map(decode_entities)
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty()),
                year: value
                    .get("datePublished")
                    .and_then(Value::as_str)
                    .and_then(|d| PATTERNS.first_year(d)),
            })
        })
    }

    fn episode(doc: &Document, year: Option<i32>) -> Option<MediaIdentity> {
        let series = doc.select_first(&SELECTORS.series_link)?;
        let series_title = element_text(series);
        if series_title.is_empty() {
            return None;
        }
        let numbers = doc.text_of(&SELECTORS.episode_numbers)?;
        let caps = PATTERNS.season_episode.captures(&numbers)?;
        let season_number = caps.get(1)?.as_str().parse().ok()?;
        let episode_number = caps.get(2)?.as_str().parse().ok()?;
        let series_imdb_id = series
            .value()
            .attr("href")
            .and_then(|href| PATTERNS.imdb_id.find(href))
            .map(|m| m.as_str().to_string());

        Some(MediaIdentity::Episode(EpisodeIdentity {
            series_title,
            season_number,
            episode_number,
            year,
            imdb_id: series_imdb_id,
            tmdb_id: None,
        }))
    }
}

impl MediaDetector for ImdbDetector {
    fn detect(&self, doc: &Document) -> Option<MediaIdentity> {
        let imdb_id = PATTERNS
            .imdb_title_path
            .captures(doc.path())?
            .get(1)?
            .as_str()
            .to_string();

        let linked = Self::linked_data(doc).unwrap_or_default();
        let kind = linked.kind.or_else(|| {
            doc.attr_of(&SELECTORS.og_type, "content")
                .as_deref()
                .and_then(TitleKind::from_open_graph)
        })?;
        let year = linked.year.or_else(|| {
            doc.text_of(&SELECTORS.release_link)
                .and_then(|t| PATTERNS.first_year(&t))
        });

        if kind == TitleKind::Episode {
            return Self::episode(doc, year);
        }

        let title = linked
            .name
            .or_else(|| doc.text_of(&SELECTORS.hero_title))?;
        debug!("IMDb {:?}: {} ({:?}) {}", kind, title, year, imdb_id);

        let identity = TitleIdentity::new(title)
            .with_year(year)
            .with_imdb_id(Some(imdb_id));
        Some(match kind {
            TitleKind::Series => MediaIdentity::Series(identity),
            _ => MediaIdentity::Movie(identity),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::detector::PageSource;

    fn detect(url: &str, html: &str) -> Option<MediaIdentity> {
        ImdbDetector.detect(&Document::parse(&PageSource::new(url, html)))
    }

    #[test]
    fn test_movie_from_linked_data() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"@type":"Movie","name":"The Matrix","datePublished":"1999-03-31"}</script>
        </head><body></body></html>"#;

        let media = detect("https://www.imdb.com/title/tt0133093/", html).unwrap();
        assert_eq!(
            media,
            MediaIdentity::Movie(
                TitleIdentity::new("The Matrix")
                    .with_year(Some(1999))
                    .with_imdb_id(Some("tt0133093".to_string()))
            )
        );
    }

    #[test]
    fn test_series_with_entities() {
        let html = r#"<script type="application/ld+json">{"@type":"TVSeries","name":"Grey&apos;s Anatomy","datePublished":"2005-03-27"}</script>"#;

        let media = detect("https://www.imdb.com/title/tt0413573/?ref_=nv", html).unwrap();
        assert!(matches!(&media, MediaIdentity::Series(t) if t.title == "Grey's Anatomy"));
        assert_eq!(media.year(), Some(2005));
    }

    #[test]
    fn test_fallback_to_hero_markup() {
        let html = r#"<html><head><meta property="og:type" content="video.movie"></head><body>
            <h1 data-testid="hero__pageTitle"><span>Inception</span></h1>
            <ul><li><a href="/title/tt1375666/releaseinfo">2010</a></li></ul>
        </body></html>"#;

        let media = detect("https://www.imdb.com/title/tt1375666/", html).unwrap();
        assert_eq!(media.query_title(), "Inception");
        assert_eq!(media.year(), Some(2010));
        assert_eq!(media.imdb_id(), Some("tt1375666"));
    }

    #[test]
    fn test_episode_uses_series_title() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"@type":"TVEpisode","name":"Ozymandias","datePublished":"2013-09-15"}</script>
        </head><body>
            <a data-testid="hero-title-block__series-link" href="/title/tt0903747/?ref_=tt_ov">Breaking Bad</a>
            <div data-testid="hero-subnav-bar-season-episode-numbers-section"><span>S5</span><span>.</span><span>E14</span></div>
        </body></html>"#;

        let media = detect("https://www.imdb.com/title/tt2301451/", html).unwrap();
        assert_eq!(
            media,
            MediaIdentity::Episode(EpisodeIdentity {
                series_title: "Breaking Bad".to_string(),
                season_number: 5,
                episode_number: 14,
                year: Some(2013),
                imdb_id: Some("tt0903747".to_string()),
                tmdb_id: None,
            })
        );
    }

    #[test]
    fn test_episode_without_numbers_is_absent() {
        let html = r#"<script type="application/ld+json">{"@type":"TVEpisode","name":"Pilot"}</script>
            <a data-testid="hero-title-block__series-link" href="/title/tt0903747/">Breaking Bad</a>"#;
        assert!(detect("https://www.imdb.com/title/tt0959621/", html).is_none());
    }

    #[test]
    fn test_non_title_pages_and_garbage() {
        assert!(detect("https://www.imdb.com/chart/top/", "<h1>Top 250</h1>").is_none());
        assert!(detect("https://www.imdb.com/title/tt0133093/", "").is_none());
        assert!(
            detect(
                "https://www.imdb.com/title/tt0133093/",
                r#"<script type="application/ld+json">{not json</script>"#
            )
            .is_none()
        );
    }
}
