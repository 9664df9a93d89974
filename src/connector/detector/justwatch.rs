use super::{Document, MediaDetector, element_text, own_text};
use crate::connector::site::PATTERNS;
use crate::connector::types::{MediaIdentity, SeasonIdentity, TitleIdentity};
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

struct JustWatchSelectors {
    /// Most specific first
    detail_title: Vec<Selector>,
    release_year: Selector,
    row: Selector,
    row_title: Selector,
    row_year: Selector,
    row_link: Selector,
}

static SELECTORS: LazyLock<JustWatchSelectors> = LazyLock::new(|| JustWatchSelectors {
    detail_title: ["h1.title-detail-hero__details__title", ".title-block h1", "h1"]
        .into_iter()
        .map(|css| Selector::parse(css).expect("Invalid detail_title selector"))
        .collect(),
    release_year: Selector::parse(".release-year").expect("Invalid release_year selector"),
    row: Selector::parse(".title-list-row__row").expect("Invalid row selector"),
    row_title: Selector::parse(".header-title").expect("Invalid row_title selector"),
    row_year: Selector::parse(".header-year").expect("Invalid row_year selector"),
    row_link: Selector::parse(r#"a[href*="/movie/"], a[href*="/tv-show/"]"#)
        .expect("Invalid row_link selector"),
});

/// A title found in a JustWatch search result row
#[derive(Debug, Clone)]
pub struct SearchRow<'a> {
    pub row: ElementRef<'a>,
    pub title: ElementRef<'a>,
    pub media: MediaIdentity,
}

/// JustWatch detail pages and search result lists
#[derive(Debug, Clone, Copy, Default)]
pub struct JustWatchDetector;

impl JustWatchDetector {
    /// Heading text without the year span, trailing "(1999)" or "- Season 2"
    fn clean_title(heading: ElementRef<'_>) -> (String, Option<i32>) {
        let mut raw = own_text(heading);
        if raw.is_empty() {
            raw = element_text(heading);
        }

        let year = PATTERNS
            .trailing_year
            .captures(&raw)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok());
        let without_year = PATTERNS.trailing_year.replace(&raw, "");
        let title = PATTERNS
            .season_suffix
            .replace(&without_year, "")
            .trim()
            .to_string();
        (title, year)
    }

    /// One identity per search result row, in document order.
    /// Rows without a usable title or type are skipped.
    pub fn detect_rows<'a>(&self, doc: &'a Document) -> Vec<SearchRow<'a>> {
        doc.select_all(&SELECTORS.row)
            .filter_map(|row| {
                let title_el = row.select(&SELECTORS.row_title).next()?;
                let (title, trailing) = Self::clean_title(title_el);
                if title.is_empty() {
                    return None;
                }
                let href = row
                    .select(&SELECTORS.row_link)
                    .next()
                    .and_then(|a| a.value().attr("href"))?;
                let year = row
                    .select(&SELECTORS.row_year)
                    .next()
                    .and_then(|y| PATTERNS.first_year(&element_text(y)))
                    .or(trailing);

                let identity = TitleIdentity::new(title).with_year(year);
                let media = if href.contains("/tv-show/") {
                    MediaIdentity::Series(identity)
                } else {
                    MediaIdentity::Movie(identity)
                };
                Some(SearchRow {
                    row,
                    title: title_el,
                    media,
                })
            })
            .collect()
    }
}

impl MediaDetector for JustWatchDetector {
    fn detect(&self, doc: &Document) -> Option<MediaIdentity> {
        let caps = PATTERNS.justwatch_detail.captures(doc.path())?;
        let kind = caps.get(1)?.as_str();
        let season_number: Option<u32> = caps.get(3).and_then(|m| m.as_str().parse().ok());

        let heading = SELECTORS
            .detail_title
            .iter()
            .find_map(|selector| doc.select_first(selector))?;
        let (title, trailing) = Self::clean_title(heading);
        if title.is_empty() {
            return None;
        }
        let year = doc
            .text_of(&SELECTORS.release_year)
            .and_then(|t| PATTERNS.first_year(&t))
            .or(trailing);

        Some(match (kind, season_number) {
            ("tv-show", Some(season_number)) => MediaIdentity::Season(SeasonIdentity {
                series_title: title,
                season_number,
                year,
                imdb_id: None,
                tmdb_id: None,
            }),
            ("tv-show", None) => MediaIdentity::Series(TitleIdentity::new(title).with_year(year)),
            _ => MediaIdentity::Movie(TitleIdentity::new(title).with_year(year)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::detector::PageSource;
    use crate::connector::types::MediaType;

    fn doc(url: &str, html: &str) -> Document {
        Document::parse(&PageSource::new(url, html))
    }

    #[test]
    fn test_movie_detail() {
        let doc = doc(
            "https://www.justwatch.com/us/movie/the-matrix",
            r#"<h1 class="title-detail-hero__details__title">The Matrix <span class="release-year">(1999)</span></h1>"#,
        );

        let media = JustWatchDetector.detect(&doc).unwrap();
        assert_eq!(
            media,
            MediaIdentity::Movie(TitleIdentity::new("The Matrix").with_year(Some(1999)))
        );
    }

    #[test]
    fn test_season_detail_strips_suffix() {
        let doc = doc(
            "https://www.justwatch.com/uk/tv-show/breaking-bad/season-2",
            "<h1>Breaking Bad - Season 2 (2009)</h1>",
        );

        let media = JustWatchDetector.detect(&doc).unwrap();
        assert_eq!(media.query_title(), "Breaking Bad");
        assert_eq!(media.season_number(), Some(2));
        assert_eq!(media.year(), Some(2009));
        assert_eq!(media.media_type(), MediaType::Tv);
    }

    #[test]
    fn test_show_detail_without_year() {
        let doc = doc(
            "https://www.justwatch.com/de/tv-show/dark",
            "<h1 class=\"title-detail-hero__details__title\">Dark</h1>",
        );
        let media = JustWatchDetector.detect(&doc).unwrap();
        assert!(matches!(media, MediaIdentity::Series(ref t) if t.title == "Dark" && t.year.is_none()));
    }

    #[test]
    fn test_hero_title_wins_over_earlier_heading() {
        let doc = doc(
            "https://www.justwatch.com/us/movie/heat",
            r#"<header><h1 class="logo">JustWatch</h1></header>
               <div class="title-block"><h1>Heat (1995)</h1></div>
               <div class="title-detail-hero"><h1 class="title-detail-hero__details__title">Heat</h1></div>"#,
        );

        let media = JustWatchDetector.detect(&doc).unwrap();
        assert_eq!(media.query_title(), "Heat");

        let fallback = self::doc(
            "https://www.justwatch.com/us/movie/heat",
            r#"<header><h1 class="logo">JustWatch</h1></header>
               <div class="title-block"><h1>Heat (1995)</h1></div>"#,
        );
        let media = JustWatchDetector.detect(&fallback).unwrap();
        assert_eq!(media.query_title(), "Heat");
        assert_eq!(media.year(), Some(1995));
    }

    #[test]
    fn test_search_rows_in_order() {
        let doc = doc(
            "https://www.justwatch.com/us/search?q=alien",
            r#"<div class="title-list">
              <div class="title-list-row__row"><a href="/us/movie/alien"><span class="header-title">Alien</span></a><span class="header-year">(1979)</span></div>
              <div class="title-list-row__row"><a href="/us/tv-show/alien-earth"><span class="header-title">Alien: Earth</span></a></div>
              <div class="title-list-row__row"><span class="header-title">No link</span></div>
            </div>"#,
        );

        let rows = JustWatchDetector.detect_rows(&doc);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].media,
            MediaIdentity::Movie(TitleIdentity::new("Alien").with_year(Some(1979)))
        );
        assert_eq!(rows[1].media.media_type(), MediaType::Tv);
        assert_eq!(rows[1].media.query_title(), "Alien: Earth");
    }

    #[test]
    fn test_non_detail_path() {
        let doc = doc("https://www.justwatch.com/us/new", "<h1>New releases</h1>");
        assert!(JustWatchDetector.detect(&doc).is_none());
    }
}
