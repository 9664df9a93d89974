use super::{Document, MediaDetector, element_text, own_text};
use crate::connector::site::PATTERNS;
use crate::connector::types::{EpisodeIdentity, MediaIdentity, SeasonIdentity, TitleIdentity};
use scraper::Selector;
use std::sync::LazyLock;

struct TraktSelectors {
    heading: Selector,
    year: Selector,
    show_link: Selector,
    imdb_link: Selector,
    tmdb_link: Selector,
}

static SELECTORS: LazyLock<TraktSelectors> = LazyLock::new(|| TraktSelectors {
    heading: Selector::parse("h1").expect("Invalid heading selector"),
    year: Selector::parse("h1 .year").expect("Invalid year selector"),
    show_link: Selector::parse(r#"h2 a[href^="/shows/"]"#).expect("Invalid show_link selector"),
    imdb_link: Selector::parse("a#external-link-imdb").expect("Invalid imdb_link selector"),
    tmdb_link: Selector::parse("a#external-link-tmdb").expect("Invalid tmdb_link selector"),
});

/// Trakt movie, show, season and episode pages
#[derive(Debug, Clone, Copy, Default)]
pub struct TraktDetector;

impl TraktDetector {
    fn imdb_id(doc: &Document) -> Option<String> {
        let href = doc.attr_of(&SELECTORS.imdb_link, "href")?;
        PATTERNS.imdb_id.find(&href).map(|m| m.as_str().to_string())
    }

    fn tmdb_id(doc: &Document) -> Option<u64> {
        let href = doc.attr_of(&SELECTORS.tmdb_link, "href")?;
        PATTERNS
            .tmdb_link
            .captures(&href)?
            .get(2)?
            .as_str()
            .parse()
            .ok()
    }

    fn series_title(doc: &Document) -> Option<String> {
        doc.text_of(&SELECTORS.show_link)
    }
}

impl MediaDetector for TraktDetector {
    fn detect(&self, doc: &Document) -> Option<MediaIdentity> {
        let caps = PATTERNS.trakt_path.captures(doc.path())?;
        let section = caps.get(1)?.as_str();
        let season: Option<u32> = caps.get(3).and_then(|m| m.as_str().parse().ok());
        let episode: Option<u32> = caps.get(4).and_then(|m| m.as_str().parse().ok());

        let year = doc
            .text_of(&SELECTORS.year)
            .and_then(|t| PATTERNS.first_year(&t));
        let imdb_id = Self::imdb_id(doc);
        let tmdb_id = Self::tmdb_id(doc);

        match (section, season, episode) {
            ("shows", Some(season_number), Some(episode_number)) => {
                Some(MediaIdentity::Episode(EpisodeIdentity {
                    series_title: Self::series_title(doc)?,
                    season_number,
                    episode_number,
                    year,
                    imdb_id,
                    tmdb_id,
                }))
            }
            ("shows", Some(season_number), None) => Some(MediaIdentity::Season(SeasonIdentity {
                series_title: Self::series_title(doc)?,
                season_number,
                year,
                imdb_id,
                tmdb_id,
            })),
            (_, Some(_), _) => None,
            _ => {
                let heading = doc.select_first(&SELECTORS.heading)?;
                let mut title = own_text(heading);
                if title.is_empty() {
                    title = element_text(heading);
                }
                if title.is_empty() {
                    return None;
                }

                let identity = TitleIdentity::new(title)
                    .with_year(year)
                    .with_imdb_id(imdb_id)
                    .with_tmdb_id(tmdb_id);
                Some(if section == "shows" {
                    MediaIdentity::Series(identity)
                } else {
                    MediaIdentity::Movie(identity)
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::detector::PageSource;

    fn detect(url: &str, html: &str) -> Option<MediaIdentity> {
        TraktDetector.detect(&Document::parse(&PageSource::new(url, html)))
    }

    const EXTERNAL: &str = r#"<ul class="external">
        <li><a id="external-link-imdb" href="https://www.imdb.com/title/tt0133093">IMDb</a></li>
        <li><a id="external-link-tmdb" href="https://www.themoviedb.org/movie/603">TMDB</a></li>
    </ul>"#;

    #[test]
    fn test_movie_with_external_ids() {
        let html = format!(r#"<h1>The Matrix <span class="year">1999</span></h1>{EXTERNAL}"#);

        let media = detect("https://trakt.tv/movies/the-matrix-1999", &html).unwrap();
        assert_eq!(
            media,
            MediaIdentity::Movie(
                TitleIdentity::new("The Matrix")
                    .with_year(Some(1999))
                    .with_imdb_id(Some("tt0133093".to_string()))
                    .with_tmdb_id(Some(603))
            )
        );
    }

    #[test]
    fn test_episode_page() {
        let html = r#"<h2><a href="/shows/breaking-bad">Breaking Bad</a></h2>
            <h1>Ozymandias <span class="year">2013</span></h1>"#;

        let media = detect("https://trakt.tv/shows/breaking-bad/seasons/5/episodes/14", html).unwrap();
        assert_eq!(media.query_title(), "Breaking Bad");
        assert_eq!(media.season_number(), Some(5));
        assert_eq!(media.episode_number(), Some(14));
        assert_eq!(media.year(), Some(2013));
    }

    #[test]
    fn test_season_page_needs_show_link() {
        assert!(detect("https://trakt.tv/shows/dark/seasons/1", "<h1>Season 1</h1>").is_none());

        let media = detect(
            "https://trakt.tv/shows/dark/seasons/1",
            r#"<h2><a href="/shows/dark">Dark</a></h2><h1>Season 1</h1>"#,
        )
        .unwrap();
        assert!(matches!(media, MediaIdentity::Season(ref s) if s.series_title == "Dark"));
    }

    #[test]
    fn test_show_page() {
        let media = detect("https://trakt.tv/shows/dark", "<h1>Dark <span class=\"year\">2017</span></h1>").unwrap();
        assert!(matches!(media, MediaIdentity::Series(ref t) if t.title == "Dark" && t.year == Some(2017)));
    }

    #[test]
    fn test_other_paths() {
        assert!(detect("https://trakt.tv/users/someone/history", "<h1>History</h1>").is_none());
        assert!(detect("https://trakt.tv/movies/x", "<p>no heading</p>").is_none());
    }
}
