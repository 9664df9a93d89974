use regex::Regex;
use std::sync::LazyLock;

/// Pre-compiled regex patterns for page URLs and markup text
pub struct Patterns {
    // URL path patterns
    pub imdb_title_path: Regex,    // /title/tt0133093/
    pub justwatch_detail: Regex,   // /us/tv-show/breaking-bad/season-2
    pub justwatch_search: Regex,   // /us/search
    pub trakt_path: Regex,         // /shows/breaking-bad/seasons/5/episodes/14
    pub tmdb_link: Regex,          // themoviedb.org/movie/603
    pub imdb_id: Regex,            // tt0133093

    // Text patterns
    pub year: Regex,
    pub trailing_year: Regex,      // "The Matrix (1999)"
    pub season_suffix: Regex,      // "Breaking Bad - Season 2"
    pub season_episode: Regex,     // S5.E14
    pub runtime: Regex,            // 2h 16m
    pub tv_subtitle: Regex,
    pub film_subtitle: Regex,
}

impl Patterns {
    pub fn new() -> Self {
        Self {
            imdb_title_path: Regex::new(r"^/(?:[a-z]{2}/)?title/(tt\d{7,9})(?:/|$)")
                .expect("Invalid imdb_title_path regex"),
            justwatch_detail: Regex::new(
                r"^/[a-z]{2}(?:-[a-z]{2})?/(movie|tv-show)/([^/]+)(?:/season-(\d+))?/?$",
            )
            .expect("Invalid justwatch_detail regex"),
            justwatch_search: Regex::new(r"/search(?:/|$)").expect("Invalid justwatch_search regex"),
            trakt_path: Regex::new(
                r"^/(movies|shows)/([^/]+)(?:/seasons/(\d+)(?:/episodes/(\d+))?)?/?$",
            )
            .expect("Invalid trakt_path regex"),
            tmdb_link: Regex::new(r"/(movie|tv)/(\d+)").expect("Invalid tmdb_link regex"),
            imdb_id: Regex::new(r"tt\d{7,9}").expect("Invalid imdb_id regex"),

            year: Regex::new(r"\b(?:19|20)\d{2}\b").expect("Invalid year regex"),
            trailing_year: Regex::new(r"\s*\((\d{4})\)\s*$").expect("Invalid trailing_year regex"),
            season_suffix: Regex::new(r"(?i)\s*[-–:]\s*season\s+\d+\s*$")
                .expect("Invalid season_suffix regex"),
            season_episode: Regex::new(r"(?i)\bS(\d{1,3})\s*\.?\s*E(\d{1,4})\b")
                .expect("Invalid season_episode regex"),
            runtime: Regex::new(r"\b\d{1,2}\s*h(?:\s*\d{1,2}\s*m(?:in)?)?\b|\b\d{2,3}\s*min\b")
                .expect("Invalid runtime regex"),
            tv_subtitle: Regex::new(
                r"(?i)\b(?:tv|television|web)\s+(?:series|show|mini[- ]?series)\b|\bminiseries\b|\bseries\b",
            )
            .expect("Invalid tv_subtitle regex"),
            film_subtitle: Regex::new(r"(?i)\b(?:film|movie)\b").expect("Invalid film_subtitle regex"),
        }
    }

    /// First plausible four-digit year in a text fragment
    pub fn first_year(&self, text: &str) -> Option<i32> {
        self.year.find(text).and_then(|m| m.as_str().parse().ok())
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Global singleton for patterns
pub static PATTERNS: LazyLock<Patterns> = LazyLock::new(Patterns::new);
