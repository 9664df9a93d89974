use crate::connector::{ConnectorError, Result};
use serde::{Deserialize, Serialize};

/// Media type as understood by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Movie => write!(f, "movie"),
            Self::Tv => write!(f, "tv"),
        }
    }
}

/// Title-level identity shared by movies and series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleIdentity {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u64>,
}

impl TitleIdentity {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: None,
            imdb_id: None,
            tmdb_id: None,
        }
    }

    /// Builder pattern: set year
    pub fn with_year(mut self, year: Option<i32>) -> Self {
        self.year = year;
        self
    }

    /// Builder pattern: set IMDb ID
    pub fn with_imdb_id(mut self, imdb_id: Option<String>) -> Self {
        self.imdb_id = imdb_id;
        self
    }

    /// Builder pattern: set TMDB ID
    pub fn with_tmdb_id(mut self, tmdb_id: Option<u64>) -> Self {
        self.tmdb_id = tmdb_id;
        self
    }
}

/// A single season of a series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonIdentity {
    pub series_title: String,
    pub season_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u64>,
}

/// A single episode of a series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeIdentity {
    pub series_title: String,
    pub season_number: u32,
    pub episode_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u64>,
}

/// Media detected on a page
///
/// Movies and series are queried by their own title; seasons and episodes
/// are always queried by the series title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaIdentity {
    Movie(TitleIdentity),
    Series(TitleIdentity),
    Season(SeasonIdentity),
    Episode(EpisodeIdentity),
}

impl MediaIdentity {
    /// The name used for display and for every orchestrator query
    pub fn query_title(&self) -> &str {
        match self {
            Self::Movie(t) | Self::Series(t) => &t.title,
            Self::Season(s) => &s.series_title,
            Self::Episode(e) => &e.series_title,
        }
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            Self::Movie(_) => MediaType::Movie,
            Self::Series(_) | Self::Season(_) | Self::Episode(_) => MediaType::Tv,
        }
    }

    pub fn year(&self) -> Option<i32> {
        match self {
            Self::Movie(t) | Self::Series(t) => t.year,
            Self::Season(s) => s.year,
            Self::Episode(e) => e.year,
        }
    }

    pub fn imdb_id(&self) -> Option<&str> {
        match self {
            Self::Movie(t) | Self::Series(t) => t.imdb_id.as_deref(),
            Self::Season(s) => s.imdb_id.as_deref(),
            Self::Episode(e) => e.imdb_id.as_deref(),
        }
    }

    pub fn tmdb_id(&self) -> Option<u64> {
        match self {
            Self::Movie(t) | Self::Series(t) => t.tmdb_id,
            Self::Season(s) => s.tmdb_id,
            Self::Episode(e) => e.tmdb_id,
        }
    }

    pub fn season_number(&self) -> Option<u32> {
        match self {
            Self::Season(s) => Some(s.season_number),
            Self::Episode(e) => Some(e.season_number),
            Self::Movie(_) | Self::Series(_) => None,
        }
    }

    pub fn episode_number(&self) -> Option<u32> {
        match self {
            Self::Episode(e) => Some(e.episode_number),
            _ => None,
        }
    }

    /// Kind label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Movie(_) => "movie",
            Self::Series(_) => "series",
            Self::Season(_) => "season",
            Self::Episode(_) => "episode",
        }
    }
}

/// Normalized `CHECK_MEDIA` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckMediaRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u64>,
    pub media_type: MediaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_number: Option<u32>,
}

impl From<&MediaIdentity> for CheckMediaRequest {
    fn from(media: &MediaIdentity) -> Self {
        Self {
            title: media.query_title().to_string(),
            year: media.year(),
            imdb_id: media.imdb_id().map(str::to_string),
            tmdb_id: media.tmdb_id(),
            media_type: media.media_type(),
            season_number: media.season_number(),
            episode_number: media.episode_number(),
        }
    }
}

/// Project detected media into a `CHECK_MEDIA` payload.
///
/// Absent media is an explicit failure here so callers can tell
/// "nothing to check" apart from "checked, found nothing".
pub fn build_check_request(media: Option<&MediaIdentity>) -> Result<CheckMediaRequest> {
    media
        .map(CheckMediaRequest::from)
        .ok_or(ConnectorError::NoMediaDetected)
}

/// `SEARCH_JELLYSEERR` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub query: String,
    pub media_type: MediaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl From<&MediaIdentity> for SearchQuery {
    fn from(media: &MediaIdentity) -> Self {
        Self {
            query: media.query_title().to_string(),
            media_type: media.media_type(),
            year: media.year(),
        }
    }
}
