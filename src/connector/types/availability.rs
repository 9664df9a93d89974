use super::MediaType;
use serde::{Deserialize, Serialize};

/// Personal media server flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServerType {
    #[default]
    Emby,
    Jellyfin,
}

impl ServerType {
    /// Human-readable server name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Emby => "Emby",
            Self::Jellyfin => "Jellyfin",
        }
    }
}

impl std::fmt::Display for ServerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Availability status reported by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Available,
    Partial,
    Unavailable,
    Unconfigured,
    Error,
}

impl AvailabilityStatus {
    /// Informational states offer no action
    pub fn is_terminal_info(&self) -> bool {
        matches!(self, Self::Unconfigured | Self::Error)
    }
}

impl std::fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Partial => write!(f, "partial"),
            Self::Unavailable => write!(f, "unavailable"),
            Self::Unconfigured => write!(f, "unconfigured"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// `CHECK_MEDIA` reply payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResult {
    pub status: AvailabilityStatus,
    #[serde(default)]
    pub server_type: ServerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AvailabilityResult {
    pub fn new(status: AvailabilityStatus, server_type: ServerType) -> Self {
        Self {
            status,
            server_type,
            item_url: None,
            details: None,
            error: None,
        }
    }

    /// Builder pattern: set item URL
    pub fn with_item_url(mut self, url: impl Into<String>) -> Self {
        self.item_url = Some(url.into());
        self
    }

    /// Builder pattern: set details text
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Builder pattern: set error text
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// One row of a Jellyseerr search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultRow {
    pub title: String,
    pub media_type: MediaType,
    pub status: AvailabilityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

/// `SEARCH_JELLYSEERR` reply payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultSet {
    #[serde(default)]
    pub results: Vec<SearchResultRow>,
    pub jellyseerr_enabled: bool,
    #[serde(default)]
    pub server_type: ServerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jellyseerr_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResultSet {
    /// The row that best matches a query: exact title and type first,
    /// then exact title, then the first row.
    pub fn best_row(&self, query: &str, media_type: MediaType) -> Option<&SearchResultRow> {
        let wanted = normalize_title(query);
        self.results
            .iter()
            .find(|r| r.media_type == media_type && normalize_title(&r.title) == wanted)
            .or_else(|| {
                self.results
                    .iter()
                    .find(|r| normalize_title(&r.title) == wanted)
            })
            .or_else(|| self.results.first())
    }
}

fn normalize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// `GET_CONFIG` reply payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestratorConfig {
    #[serde(default)]
    pub server_type: ServerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jellyseerr_url: Option<String>,
    #[serde(default)]
    pub jellyseerr_enabled: bool,
}
