mod adapter;
mod detector;
mod message;
mod render;
mod site;
#[cfg(test)]
mod tests;
mod types;

pub use adapter::{
    AdapterTable, BingAdapter, CyclePhase, CycleReport, GoogleAdapter, ImdbAdapter,
    JustWatchAdapter, NavigationSignal, PageSession, SiteAdapter, Target, TargetReport,
    TargetState, TraktAdapter, View, detect_targets, resolve_targets, run_cycle,
};
pub use detector::{
    Document, ImdbDetector, JustWatchDetector, MediaDetector, PageSource, SearchEngineDetector,
    SearchRow, TraktDetector, detect,
};
pub use message::{
    Envelope, HttpTransport, Message, MessageClient, Query, Resolution, Transport,
};
pub use render::{
    Action, Anchor, Element, Mount, Phase, Placement, Presentation, RequestIntent,
    SEARCH_BADGE_CLASS, SlotLease, Surface,
};
pub use site::{JustWatchPage, SiteVariant, classify, classify_url, justwatch_page_kind};
pub use types::{
    AvailabilityResult, AvailabilityStatus, CheckMediaRequest, EpisodeIdentity, MediaIdentity,
    MediaType, OrchestratorConfig, SearchQuery, SearchResultRow, SearchResultSet, SeasonIdentity,
    ServerType, TitleIdentity, build_check_request,
};

/// Connector result type
pub type Result<T> = std::result::Result<T, ConnectorError>;

/// Connector error types
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("No media detected")]
    NoMediaDetected,
}

/// Page-load entry point: classify the page, pick its built-in adapter and
/// run one detect/resolve/render cycle.
///
/// Returns `None` when the site is not supported.
pub async fn on_page_load(
    page: &PageSource,
    client: &MessageClient,
    surface: &Surface,
) -> Option<CycleReport> {
    AdapterTable::standard().dispatch(page, client, surface).await
}
