mod availability;
mod media;

pub use availability::{
    AvailabilityResult, AvailabilityStatus, OrchestratorConfig, SearchResultRow, SearchResultSet,
    ServerType,
};
pub use media::{
    CheckMediaRequest, EpisodeIdentity, MediaIdentity, MediaType, SearchQuery, SeasonIdentity,
    TitleIdentity, build_check_request,
};
