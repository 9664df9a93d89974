mod client;
mod transport;

pub use client::MessageClient;
pub use transport::{HttpTransport, Transport};

use crate::connector::types::{
    AvailabilityResult, CheckMediaRequest, SearchQuery, SearchResultSet,
};
use serde::{Deserialize, Serialize};

/// Request sent to the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    GetConfig,
    CheckMedia(CheckMediaRequest),
    SearchJellyseerr(SearchQuery),
}

impl Message {
    /// Wire name of the message kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GetConfig => "GET_CONFIG",
            Self::CheckMedia(_) => "CHECK_MEDIA",
            Self::SearchJellyseerr(_) => "SEARCH_JELLYSEERR",
        }
    }
}

/// Reply wrapper: `{"type": "<KIND>_RESPONSE", "payload": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<P> {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub payload: P,
}

/// Availability question a target asks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Check(CheckMediaRequest),
    Search(SearchQuery),
}

impl From<Query> for Message {
    fn from(query: Query) -> Self {
        match query {
            Query::Check(request) => Self::CheckMedia(request),
            Query::Search(query) => Self::SearchJellyseerr(query),
        }
    }
}

/// Answer to a [`Query`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Availability(AvailabilityResult),
    Search(SearchResultSet),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::types::MediaType;
    use serde_json::json;

    #[test]
    fn test_get_config_wire_format() {
        assert_eq!(
            serde_json::to_value(Message::GetConfig).unwrap(),
            json!({ "type": "GET_CONFIG" })
        );
    }

    #[test]
    fn test_search_wire_format() {
        let message = Message::SearchJellyseerr(SearchQuery {
            query: "The Matrix".to_string(),
            media_type: MediaType::Movie,
            year: Some(1999),
        });

        assert_eq!(message.kind(), "SEARCH_JELLYSEERR");
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "type": "SEARCH_JELLYSEERR",
                "payload": { "query": "The Matrix", "mediaType": "movie", "year": 1999 }
            })
        );
    }

    #[test]
    fn test_envelope_reads_payload() {
        let envelope: Envelope<AvailabilityResult> = serde_json::from_value(json!({
            "type": "CHECK_MEDIA_RESPONSE",
            "payload": { "status": "unavailable", "serverType": "emby" }
        }))
        .unwrap();

        assert_eq!(envelope.kind.as_deref(), Some("CHECK_MEDIA_RESPONSE"));
        assert_eq!(envelope.payload.item_url, None);
    }
}
