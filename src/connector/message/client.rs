use super::{Envelope, Message, Query, Resolution, Transport};
use crate::connector::types::{
    AvailabilityResult, CheckMediaRequest, OrchestratorConfig, SearchQuery, SearchResultSet,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

/// Single-shot request/response client for the orchestrator.
///
/// Every call is independent: no request ids, no retries, no timeout of its
/// own. A missing, failed or undecodable reply resolves to `None`.
#[derive(Clone)]
pub struct MessageClient {
    transport: Arc<dyn Transport>,
}

impl MessageClient {
    pub fn new<T: Transport + 'static>(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn from_arc(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Send one message and decode the reply payload
    pub async fn send<R: DeserializeOwned>(&self, message: &Message) -> Option<R> {
        let kind = message.kind();
        let body = match serde_json::to_value(message) {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to encode {}: {}", kind, e);
                return None;
            }
        };

        let reply = match self.transport.deliver(body).await {
            Ok(Some(reply)) => reply,
            Ok(None) => {
                debug!("No listener answered {}", kind);
                return None;
            }
            Err(e) => {
                debug!("{} failed: {}", kind, e);
                return None;
            }
        };

        match serde_json::from_value::<Envelope<R>>(reply) {
            Ok(envelope) => Some(envelope.payload),
            Err(e) => {
                warn!("Unexpected {} reply: {}", kind, e);
                None
            }
        }
    }

    pub async fn get_config(&self) -> Option<OrchestratorConfig> {
        self.send(&Message::GetConfig).await
    }

    pub async fn check_media(&self, request: &CheckMediaRequest) -> Option<AvailabilityResult> {
        self.send(&Message::CheckMedia(request.clone())).await
    }

    pub async fn search_jellyseerr(&self, query: &SearchQuery) -> Option<SearchResultSet> {
        self.send(&Message::SearchJellyseerr(query.clone())).await
    }

    /// Ask whichever question `query` carries
    pub async fn resolve(&self, query: &Query) -> Option<Resolution> {
        match query {
            Query::Check(request) => self
                .check_media(request)
                .await
                .map(Resolution::Availability),
            Query::Search(search) => self
                .search_jellyseerr(search)
                .await
                .map(Resolution::Search),
        }
    }
}

impl std::fmt::Debug for MessageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageClient").finish_non_exhaustive()
    }
}
