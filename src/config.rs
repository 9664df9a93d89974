use crate::connector::{
    AdapterTable, HttpTransport, MessageClient, PageSession, Result, Surface, classify,
};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const ENV_PREFIX: &str = "MEDIA_CONNECTOR";

/// Connector configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    pub orchestrator: OrchestratorEndpoint,
    pub spa: SpaConfig,
    pub log: LogConfig,
}

/// Where the orchestrator listens
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OrchestratorEndpoint {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for OrchestratorEndpoint {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:7171/messages".to_string(),
            timeout_secs: 10,
        }
    }
}

impl OrchestratorEndpoint {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Single-page-app re-detection
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpaConfig {
    /// Wait after a navigation signal before re-detecting
    pub settle_delay_ms: u64,
}

impl Default for SpaConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 500,
        }
    }
}

/// Logging output
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives, overridden by `RUST_LOG`
    pub filter: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "media_connector=info".to_string(),
            json: false,
        }
    }
}

impl ConnectorConfig {
    /// Load from an optional TOML file, then `MEDIA_CONNECTOR__*` variables
    /// (e.g. `MEDIA_CONNECTOR__ORCHESTRATOR__URL`). Missing keys keep their defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!("Loading config from {}", path.display());
            builder = builder.add_source(File::from(path).required(false));
        }
        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Parse TOML text on its own
    pub fn from_toml(text: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.spa.settle_delay_ms)
    }

    /// Message client over HTTP to the configured orchestrator
    pub fn client(&self) -> Result<MessageClient> {
        let transport = HttpTransport::new(&self.orchestrator.url, self.orchestrator.timeout())?;
        Ok(MessageClient::new(transport))
    }

    /// Session for the page at `url`, `None` when the site is unsupported
    pub fn session_for(&self, url: &str, surface: Arc<Surface>) -> Result<Option<PageSession>> {
        let Some(adapter) = AdapterTable::standard().get(classify(url)) else {
            return Ok(None);
        };
        let session = PageSession::new(adapter, self.client()?, surface)
            .with_settle_delay(self.settle_delay());
        Ok(Some(session))
    }
}
