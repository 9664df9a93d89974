//! Page-integration engine that reports personal media server availability
//! on third-party media sites.
//!
//! A page is classified, its media detected by the site's adapter, the
//! orchestrator asked about each detected title, and the answer rendered as
//! an injected status element on a [`Surface`](connector::Surface).

pub mod config;
pub mod connector;
pub mod telemetry;

pub use crate::config::{ConnectorConfig, LogConfig, OrchestratorEndpoint, SpaConfig};
pub use crate::connector::{
    ConnectorError, MessageClient, PageSession, PageSource, Result, Surface, on_page_load,
};
