//! HTTP server for folio sites.
//!
//! Serves the contribution API and static files. In development mode it also
//! compiles the stylesheet on request and pushes live-reload messages over a
//! websocket when watched files change.

pub mod contribution;
pub mod server;
pub mod watcher;
pub mod websocket;

pub use contribution::{
    api_router, ContributionConfig, ContributionError, ContributionQuery, ContributionResponse,
    ContributionService, ExecutionMode, CONTRIBUTIONS_API, CONTRIBUTION_ROUTE,
};
pub use server::{ServerConfig, ServerError, SiteServer};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{HmrHub, HmrMessage};
