//! Development server command.

use anyhow::Result;
use folio_server::{ContributionConfig, ExecutionMode, ServerConfig, SiteServer};

use crate::config::SiteConfig;

/// Run the dev server.
pub async fn run(site: SiteConfig, port: Option<u16>, open: bool) -> Result<()> {
    let port = port.unwrap_or(site.dev_server.port);
    tracing::info!("Starting development server on port {}", port);

    let config = ServerConfig {
        mode: ExecutionMode::Development,
        root_dir: site.site.public_dir.clone(),
        port,
        host: site.dev_server.host.clone(),
        open: open && site.dev_server.open,
        contribution: ContributionConfig {
            mode: ExecutionMode::Development,
            api_base: site.contribution.api_base.clone(),
            fixture: site.contribution.fixture.clone(),
        },
        styles: site.style_bundle(),
        watch_paths: Vec::new(),
    };

    SiteServer::new(config, site.style_engine()).start().await?;

    Ok(())
}
