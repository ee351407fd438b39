//! Production server command.

use std::path::PathBuf;

use anyhow::Result;
use folio_server::{ContributionConfig, ExecutionMode, ServerConfig, SiteServer};

use crate::config::SiteConfig;

/// Run the serve command.
pub async fn run(site: SiteConfig, port: u16, dir: Option<PathBuf>) -> Result<()> {
    let dir = dir.unwrap_or_else(|| site.build.output.clone());

    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'folio build' first.",
            dir.display()
        );
    }

    let config = ServerConfig {
        mode: ExecutionMode::Production,
        root_dir: dir,
        port,
        host: site.dev_server.host.clone(),
        open: site.dev_server.open,
        contribution: ContributionConfig {
            mode: ExecutionMode::Production,
            api_base: site.contribution.api_base.clone(),
            fixture: None,
        },
        ..Default::default()
    };

    SiteServer::new(config, site.style_engine()).start().await?;

    Ok(())
}
