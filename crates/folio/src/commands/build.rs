//! Static site build command.

use std::path::PathBuf;

use anyhow::Result;
use folio_static::{BuildConfig, StaticBuilder};

use crate::config::SiteConfig;

/// Run the build command.
pub fn run(site: SiteConfig, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building {}...", site.site.title);

    let config = BuildConfig {
        public_dir: site.site.public_dir.clone(),
        output_dir: output.unwrap_or_else(|| site.build.output.clone()),
        styles: site.style_bundle(),
        minify: minify.unwrap_or(site.build.minify),
        modules: site.site.modules.clone(),
    };

    let result = StaticBuilder::new(config, site.style_engine()).build()?;

    tracing::info!(
        "Copied {} files and wrote {} bytes of CSS in {}ms",
        result.files,
        result.css_bytes,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
