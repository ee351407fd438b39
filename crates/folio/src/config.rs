//! `site.toml` loading.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use folio_server::CONTRIBUTIONS_API;
use folio_style::{StyleBundle, StyleConfig, StyleEngine, StyleExtension};

/// Configuration file structure (site.toml).
#[derive(Debug, Deserialize, Default)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: SiteSettings,
    #[serde(default)]
    pub dev_server: DevServerSettings,
    #[serde(default)]
    pub build: BuildSettings,
    #[serde(default)]
    pub contribution: ContributionSettings,
    #[serde(default)]
    pub style: StyleExtension,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub title: String,
    /// Site modules, recorded in build metadata
    pub modules: Vec<String>,
    pub public_dir: PathBuf,
    /// Directories scanned for utility classes
    pub content_dirs: Vec<PathBuf>,
    /// Stylesheets concatenated ahead of the generated utilities
    pub styles: Vec<PathBuf>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: "folio".to_string(),
            modules: [
                "@vueuse/nuxt",
                "@unocss/nuxt",
                "@nuxt/content",
                "@nuxtjs/color-mode",
            ]
            .iter()
            .map(|m| m.to_string())
            .collect(),
            public_dir: PathBuf::from("public"),
            content_dirs: vec![PathBuf::from("public"), PathBuf::from("content")],
            styles: vec![
                PathBuf::from("styles/fonts.css"),
                PathBuf::from("styles/main.css"),
                PathBuf::from("styles/vars.css"),
            ],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DevServerSettings {
    pub port: u16,
    pub host: String,
    pub open: bool,
}

impl Default for DevServerSettings {
    fn default() -> Self {
        Self {
            port: 1111,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    pub output: PathBuf,
    pub minify: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            output: PathBuf::from("dist"),
            minify: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ContributionSettings {
    pub api_base: String,
    /// Replaces the bundled development fixture
    pub fixture: Option<PathBuf>,
}

impl Default for ContributionSettings {
    fn default() -> Self {
        Self {
            api_base: CONTRIBUTIONS_API.to_string(),
            fixture: None,
        }
    }
}

impl SiteConfig {
    /// Style engine with the `[style]` table merged over the defaults.
    pub fn style_engine(&self) -> StyleEngine {
        let mut config = StyleConfig::default();
        config.extend(self.style.clone());
        StyleEngine::new(config)
    }

    /// Stylesheet inputs for the site.
    pub fn style_bundle(&self) -> StyleBundle {
        StyleBundle {
            sources: self.site.styles.clone(),
            content_dirs: self.site.content_dirs.clone(),
        }
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<SiteConfig> {
    if !path.exists() {
        tracing::debug!("{} not found, using defaults", path.display());
        return Ok(SiteConfig::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: SiteConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}
