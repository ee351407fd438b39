//! Production site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use folio_style::{StyleBundle, StyleEngine};

use crate::assets::AssetPipeline;

/// Configuration for a production build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Public assets copied verbatim
    pub public_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Stylesheet inputs
    pub styles: StyleBundle,

    /// Minify the compiled stylesheet
    pub minify: bool,

    /// Site modules recorded in the build metadata
    pub modules: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            public_dir: PathBuf::from("public"),
            output_dir: PathBuf::from("dist"),
            styles: StyleBundle::default(),
            minify: true,
            modules: vec![],
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of public files copied
    pub files: usize,

    /// Size of the compiled stylesheet in bytes
    pub css_bytes: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Metadata written to `build-info.json`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    /// RFC 3339 build timestamp
    pub build_time: String,

    /// Always false for production builds
    pub dev: bool,

    /// Site modules
    pub modules: Vec<String>,

    /// Builder version
    pub version: String,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to compile stylesheet: {0}")]
    StyleError(#[from] folio_style::StyleError),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Production site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    engine: StyleEngine,
}

impl StaticBuilder {
    /// Create a new builder.
    pub fn new(config: BuildConfig, engine: StyleEngine) -> Self {
        Self { config, engine }
    }

    /// Build the site.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let files = self.copy_public()?;
        let css_bytes = self.generate_assets()?;
        self.write_build_info()?;

        Ok(BuildResult {
            files,
            css_bytes,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Copy the public directory into the output directory.
    fn copy_public(&self) -> Result<usize, BuildError> {
        let public_dir = &self.config.public_dir;

        if !public_dir.exists() {
            tracing::warn!("Public directory not found: {}", public_dir.display());
            return Ok(0);
        }

        let files: Vec<PathBuf> = WalkDir::new(public_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect();

        files
            .par_iter()
            .try_for_each(|source| self.copy_file(source))?;

        tracing::debug!("Copied {} public files", files.len());

        Ok(files.len())
    }

    fn copy_file(&self, source: &Path) -> Result<(), BuildError> {
        let relative = source
            .strip_prefix(&self.config.public_dir)
            .unwrap_or(source);
        let target = self.config.output_dir.join(relative);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }

        fs::copy(source, &target).map_err(|e| BuildError::ReadError {
            path: source.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(())
    }

    /// Write the compiled stylesheet. Returns its size.
    fn generate_assets(&self) -> Result<usize, BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let css =
            AssetPipeline::compile_css(&self.config.styles, &self.engine, self.config.minify)?;

        fs::write(assets_dir.join("main.css"), &css)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(css.len())
    }

    /// Write `build-info.json`.
    fn write_build_info(&self) -> Result<(), BuildError> {
        let info = BuildInfo {
            build_time: chrono::Utc::now().to_rfc3339(),
            dev: false,
            modules: self.config.modules.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        };

        let json = serde_json::to_string_pretty(&info)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(self.config.output_dir.join("build-info.json"), json)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn builds_simple_site() {
        let temp = tempdir().unwrap();
        let public = temp.path().join("public");
        let out = temp.path().join("dist");

        fs::create_dir_all(public.join("logos")).unwrap();
        fs::write(public.join("index.html"), "<p class=\"o-elk\">Hi</p>").unwrap();
        fs::write(public.join("logos/vue.svg"), "<svg/>").unwrap();

        let config = BuildConfig {
            public_dir: public.clone(),
            output_dir: out.clone(),
            styles: StyleBundle {
                sources: vec![],
                content_dirs: vec![public],
            },
            minify: false,
            modules: vec!["@nuxt/content".to_string()],
        };

        let result = StaticBuilder::new(config, StyleEngine::default())
            .build()
            .unwrap();

        assert_eq!(result.files, 2);
        assert!(out.join("index.html").exists());
        assert_eq!(
            fs::read_to_string(out.join("logos/vue.svg")).unwrap(),
            "<svg/>"
        );

        let css = fs::read_to_string(out.join("assets/main.css")).unwrap();
        assert_eq!(css.len(), result.css_bytes);
        assert!(css.contains(".o-elk {\n  --c-context: 193,129,57;\n}"));
    }

    #[test]
    fn writes_build_info() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");

        let builder = StaticBuilder::new(
            BuildConfig {
                public_dir: temp.path().join("missing"),
                output_dir: out.clone(),
                modules: vec!["@unocss/nuxt".to_string()],
                ..Default::default()
            },
            StyleEngine::default(),
        );

        let result = builder.build().unwrap();
        assert_eq!(result.files, 0);

        let info: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("build-info.json")).unwrap())
                .unwrap();

        assert_eq!(info["dev"], false);
        assert_eq!(info["modules"][0], "@unocss/nuxt");
        assert!(chrono::DateTime::parse_from_rfc3339(info["buildTime"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn missing_stylesheets_do_not_fail_the_build() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");

        let builder = StaticBuilder::new(
            BuildConfig {
                public_dir: temp.path().join("public"),
                output_dir: out.clone(),
                styles: StyleBundle {
                    sources: vec![temp.path().join("styles/fonts.css")],
                    content_dirs: vec![],
                },
                ..Default::default()
            },
            StyleEngine::default(),
        );

        builder.build().unwrap();
        assert!(out.join("assets/main.css").exists());
    }
}
