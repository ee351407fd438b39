//! Asset pipeline for the site stylesheet.

use folio_style::{StyleBundle, StyleEngine, StyleError};

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Compile the site stylesheet, minified when `minify` is set.
    ///
    /// A stylesheet lightningcss cannot parse is kept unminified.
    pub fn compile_css(
        bundle: &StyleBundle,
        engine: &StyleEngine,
        minify: bool,
    ) -> Result<String, StyleError> {
        let css = bundle.compile(engine)?;

        if !minify {
            return Ok(css);
        }

        match Self::minify_css(&css) {
            Ok(minified) => Ok(minified),
            Err(e) => {
                tracing::warn!("Skipping CSS minification: {}", e);
                Ok(css)
            }
        }
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}
