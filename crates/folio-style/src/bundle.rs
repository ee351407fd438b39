//! Stylesheet bundling: source stylesheets followed by generated utilities.

use std::fs;
use std::path::PathBuf;

use crate::engine::StyleEngine;
use crate::extract::{scan_dirs, StyleError};

/// Inputs for one compiled stylesheet.
#[derive(Debug, Clone, Default)]
pub struct StyleBundle {
    /// Hand-written stylesheets, concatenated in order
    pub sources: Vec<PathBuf>,

    /// Directories scanned for class candidates
    pub content_dirs: Vec<PathBuf>,
}

impl StyleBundle {
    /// Concatenate the sources and append utilities generated by `engine`.
    ///
    /// Missing sources are skipped with a warning.
    pub fn compile(&self, engine: &StyleEngine) -> Result<String, StyleError> {
        let mut css = String::new();

        for source in &self.sources {
            if !source.exists() {
                tracing::warn!("Stylesheet not found: {}", source.display());
                continue;
            }

            let content = fs::read_to_string(source).map_err(|e| StyleError::Read {
                path: source.clone(),
                source: e,
            })?;

            css.push_str(&format!("/* {} */\n", source.display()));
            css.push_str(content.trim_end());
            css.push('\n');
        }

        let candidates = scan_dirs(&self.content_dirs)?;
        css.push_str(&engine.generate(&candidates).css);

        Ok(css)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn concatenates_sources_before_utilities() {
        let temp = tempdir().unwrap();
        let styles = temp.path().join("styles");
        let content = temp.path().join("public");
        fs::create_dir_all(&styles).unwrap();
        fs::create_dir_all(&content).unwrap();

        fs::write(styles.join("vars.css"), ":root { --c-text: 0,0,0; }\n").unwrap();
        fs::write(content.join("index.html"), "<p class=\"o-elk\">hi</p>").unwrap();

        let bundle = StyleBundle {
            sources: vec![styles.join("vars.css"), styles.join("missing.css")],
            content_dirs: vec![content],
        };

        let css = bundle.compile(&StyleEngine::default()).unwrap();

        let vars = css.find("--c-text: 0,0,0").unwrap();
        let utility = css.find(".o-elk {").unwrap();
        assert!(vars < utility);
        assert!(!css.contains("missing.css"));
    }
}
