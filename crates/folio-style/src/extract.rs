//! Class candidate extraction from content files.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

/// File extensions scanned for class candidates.
const CONTENT_EXTENSIONS: &[&str] = &["html", "vue", "md", "mdx", "js", "ts"];

/// Longest token considered a class candidate.
const MAX_TOKEN_LEN: usize = 200;

/// Errors that can occur while scanning content.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Split `source` into class candidates.
///
/// Every whitespace/quote-delimited token is a candidate; the engine
/// discards what it cannot resolve.
pub fn extract_classes(source: &str) -> BTreeSet<String> {
    static RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"[^\s"'`<>={};]+"#).expect("Invalid token regex"));

    RE
        .find_iter(source)
        .map(|m| m.as_str())
        .filter(|t| t.len() <= MAX_TOKEN_LEN && t.chars().any(|c| c.is_ascii_alphabetic()))
        .map(String::from)
        .collect()
}

/// Scan content directories for class candidates.
///
/// Missing directories are skipped.
pub fn scan_dirs(dirs: &[PathBuf]) -> Result<BTreeSet<String>, StyleError> {
    let mut classes = BTreeSet::new();

    for dir in dirs {
        if !dir.exists() {
            tracing::debug!("Content directory not found: {}", dir.display());
            continue;
        }

        for entry in WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_content_file(path) {
                continue;
            }

            let source = fs::read_to_string(path).map_err(|source| StyleError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            classes.extend(extract_classes(&source));
        }
    }

    Ok(classes)
}

fn is_content_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| CONTENT_EXTENSIONS.contains(&ext))
}
