//! Scaffold a new site.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing folio site...");

    write_scaffold(Path::new("."), config_path, yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'folio dev' to start the development server.");

    Ok(())
}

/// Write the default files under `root`. Existing files are kept unless
/// `overwrite` is set.
fn write_scaffold(root: &Path, config_path: &Path, overwrite: bool) -> Result<()> {
    let files = [
        (root.join(config_path), DEFAULT_CONFIG),
        (root.join("styles/main.css"), DEFAULT_STYLES),
        (root.join("public/index.html"), DEFAULT_INDEX),
    ];

    for (path, content) in files {
        if path.exists() && !overwrite {
            tracing::warn!("{} already exists. Use --yes to overwrite.", path.display());
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created {}", path.display());
    }

    let content_dir = root.join("content");
    if !content_dir.exists() {
        fs::create_dir_all(&content_dir).context("Failed to create content directory")?;
    }

    Ok(())
}

const DEFAULT_CONFIG: &str = r##"# Folio configuration

[site]
title = "folio"
modules = ["@vueuse/nuxt", "@unocss/nuxt", "@nuxt/content", "@nuxtjs/color-mode"]
public_dir = "public"
content_dirs = ["public", "content"]
styles = ["styles/fonts.css", "styles/main.css", "styles/vars.css"]

[dev_server]
port = 1111
host = "127.0.0.1"
open = true

[build]
output = "dist"
minify = true

[contribution]
api_base = "https://github-contributions-api.jogruber.de/v4"
# fixture = "mock/contributions.json"

[style]
# safelist = ["o-brand"]
#
# [style.colors]
# brand = "#64b687"
"##;

const DEFAULT_STYLES: &str = r#":root {
  --c-bg: 255,255,255;
  --c-text: 0,0,0;
  --gc-level-0: #ebedf0;
  --gc-level-1: #9be9a8;
  --gc-level-2: #40c463;
  --gc-level-3: #30a14e;
  --gc-level-4: #216e39;
}

.dark {
  --c-bg: 5,5,5;
  --c-text: 255,255,255;
  --gc-level-0: #161b22;
  --gc-level-1: #0e4429;
  --gc-level-2: #006d32;
  --gc-level-3: #26a641;
  --gc-level-4: #39d353;
}

body {
  margin: 0;
  background: rgb(var(--c-bg));
  color: rgb(var(--c-text));
}
"#;

const DEFAULT_INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>folio</title>
  <link rel="stylesheet" href="/assets/main.css">
</head>
<body>
  <main class="prose">
    <h1 class="o-primary">Hello</h1>
    <svg id="contributions" class="fill-level-0"></svg>
  </main>
  <script>
    fetch('/api/contribution?name=octocat&year=2022')
      .then((res) => res.json())
      .then((data) => {
        const total = Object.values(data.total || {})[0] || 0
        document.getElementById('contributions').dataset.total = total
      })
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use tempfile::tempdir;

    #[test]
    fn writes_default_files() {
        let temp = tempdir().unwrap();
        write_scaffold(temp.path(), Path::new("site.toml"), false).unwrap();

        assert!(temp.path().join("styles/main.css").exists());
        assert!(temp.path().join("public/index.html").exists());
        assert!(temp.path().join("content").is_dir());

        let config = load_config(&temp.path().join("site.toml")).unwrap();
        assert_eq!(config.dev_server.port, 1111);
        assert_eq!(config.site.styles.len(), 3);
    }

    #[test]
    fn keeps_existing_files_without_overwrite() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("public")).unwrap();
        fs::write(temp.path().join("public/index.html"), "mine").unwrap();

        write_scaffold(temp.path(), Path::new("site.toml"), false).unwrap();
        assert_eq!(
            fs::read_to_string(temp.path().join("public/index.html")).unwrap(),
            "mine"
        );

        write_scaffold(temp.path(), Path::new("site.toml"), true).unwrap();
        assert_eq!(
            fs::read_to_string(temp.path().join("public/index.html")).unwrap(),
            DEFAULT_INDEX
        );
    }
}
