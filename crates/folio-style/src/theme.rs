//! Theme tokens and the style configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::shortcuts::Shortcut;

/// Declaration block: CSS property to value.
pub type Block = BTreeMap<String, String>;

/// A theme color: either a single value or a scale of named shades.
///
/// A scale may carry a `DEFAULT` shade used when the bare name is referenced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeColor {
    /// A single color value
    Single(String),
    /// Named shades, e.g. `level-0` .. `level-4`
    Scale(BTreeMap<String, String>),
}

/// Theme tokens referenced by rules and utilities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Color tokens by name
    pub colors: BTreeMap<String, ThemeColor>,

    /// Font family tokens, used by `font-<name>`
    pub font_family: BTreeMap<String, String>,

    /// Named animations, used by `animate-<name>`
    pub animation: BTreeMap<String, String>,

    /// Keyframe stops per animation name
    pub keyframes: BTreeMap<String, BTreeMap<String, Block>>,
}

impl Theme {
    /// Look up a color by key.
    ///
    /// `primary` resolves the `DEFAULT` shade of a scale, `primary-text` the
    /// `text` shade, `elk` a single color. Returns `None` for unknown keys.
    pub fn color(&self, key: &str) -> Option<&str> {
        if let Some(color) = self.colors.get(key) {
            return match color {
                ThemeColor::Single(value) => Some(value),
                ThemeColor::Scale(shades) => shades.get("DEFAULT").map(String::as_str),
            };
        }

        for (idx, _) in key.match_indices('-') {
            let (name, shade) = (&key[..idx], &key[idx + 1..]);
            if let Some(ThemeColor::Scale(shades)) = self.colors.get(name) {
                if let Some(value) = shades.get(shade) {
                    return Some(value);
                }
            }
        }

        None
    }
}

/// Complete style configuration consumed by [`crate::StyleEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Theme tokens
    pub theme: Theme,

    /// Shortcuts in declaration order
    pub shortcuts: Vec<Shortcut>,

    /// Classes generated whether or not content uses them
    pub safelist: Vec<String>,

    /// Typography extension blocks, scoped under `.prose`
    pub typography: BTreeMap<String, Block>,
}

/// Additions merged over the default [`StyleConfig`] (the `[style]` table of
/// `site.toml`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleExtension {
    /// Extra or replacement theme colors
    pub colors: BTreeMap<String, ThemeColor>,

    /// Extra or replacement font families
    pub font_family: BTreeMap<String, String>,

    /// Extra shortcuts; a name that already exists replaces the old entry
    pub shortcuts: Vec<Shortcut>,

    /// Extra safelisted classes
    pub safelist: Vec<String>,

    /// Extra typography blocks
    pub typography: BTreeMap<String, Block>,
}

impl StyleConfig {
    /// Merge an extension into this configuration.
    pub fn extend(&mut self, ext: StyleExtension) {
        self.theme.colors.extend(ext.colors);
        self.theme.font_family.extend(ext.font_family);
        self.typography.extend(ext.typography);

        for shortcut in ext.shortcuts {
            match self.shortcuts.iter_mut().find(|s| s.name == shortcut.name) {
                Some(existing) => *existing = shortcut,
                None => self.shortcuts.push(shortcut),
            }
        }

        for class in ext.safelist {
            if !self.safelist.contains(&class) {
                self.safelist.push(class);
            }
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            shortcuts: default_shortcuts(),
            safelist: default_safelist(),
            typography: default_typography(),
        }
    }
}

fn block(pairs: &[(&str, &str)]) -> Block {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn single(value: &str) -> ThemeColor {
    ThemeColor::Single(value.to_string())
}

fn scale(pairs: &[(&str, &str)]) -> ThemeColor {
    ThemeColor::Scale(block(pairs))
}

fn default_theme() -> Theme {
    let colors = [
        ("context", single("rgba(var(--c-context),%alpha)")),
        (
            "primary",
            scale(&[
                ("DEFAULT", "rgba(var(--c-text),%alpha)"),
                ("text", "rgba(var(--c-text),%alpha)"),
                ("bg", "rgba(var(--c-bg),%alpha)"),
            ]),
        ),
        (
            "level",
            scale(&[
                ("0", "var(--gc-level-0)"),
                ("1", "var(--gc-level-1)"),
                ("2", "var(--gc-level-2)"),
                ("3", "var(--gc-level-3)"),
                ("4", "var(--gc-level-4)"),
            ]),
        ),
        (
            "unocss",
            scale(&[
                ("DEFAULT", "#818181"),
                ("from", "#ccc"),
                ("via", "#858585"),
                ("to", "#4d4d4d"),
            ]),
        ),
        ("elk", single("#c18139")),
        ("onuui", scale(&[("from", "#acc1ee"), ("to", "#c084fc")])),
        ("unpreset", scale(&[("from", "#ff5c5c"), ("to", "#dbe74f")])),
        ("vite", scale(&[("from", "#41d1ff"), ("to", "#bd34fe")])),
        ("vue", single("#64b687")),
        ("nuxt", single("#64d98a")),
        ("bilibili", single("#ed7099")),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    let keyframes = BTreeMap::from([(
        "shape".to_string(),
        BTreeMap::from([
            (
                "0%,100%".to_string(),
                block(&[
                    ("border-radius", "42% 58% 70% 30% / 45% 45% 55% 55%"),
                    ("transform", "translate3d(0,0,0) rotateZ(0.01deg)"),
                ]),
            ),
            (
                "34%".to_string(),
                block(&[
                    ("border-radius", "70% 30% 46% 54% / 30% 29% 71% 70%"),
                    ("transform", "translate3d(0,5px,0) rotateZ(0.01deg)"),
                ]),
            ),
            (
                "50%".to_string(),
                block(&[("transform", "translate3d(0,0,0) rotateZ(0.01deg)")]),
            ),
            (
                "67%".to_string(),
                block(&[
                    ("border-radius", "100% 60% 60% 100% / 100% 100% 60% 60%"),
                    ("transform", "translate3d(0,-3px,0) rotateZ(0.01deg)"),
                ]),
            ),
        ]),
    )]);

    Theme {
        colors,
        font_family: block(&[("dank", "dank")]),
        animation: block(&[("shape", "shape 5s linear infinite")]),
        keyframes,
    }
}

fn default_shortcuts() -> Vec<Shortcut> {
    [
        ("text", "text-primary-text"),
        ("bg", "bg-primary-bg"),
        ("linear-text", "text-transparent bg-clip-text bg-gradient-to-r"),
        ("text-p-r", "linear-text from-purple to-red"),
        (
            "icon",
            "w-5.5 h-5.5 cursor-pointer select-none transition-opacity-300 ease-in-out text",
        ),
        (
            "icon-btn",
            "icon color-inherit op64 hover-op100 hover-color-teal-500 dark-hover-color-inherit",
        ),
        (
            "icon-link",
            "icon color-inherit op64 hover:op100 hover-text-red-300 dark-hover-color-inherit",
        ),
        (
            "icon-text",
            "color-inherit op64 hover:op100 hover-text-purple dark-hover-color-inherit",
        ),
        ("linkWithIcon", "trans c-context"),
        (
            "header-anchor",
            "float-left mt-[0.125em] ml-[-0.8em] pr-[0.2em] text-[0.85em] op-0 group-hover-op-60 fw-600",
        ),
    ]
    .into_iter()
    .map(|(name, expands)| Shortcut::new(name, expands))
    .collect()
}

fn default_safelist() -> Vec<String> {
    (0..5)
        .map(|i| format!("fill-level-{}", i))
        .chain(["sm-fsc", "max-w-75"].into_iter().map(String::from))
        .collect()
}

fn default_typography() -> BTreeMap<String, Block> {
    BTreeMap::from([
        (
            "a".to_string(),
            block(&[
                ("display", "inline-block"),
                ("line-height", "1.5"),
                ("border-bottom", "1px dashed rgba(var(--c-context), 0.5)"),
                ("text-decoration", "none"),
                ("transition", "all 0.3s ease-in-out"),
            ]),
        ),
        (
            "a:hover".to_string(),
            block(&[("border-bottom", "1px solid rgba(var(--c-context), 1)")]),
        ),
        (
            "pre".to_string(),
            block(&[("background", "#eee !important"), ("font-family", "dm")]),
        ),
        (
            ".dark pre".to_string(),
            block(&[("background", "#222 !important")]),
        ),
        (
            "blockquote".to_string(),
            block(&[("border-left", "0.1em solid rgba(168,85,247,.4)")]),
        ),
    ])
}
