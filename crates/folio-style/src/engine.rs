//! Stylesheet generation.

use std::collections::BTreeSet;

use crate::rules::{match_rule, Declarations};
use crate::shortcuts;
use crate::theme::{Block, StyleConfig};

/// Output of [`StyleEngine::generate`].
#[derive(Debug, Clone, Default)]
pub struct GeneratedCss {
    /// The stylesheet
    pub css: String,

    /// Classes that produced a rule, sorted
    pub classes: Vec<String>,
}

/// Resolves classes against a [`StyleConfig`] and renders CSS.
#[derive(Debug, Clone, Default)]
pub struct StyleEngine {
    config: StyleConfig,
}

impl StyleEngine {
    /// Create an engine for `config`.
    pub fn new(config: StyleConfig) -> Self {
        Self { config }
    }

    /// The configuration this engine renders.
    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    /// Resolve a single class to declarations.
    ///
    /// Shortcuts merge the declarations of every member that resolves; a
    /// later member overrides an earlier one setting the same property.
    pub fn resolve(&self, class: &str) -> Option<Declarations> {
        let theme = &self.config.theme;

        let Some(members) = shortcuts::expand(class, &self.config.shortcuts) else {
            return match_rule(class, theme);
        };

        let mut merged: Declarations = Vec::new();
        for member in &members {
            let Some(decls) = match_rule(member, theme) else {
                tracing::trace!("Shortcut '{}': '{}' left to the preset", class, member);
                continue;
            };
            for (property, value) in decls {
                merged.retain(|(p, _)| *p != property);
                merged.push((property, value));
            }
        }

        (!merged.is_empty()).then_some(merged)
    }

    /// Render CSS for `candidates` plus the safelist.
    pub fn generate<I, S>(&self, candidates: I) -> GeneratedCss
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut all: BTreeSet<String> = candidates
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .collect();
        all.extend(self.config.safelist.iter().cloned());

        let mut css = String::from("/* folio utilities */\n");

        for (selector, block) in &self.config.typography {
            write_rule(&mut css, &prose_selector(selector), block_decls(block));
        }

        let used_animations: Vec<&String> = self
            .config
            .theme
            .keyframes
            .keys()
            .filter(|name| all.contains(&format!("animate-{}", name)))
            .collect();

        for name in used_animations {
            css.push_str(&format!("@keyframes {} {{\n", name));
            for (stop, block) in &self.config.theme.keyframes[name] {
                css.push_str(&format!("  {} {{\n", stop));
                for (property, value) in block {
                    css.push_str(&format!("    {}: {};\n", property, value));
                }
                css.push_str("  }\n");
            }
            css.push_str("}\n");
        }

        let mut classes = Vec::new();
        for class in &all {
            if let Some(decls) = self.resolve(class) {
                write_rule(
                    &mut css,
                    &format!(".{}", escape_selector(class)),
                    decls.iter().map(|(p, v)| (p.as_str(), v.as_str())),
                );
                classes.push(class.clone());
            }
        }

        tracing::debug!("Generated {} utility rules", classes.len());

        GeneratedCss { css, classes }
    }
}

fn block_decls(block: &Block) -> impl Iterator<Item = (&str, &str)> + '_ {
    block.iter().map(|(p, v)| (p.as_str(), v.as_str()))
}

fn write_rule<'a>(
    css: &mut String,
    selector: &str,
    decls: impl Iterator<Item = (&'a str, &'a str)>,
) {
    css.push_str(selector);
    css.push_str(" {\n");
    for (property, value) in decls {
        css.push_str(&format!("  {}: {};\n", property, value));
    }
    css.push_str("}\n");
}

/// Scope a typography selector under `.prose`, keeping a leading `.dark`.
fn prose_selector(selector: &str) -> String {
    match selector.strip_prefix(".dark ") {
        Some(rest) => format!(".dark .prose {}", rest),
        None => format!(".prose {}", selector),
    }
}

/// Escape a class name for use in a CSS selector.
///
/// A digit that would start the identifier (first char, or second after a
/// leading `-`) is written as a hex code point.
pub fn escape_selector(class: &str) -> String {
    let mut out = String::with_capacity(class.len() + 4);
    let leading_dash = class.starts_with('-');

    for (i, c) in class.chars().enumerate() {
        let starts_ident = i == 0 || (i == 1 && leading_dash);

        if starts_ident && c.is_ascii_digit() {
            out.push_str(&format!("\\{:x} ", c as u32));
        } else if class == "-" {
            out.push_str("\\-");
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn engine() -> StyleEngine {
        StyleEngine::new(StyleConfig::default())
    }

    #[test]
    fn escapes_selectors() {
        assert_eq!(escape_selector("o-#ff0000"), "o-\\#ff0000");
        assert_eq!(escape_selector("bar::1.5rem"), "bar\\:\\:1\\.5rem");
        assert_eq!(escape_selector("mt-[0.125em]"), "mt-\\[0\\.125em\\]");
        assert_eq!(escape_selector("fill-level-0"), "fill-level-0");
    }

    #[test]
    fn escapes_leading_digits() {
        assert_eq!(escape_selector("2::b"), "\\32 \\:\\:b");
        assert_eq!(escape_selector("-2x"), "-\\32 x");
        assert_eq!(escape_selector("-"), "\\-");
        assert_eq!(escape_selector("w-2"), "w-2");
    }

    #[test]
    fn resolves_shortcuts_through_rules() {
        let engine = engine();

        assert_eq!(
            engine.resolve("icon"),
            Some(vec![(
                "color".to_string(),
                "rgba(var(--c-text),1)".to_string()
            )])
        );
        assert_eq!(
            engine.resolve("linkWithIcon"),
            Some(vec![(
                "color".to_string(),
                "rgba(var(--c-context),1)".to_string()
            )])
        );
        assert_eq!(engine.resolve("header-anchor"), None);
    }

    #[test]
    fn later_shortcut_members_override() {
        let mut config = StyleConfig::default();
        config
            .shortcuts
            .push(shortcuts::Shortcut::new("duo", "text-elk text-vue"));
        let engine = StyleEngine::new(config);

        assert_eq!(
            engine.resolve("duo"),
            Some(vec![("color".to_string(), "#64b687".to_string())])
        );
    }

    #[test]
    fn generates_rules_for_used_and_safelisted_classes() {
        let out = engine().generate(["o-#ff0000", "unknown-class", "bar::12px"]);

        assert!(out.css.contains(".o-\\#ff0000 {\n  --c-context: 255,0,0;\n}\n"));
        assert!(out.css.contains(".bar\\:\\:12px {\n  --bar: 12px;\n}\n"));
        assert!(out.css.contains(".fill-level-4 {\n  fill: var(--gc-level-4);\n}\n"));
        assert!(!out.css.contains("unknown-class"));
        assert!(out.classes.contains(&"fill-level-0".to_string()));
        assert!(!out.classes.contains(&"sm-fsc".to_string()));
    }

    #[test]
    fn scopes_typography_under_prose() {
        let out = engine().generate(Vec::<String>::new());

        assert!(out.css.contains(".prose a:hover {\n"));
        assert!(out.css.contains(".dark .prose pre {\n  background: #222 !important;\n}\n"));
    }

    #[test]
    fn emits_keyframes_only_when_animation_used() {
        let without = engine().generate(["o-elk"]);
        assert!(!without.css.contains("@keyframes"));

        let with = engine().generate(["animate-shape"]);
        assert!(with.css.contains("@keyframes shape {\n  0%,100% {\n"));
        assert!(with
            .css
            .contains(".animate-shape {\n  animation: shape 5s linear infinite;\n}\n"));
    }

    #[test]
    fn output_is_deterministic() {
        let a = engine().generate(["o-vue", "o-elk", "text"]);
        let b = engine().generate(["text", "o-elk", "o-vue"]);
        assert_eq!(a.css, b.css);
    }
}
