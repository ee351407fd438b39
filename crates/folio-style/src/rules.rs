//! Custom utility rules.

use crate::color::parse_color;
use crate::theme::Theme;

/// Ordered CSS declarations produced by a rule.
pub type Declarations = Vec<(String, String)>;

/// Utility prefixes that take a theme color, and the property they set.
const COLOR_PROPERTIES: &[(&str, &str)] = &[
    ("text", "color"),
    ("c", "color"),
    ("color", "color"),
    ("bg", "background-color"),
    ("fill", "fill"),
    ("border", "border-color"),
];

/// Match `class` against the custom rules, in priority order:
///
/// 1. `o-<color>` sets `--c-context`
/// 2. `<name>::<value>` sets `--<name>`
/// 3. `font-<family>`, `animate-<name>` from theme tokens
/// 4. `<prefix>-<theme color>` color utilities
pub fn match_rule(class: &str, theme: &Theme) -> Option<Declarations> {
    if let Some(decls) = context_color(class, theme) {
        return Some(decls);
    }

    if let Some(decls) = custom_property(class, theme) {
        return Some(decls);
    }

    if let Some(name) = class.strip_prefix("font-") {
        if let Some(family) = theme.font_family.get(name) {
            return Some(vec![("font-family".to_string(), family.clone())]);
        }
    }

    if let Some(name) = class.strip_prefix("animate-") {
        if let Some(animation) = theme.animation.get(name) {
            return Some(vec![("animation".to_string(), animation.clone())]);
        }
    }

    color_utility(class, theme)
}

fn context_color(class: &str, theme: &Theme) -> Option<Declarations> {
    let body = class.strip_prefix("o-")?;
    let color = parse_color(body, theme)?;
    let value = color.components().unwrap_or(color.color);
    Some(vec![("--c-context".to_string(), value)])
}

fn custom_property(class: &str, theme: &Theme) -> Option<Declarations> {
    let (name, value) = class.split_once("::")?;
    if name.is_empty() || value.is_empty() {
        return None;
    }

    let valid_name = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid_name || !balanced(value) {
        return None;
    }

    let value = parse_color(value, theme)
        .and_then(|c| c.components())
        .unwrap_or_else(|| value.to_string());

    Some(vec![(format!("--{}", name), value)])
}

/// Brackets in a custom property value must nest properly.
fn balanced(value: &str) -> bool {
    let mut open = Vec::new();
    for c in value.chars() {
        match c {
            '(' | '[' => open.push(c),
            ')' if open.pop() != Some('(') => return false,
            ']' if open.pop() != Some('[') => return false,
            _ => {}
        }
    }
    open.is_empty()
}

fn color_utility(class: &str, theme: &Theme) -> Option<Declarations> {
    COLOR_PROPERTIES.iter().find_map(|(prefix, property)| {
        let key = class.strip_prefix(prefix)?.strip_prefix('-')?;
        let value = theme.color(key)?;
        Some(vec![(property.to_string(), value.replace("%alpha", "1"))])
    })
}
