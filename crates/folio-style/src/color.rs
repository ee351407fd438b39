//! Color parsing for rule bodies.

use crate::theme::Theme;

/// A color resolved from a rule body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedColor {
    /// CSS color string, with theme `%alpha` placeholders filled in
    pub color: String,

    /// Channels if the color is a plain rgb color
    pub rgb: Option<[u8; 3]>,
}

impl ParsedColor {
    /// Channels joined as `r,g,b`, for use inside `rgba(var(--x), a)`.
    pub fn components(&self) -> Option<String> {
        self.rgb.map(|[r, g, b]| format!("{},{},{}", r, g, b))
    }
}

/// Parse `body` as a color.
///
/// Accepts hex (`#rgb`, `#rrggbb`, `#rrggbbaa`, also written `hex-...`),
/// `rgb()`/`rgba()`, bracketed arbitrary values and theme color keys.
pub fn parse_color(body: &str, theme: &Theme) -> Option<ParsedColor> {
    let body = body
        .strip_prefix('[')
        .and_then(|b| b.strip_suffix(']'))
        .unwrap_or(body);

    if body.is_empty() {
        return None;
    }

    if let Some(hex) = body.strip_prefix('#').or_else(|| body.strip_prefix("hex-")) {
        let rgb = parse_hex(hex)?;
        return Some(ParsedColor {
            color: format!("#{}", hex),
            rgb: Some(rgb),
        });
    }

    if let Some(rgb) = parse_rgb_function(body) {
        return Some(ParsedColor {
            color: body.to_string(),
            rgb: Some(rgb),
        });
    }

    let value = theme.color(body)?;
    let rgb = value
        .strip_prefix('#')
        .and_then(parse_hex)
        .or_else(|| parse_rgb_function(value));

    Some(ParsedColor {
        color: value.replace("%alpha", "1"),
        rgb,
    })
}

fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    match hex.len() {
        3 | 4 => {
            let mut out = [0u8; 3];
            for (i, c) in hex.chars().take(3).enumerate() {
                out[i] = channel(&c.to_string())? * 17;
            }
            Some(out)
        }
        6 | 8 => Some([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        ]),
        _ => None,
    }
}

fn parse_rgb_function(value: &str) -> Option<[u8; 3]> {
    let inner = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))?
        .strip_suffix(')')?;

    let parts: Vec<&str> = inner
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();

    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let mut out = [0u8; 3];
    for (i, part) in parts.iter().take(3).enumerate() {
        out[i] = part.parse().ok()?;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::StyleConfig;

    fn theme() -> Theme {
        StyleConfig::default().theme
    }

    #[test]
    fn parses_hex_forms() {
        let theme = theme();

        let c = parse_color("#ff0000", &theme).unwrap();
        assert_eq!(c.components().as_deref(), Some("255,0,0"));

        let c = parse_color("hex-0f0", &theme).unwrap();
        assert_eq!(c.color, "#0f0");
        assert_eq!(c.rgb, Some([0, 255, 0]));

        let c = parse_color("[#00000080]", &theme).unwrap();
        assert_eq!(c.rgb, Some([0, 0, 0]));

        assert!(parse_color("#12345", &theme).is_none());
        assert!(parse_color("#zzzzzz", &theme).is_none());
    }

    #[test]
    fn parses_rgb_functions() {
        let theme = theme();

        let c = parse_color("rgb(1,2,3)", &theme).unwrap();
        assert_eq!(c.rgb, Some([1, 2, 3]));

        let c = parse_color("rgba(10, 20, 30, 0.5)", &theme).unwrap();
        assert_eq!(c.rgb, Some([10, 20, 30]));

        assert!(parse_color("rgb(var(--x))", &theme).is_none());
    }

    #[test]
    fn resolves_theme_colors() {
        let theme = theme();

        let c = parse_color("elk", &theme).unwrap();
        assert_eq!(c.components().as_deref(), Some("193,129,57"));

        let c = parse_color("primary", &theme).unwrap();
        assert_eq!(c.color, "rgba(var(--c-text),1)");
        assert!(c.rgb.is_none());

        let c = parse_color("level-2", &theme).unwrap();
        assert_eq!(c.color, "var(--gc-level-2)");

        assert!(parse_color("not-a-color", &theme).is_none());
        assert!(parse_color("", &theme).is_none());
    }
}
