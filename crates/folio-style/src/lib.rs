//! Utility-CSS configuration and generator for folio sites.
//!
//! Holds the site's theme tokens, custom color rules, shortcuts and safelist,
//! and renders the subset of utilities they define into a stylesheet.

pub mod bundle;
pub mod color;
pub mod engine;
pub mod extract;
pub mod rules;
pub mod shortcuts;
pub mod theme;

pub use bundle::StyleBundle;
pub use color::{parse_color, ParsedColor};
pub use engine::{GeneratedCss, StyleEngine};
pub use extract::{extract_classes, scan_dirs, StyleError};
pub use rules::{match_rule, Declarations};
pub use shortcuts::Shortcut;
pub use theme::{StyleConfig, StyleExtension, Theme, ThemeColor};
