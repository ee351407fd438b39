//! Shortcut expansion.

use serde::{Deserialize, Serialize};

/// Maximum nesting depth followed when expanding shortcuts.
const MAX_DEPTH: usize = 16;

/// A named class standing for a space-separated list of utilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    /// Class name
    pub name: String,
    /// Space-separated utilities (may reference other shortcuts)
    pub expands: String,
}

impl Shortcut {
    /// Create a shortcut.
    pub fn new(name: impl Into<String>, expands: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expands: expands.into(),
        }
    }

    /// Utilities this shortcut lists directly.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.expands.split_whitespace()
    }
}

/// Expand `class` through `shortcuts` into leaf utilities.
///
/// Returns `None` if `class` is not a shortcut. Nested shortcuts are expanded
/// in place; a shortcut already on the expansion stack is dropped, so cycles
/// terminate.
pub fn expand(class: &str, shortcuts: &[Shortcut]) -> Option<Vec<String>> {
    let shortcut = find(class, shortcuts)?;
    let mut out = Vec::new();
    let mut stack = vec![shortcut.name.as_str()];
    expand_into(shortcut, shortcuts, &mut stack, &mut out);
    Some(out)
}

fn find<'a>(class: &str, shortcuts: &'a [Shortcut]) -> Option<&'a Shortcut> {
    // Later definitions win, matching how extensions are appended.
    shortcuts.iter().rev().find(|s| s.name == class)
}

fn expand_into<'a>(
    shortcut: &'a Shortcut,
    shortcuts: &'a [Shortcut],
    stack: &mut Vec<&'a str>,
    out: &mut Vec<String>,
) {
    for member in shortcut.members() {
        match find(member, shortcuts) {
            Some(nested) if stack.contains(&nested.name.as_str()) => {
                tracing::debug!("Shortcut cycle through '{}' ignored", nested.name);
            }
            Some(nested) if stack.len() < MAX_DEPTH => {
                stack.push(nested.name.as_str());
                expand_into(nested, shortcuts, stack, out);
                stack.pop();
            }
            Some(nested) => {
                tracing::debug!("Shortcut '{}' nested too deeply", nested.name);
            }
            None => {
                if !out.iter().any(|u| u == member) {
                    out.push(member.to_string());
                }
            }
        }
    }
}
