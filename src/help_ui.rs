//! Keyboard shortcuts reference shown by the help overlay.
//!
//! The table is static for a given registry: combos first, then the built-in
//! help keys, then sequences under "Navigation".

use nextmic_keybindings::{Binding, ParsedKey, ShortcutCommand, ShortcutRegistry};
use std::fmt::Write as _;

/// One line of the reference: key combination → description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutRow {
    pub keys: String,
    pub description: &'static str,
}

/// A titled group of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpSection {
    pub title: &'static str,
    pub rows: Vec<ShortcutRow>,
}

/// Build the shortcut reference for `registry`.
pub fn shortcut_table(registry: &ShortcutRegistry) -> Vec<HelpSection> {
    let mut general = Vec::new();
    let mut navigation = Vec::new();

    for (binding, command) in registry.bindings() {
        let row = ShortcutRow {
            keys: binding.to_string(),
            description: command.description(),
        };
        match binding {
            Binding::Combo(_) => general.push(row),
            Binding::Sequence { .. } => navigation.push(row),
        }
    }

    for (key, command) in [
        (ParsedKey::SHOW_HELP, ShortcutCommand::ShowHelp),
        (ParsedKey::DISMISS_HELP, ShortcutCommand::DismissHelp),
    ] {
        general.push(ShortcutRow {
            keys: key.to_string(),
            description: command.description(),
        });
    }

    let mut sections = vec![HelpSection {
        title: "General",
        rows: general,
    }];
    if !navigation.is_empty() {
        sections.push(HelpSection {
            title: "Navigation",
            rows: navigation,
        });
    }
    sections
}

/// Plain-text rendering with the key column padded to a common width.
pub fn render_text(sections: &[HelpSection]) -> String {
    let width = sections
        .iter()
        .flat_map(|s| s.rows.iter())
        .map(|r| r.keys.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", section.title);
        for row in &section.rows {
            let _ = writeln!(out, "  {:<width$}  {}", row.keys, row.description);
        }
    }
    out
}
