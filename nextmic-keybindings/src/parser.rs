//! Shortcut binding parser.
//!
//! Parses human-readable binding strings into [`Binding`] values:
//!
//! - Modifier combos: `"CmdOrCtrl+K"`, `"Ctrl+/"`
//! - Two-key sequences: `"G H"` (press `G`, release, then `H`)
//!
//! Host key events only report whether Meta or Ctrl was held, so every
//! modifier name (`Ctrl`, `Cmd`, `Meta`, `Super`, `CmdOrCtrl`, ...) means the
//! same thing here. `Alt` and `Shift` are rejected: the character produced
//! already reflects Shift, and Alt is never reported.

use crate::platform::{modifier_label, named_key_name, parse_named_key};
use std::fmt;
use winit::keyboard::NamedKey;

/// Error type for binding parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseError {}

/// The key part of a binding (either a character or a named key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParsedKey {
    /// A produced character, lowercased for ASCII letters (e.g., 'k', '/', '?')
    Character(char),
    /// A named key (e.g., F1, Enter, Escape)
    Named(NamedKey),
}

impl ParsedKey {
    /// Built-in key that opens the help overlay.
    pub const SHOW_HELP: ParsedKey = ParsedKey::Character('?');
    /// Built-in key that closes the help overlay and clears a pending prefix.
    pub const DISMISS_HELP: ParsedKey = ParsedKey::Named(NamedKey::Escape);

    /// Check whether a host event key string denotes this key.
    ///
    /// Character keys compare exactly: `"K"` (Shift held) is not `'k'`.
    pub fn matches(&self, event_key: &str) -> bool {
        match self {
            ParsedKey::Character(c) => {
                let mut chars = event_key.chars();
                chars.next() == Some(*c) && chars.next().is_none()
            }
            ParsedKey::Named(named) => named_key_name(*named) == Some(event_key),
        }
    }
}

impl fmt::Display for ParsedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedKey::Character(' ') => write!(f, "Space"),
            ParsedKey::Character(c) => write!(f, "{}", c.to_ascii_uppercase()),
            ParsedKey::Named(n) => write!(f, "{}", named_key_name(*n).unwrap_or("?")),
        }
    }
}

/// A parsed key combination (optional modifier + key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    /// Meta or Ctrl required
    pub modifier: bool,
    pub key: ParsedKey,
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifier {
            write!(f, "{}+{}", modifier_label(), self.key)
        } else {
            write!(f, "{}", self.key)
        }
    }
}

/// A complete shortcut binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Single press with the modifier held
    Combo(KeyCombo),
    /// Unmodified prefix key followed by an unmodified selector key
    Sequence { prefix: ParsedKey, selector: ParsedKey },
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Combo(combo) => write!(f, "{}", combo),
            Binding::Sequence { prefix, selector } => write!(f, "{} then {}", prefix, selector),
        }
    }
}

/// Parse a binding string: a modifier combo or a whitespace-separated
/// two-key sequence.
pub fn parse_binding(s: &str) -> Result<Binding, ParseError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    match parts.as_slice() {
        [] => Err(ParseError("Empty key binding".to_string())),
        [single] => {
            let combo = parse_key_combo(single)?;
            if !combo.modifier {
                return Err(ParseError(format!(
                    "Single-key binding '{}' needs a modifier (e.g. CmdOrCtrl+{})",
                    single, single
                )));
            }
            Ok(Binding::Combo(combo))
        }
        [first, second] => {
            let prefix = parse_sequence_step(first)?;
            let selector = parse_sequence_step(second)?;
            for key in [prefix, selector] {
                if is_reserved(key) {
                    return Err(ParseError(format!(
                        "'{}' is reserved for the help overlay",
                        key
                    )));
                }
            }
            Ok(Binding::Sequence { prefix, selector })
        }
        _ => Err(ParseError(format!(
            "Sequences take exactly two keys, found {} in '{}'",
            parts.len(),
            s
        ))),
    }
}

/// Parse a key combination string into a KeyCombo.
///
/// Supported format: `"Modifier+Key"` or `"Key"`.
///
/// Modifiers (all equivalent): `Ctrl`, `Control`, `Cmd`, `Command`, `Super`,
/// `Meta`, `Win`, `Mod`, `CmdOrCtrl`.
///
/// Keys:
/// - Single characters: `K`, `/`, `1`, etc.
/// - Named keys: `F1`-`F12`, `Enter`, `Escape`, `Tab`, arrows, etc.
/// - Punctuation aliases: `Slash`, `Question`, `Plus`, `Space`
pub fn parse_key_combo(s: &str) -> Result<KeyCombo, ParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParseError("Empty key combination".to_string()));
    }

    // "Ctrl++" binds the plus key itself
    let (head, key_str) = match s.strip_suffix("++") {
        Some(head) => (head, "+"),
        None => match s.rsplit_once('+') {
            Some((head, tail)) => (head, tail),
            None => ("", s),
        },
    };

    let mut modifier = false;
    for part in head.split('+').map(str::trim).filter(|p| !p.is_empty()) {
        match part.to_lowercase().as_str() {
            "ctrl" | "control" | "cmd" | "command" | "super" | "meta" | "win" | "mod"
            | "cmdorctrl" => modifier = true,
            "alt" | "option" | "shift" => {
                return Err(ParseError(format!(
                    "Modifier '{}' is not supported in shortcut bindings",
                    part
                )));
            }
            _ => {
                return Err(ParseError(format!(
                    "Multiple keys specified: '{}' is not a modifier",
                    part
                )));
            }
        }
    }

    let key_str = key_str.trim();
    if key_str.is_empty() {
        return Err(ParseError(
            "Key combination ends with modifier, no key specified".to_string(),
        ));
    }
    if is_modifier_name(key_str) {
        return Err(ParseError(
            "Key combination ends with modifier, no key specified".to_string(),
        ));
    }

    let key = parse_key(key_str)?;
    Ok(KeyCombo { modifier, key })
}

fn parse_sequence_step(s: &str) -> Result<ParsedKey, ParseError> {
    let combo = parse_key_combo(s)?;
    if combo.modifier {
        return Err(ParseError(format!(
            "Sequence step '{}' cannot carry a modifier",
            s
        )));
    }
    Ok(combo.key)
}

fn is_modifier_name(s: &str) -> bool {
    matches!(
        s.to_lowercase().as_str(),
        "ctrl"
            | "control"
            | "cmd"
            | "command"
            | "super"
            | "meta"
            | "win"
            | "mod"
            | "cmdorctrl"
            | "alt"
            | "option"
            | "shift"
    )
}

/// `?` and `Escape` drive the help overlay and are checked before any binding.
fn is_reserved(key: ParsedKey) -> bool {
    key == ParsedKey::SHOW_HELP || key == ParsedKey::DISMISS_HELP
}

/// Parse a key string into a ParsedKey.
fn parse_key(s: &str) -> Result<ParsedKey, ParseError> {
    match s.to_lowercase().as_str() {
        "slash" => return Ok(ParsedKey::Character('/')),
        "question" => return Ok(ParsedKey::Character('?')),
        "plus" => return Ok(ParsedKey::Character('+')),
        "space" => return Ok(ParsedKey::Character(' ')),
        _ => {}
    }

    // Try named keys first (case-insensitive)
    if let Some(named) = parse_named_key(s) {
        return Ok(ParsedKey::Named(named));
    }

    let chars: Vec<char> = s.chars().collect();
    if chars.len() == 1 {
        return Ok(ParsedKey::Character(chars[0].to_ascii_lowercase()));
    }

    Err(ParseError(format!("Unknown key: '{}'", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_combo() {
        let combo = parse_key_combo("CmdOrCtrl+K").unwrap();
        assert!(combo.modifier);
        assert_eq!(combo.key, ParsedKey::Character('k'));
    }

    #[test]
    fn test_modifier_aliases_are_equivalent() {
        for s in ["Ctrl+n", "Cmd+N", "Meta+N", "Super+N", "Mod+N", "control+n"] {
            assert_eq!(
                parse_key_combo(s).unwrap(),
                KeyCombo {
                    modifier: true,
                    key: ParsedKey::Character('n'),
                },
                "{s}"
            );
        }
    }

    #[test]
    fn test_slash_key() {
        assert_eq!(
            parse_key_combo("CmdOrCtrl+/").unwrap().key,
            ParsedKey::Character('/')
        );
        assert_eq!(
            parse_key_combo("Ctrl+Slash").unwrap().key,
            ParsedKey::Character('/')
        );
    }

    #[test]
    fn test_plus_key() {
        let combo = parse_key_combo("Ctrl++").unwrap();
        assert!(combo.modifier);
        assert_eq!(combo.key, ParsedKey::Character('+'));
    }

    #[test]
    fn test_named_key() {
        let combo = parse_key_combo("Ctrl+F5").unwrap();
        assert_eq!(combo.key, ParsedKey::Named(NamedKey::F5));
    }

    #[test]
    fn test_alt_and_shift_rejected() {
        assert!(parse_key_combo("Alt+K").is_err());
        assert!(parse_key_combo("Ctrl+Shift+K").is_err());
    }

    #[test]
    fn test_trailing_modifier_rejected() {
        assert!(parse_key_combo("Ctrl+").is_err());
        assert!(parse_key_combo("Ctrl+Cmd").is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(parse_key_combo("Ctrl+Bogus").is_err());
        assert!(parse_key_combo("Ctrl+X+Y").is_err());
    }

    #[test]
    fn test_sequence() {
        assert_eq!(
            parse_binding("G H").unwrap(),
            Binding::Sequence {
                prefix: ParsedKey::Character('g'),
                selector: ParsedKey::Character('h'),
            }
        );
    }

    #[test]
    fn test_sequence_rejects_modifier_steps() {
        assert!(parse_binding("Ctrl+G H").is_err());
        assert!(parse_binding("G Ctrl+H").is_err());
    }

    #[test]
    fn test_sequence_rejects_reserved_keys() {
        assert!(parse_binding("G ?").is_err());
        assert!(parse_binding("Esc H").is_err());
    }

    #[test]
    fn test_sequence_length() {
        assert!(parse_binding("").is_err());
        assert!(parse_binding("G H J").is_err());
    }

    #[test]
    fn test_unmodified_single_key_rejected() {
        assert!(parse_binding("K").is_err());
        assert!(matches!(parse_binding("Ctrl+K"), Ok(Binding::Combo(_))));
    }

    #[test]
    fn test_key_matches_event_string() {
        assert!(ParsedKey::Character('k').matches("k"));
        assert!(!ParsedKey::Character('k').matches("K"));
        assert!(!ParsedKey::Character('k').matches("kk"));
        assert!(ParsedKey::Named(NamedKey::Escape).matches("Escape"));
        assert!(!ParsedKey::Named(NamedKey::Escape).matches("Esc"));
    }

    #[test]
    fn test_display() {
        let label = modifier_label();
        assert_eq!(
            parse_binding("CmdOrCtrl+K").unwrap().to_string(),
            format!("{label}+K")
        );
        assert_eq!(parse_binding("g p").unwrap().to_string(), "G then P");
        assert_eq!(
            parse_binding("Ctrl+Space").unwrap().to_string(),
            format!("{label}+Space")
        );
    }
}
