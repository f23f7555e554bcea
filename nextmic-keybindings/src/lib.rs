//! Keyboard shortcut system for NextMic.
//!
//! Turns host key presses into dashboard commands without ever intercepting
//! ordinary typing.
//!
//! Features:
//! - Modifier combos (CmdOrCtrl+K, CmdOrCtrl+N, CmdOrCtrl+/)
//! - Two-key sequences with a timed prefix (G then H, G then P, ...)
//! - Built-in help overlay keys (`?` to show, Escape to dismiss)
//! - Bindings loaded from config.yaml, invalid entries skipped

pub mod command;
pub mod event;
pub mod host;
pub mod interpreter;
pub mod parser;
pub mod platform;

pub use command::{Route, ShortcutCommand};
pub use event::{KeyDisposition, KeyEvent};
pub use interpreter::ChordInterpreter;
pub use parser::{Binding, KeyCombo, ParseError, ParsedKey, parse_binding};

use nextmic_config::KeyBinding;

/// Registry of shortcut bindings mapping combos and sequences to commands.
#[derive(Debug, Clone, Default)]
pub struct ShortcutRegistry {
    /// Parsed bindings in registration order
    bindings: Vec<(Binding, ShortcutCommand)>,
}

impl ShortcutRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in bindings.
    pub fn with_defaults() -> Self {
        Self::from_config(&nextmic_config::defaults::keybindings())
    }

    /// Build a registry from config keybindings.
    ///
    /// Invalid binding strings, unknown actions and duplicate keys are logged
    /// and skipped; the first binding for a key wins.
    pub fn from_config(keybindings: &[KeyBinding]) -> Self {
        let mut registry = Self::new();

        log::info!(
            "Building shortcut registry from {} config keybindings",
            keybindings.len()
        );
        for kb in keybindings {
            let Some(command) = ShortcutCommand::from_action(&kb.action) else {
                log::warn!(
                    "Unknown shortcut action '{}' for key '{}'",
                    kb.action,
                    kb.key
                );
                continue;
            };
            match parser::parse_binding(&kb.key) {
                Ok(binding) => {
                    if let Some((_, existing)) =
                        registry.bindings.iter().find(|(b, _)| *b == binding)
                    {
                        log::warn!(
                            "Shortcut '{}' already bound to {}, ignoring {}",
                            kb.key,
                            existing,
                            command
                        );
                        continue;
                    }
                    log::debug!(
                        "Registered shortcut: {} -> {} (parsed as: {:?})",
                        kb.key,
                        command,
                        binding
                    );
                    registry.bindings.push((binding, command));
                }
                Err(e) => {
                    log::warn!(
                        "Invalid shortcut '{}' for action '{}': {}",
                        kb.key,
                        kb.action,
                        e
                    );
                }
            }
        }

        log::info!(
            "Shortcut registry initialized with {} bindings",
            registry.bindings.len()
        );
        registry
    }

    /// Command bound to `key` pressed with the modifier held.
    pub fn lookup_combo(&self, key: &str) -> Option<ShortcutCommand> {
        self.bindings.iter().find_map(|(binding, command)| match binding {
            Binding::Combo(combo) if combo.modifier && combo.key.matches(key) => Some(*command),
            _ => None,
        })
    }

    /// The prefix key that `key` denotes, if any sequence starts with it.
    pub fn prefix_for(&self, key: &str) -> Option<ParsedKey> {
        self.bindings.iter().find_map(|(binding, _)| match binding {
            Binding::Sequence { prefix, .. } if prefix.matches(key) => Some(*prefix),
            _ => None,
        })
    }

    /// Command completing the sequence started by `prefix` with `key`.
    pub fn lookup_sequence(&self, prefix: ParsedKey, key: &str) -> Option<ShortcutCommand> {
        self.bindings.iter().find_map(|(binding, command)| match binding {
            Binding::Sequence {
                prefix: p,
                selector,
            } if *p == prefix && selector.matches(key) => Some(*command),
            _ => None,
        })
    }

    /// All registered bindings, in registration order.
    pub fn bindings(&self) -> impl Iterator<Item = &(Binding, ShortcutCommand)> {
        self.bindings.iter()
    }

    /// Check if the registry has any bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Get the number of registered bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}
