//! Chord interpreter.
//!
//! A small state machine that resolves key presses into [`ShortcutCommand`]s.
//! Rules are applied in order, first match wins:
//!
//! 1. Focus in a text input: clear any pending prefix, pass through.
//! 2. `?` (no modifier) shows help; `Escape` hides it and clears the prefix.
//! 3. Bound modifier combos (`CmdOrCtrl+K`, ...). The prefix state is left alone.
//! 4. An unmodified prefix key (`G`) arms the pending state; the press itself
//!    passes through.
//! 5. With a prefix armed, any other key completes the sequence or is
//!    swallowed as a dead chord. Either way the prefix is cleared.
//! 6. Anything else passes through.
//!
//! The prefix expires `timeout` after it was armed. Expiry is checked against
//! the `now` supplied with each event, so a stale prefix never completes a
//! sequence even if no timer ever fired. A second prefix press while armed
//! does not renew the deadline.

use crate::ShortcutRegistry;
use crate::command::ShortcutCommand;
use crate::event::{KeyDisposition, KeyEvent};
use crate::parser::ParsedKey;
use std::time::{Duration, Instant};

/// Armed sequence prefix.
#[derive(Debug, Clone, Copy)]
struct PendingPrefix {
    key: ParsedKey,
    armed_at: Instant,
}

/// Per-view shortcut state machine.
#[derive(Debug)]
pub struct ChordInterpreter {
    registry: ShortcutRegistry,
    timeout: Duration,
    pending: Option<PendingPrefix>,
    help_visible: bool,
}

impl ChordInterpreter {
    /// Default window for completing a sequence.
    pub const DEFAULT_TIMEOUT: Duration =
        Duration::from_millis(nextmic_config::defaults::CHORD_TIMEOUT_MS);

    pub fn new(registry: ShortcutRegistry, timeout: Duration) -> Self {
        Self {
            registry,
            timeout,
            pending: None,
            help_visible: false,
        }
    }

    /// Interpreter with the built-in bindings and a one second prefix window.
    pub fn with_defaults() -> Self {
        Self::new(ShortcutRegistry::with_defaults(), Self::DEFAULT_TIMEOUT)
    }

    /// Build from loaded configuration.
    pub fn from_config(config: &nextmic_config::Config) -> Self {
        Self::new(
            ShortcutRegistry::from_config(&config.keybindings),
            Duration::from_millis(config.chord_timeout_ms),
        )
    }

    pub fn registry(&self) -> &ShortcutRegistry {
        &self.registry
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve one key press observed at `now`.
    pub fn handle_key_event(&mut self, event: &KeyEvent, now: Instant) -> KeyDisposition {
        log::trace!(
            "key event: key={:?} modifier={} text_input={}",
            event.key,
            event.has_modifier,
            event.target_is_text_input
        );

        // A prefix past its deadline is treated as never armed
        self.check_timeout(now);

        if event.target_is_text_input {
            if self.pending.take().is_some() {
                log::debug!("Pending prefix cleared: focus is in a text input");
            }
            return KeyDisposition::PassThrough;
        }

        if ParsedKey::SHOW_HELP.matches(&event.key) && !event.has_modifier {
            self.help_visible = true;
            return KeyDisposition::Consumed(Some(ShortcutCommand::ShowHelp));
        }

        if ParsedKey::DISMISS_HELP.matches(&event.key) {
            self.help_visible = false;
            self.pending = None;
            return KeyDisposition::Consumed(Some(ShortcutCommand::DismissHelp));
        }

        if event.has_modifier {
            if let Some(command) = self.registry.lookup_combo(&event.key) {
                log::debug!("Modifier shortcut {} -> {}", event.key, command);
                return KeyDisposition::Consumed(Some(command));
            }
            // Unbound modified keys only reach the sequence rule below
        } else if let Some(prefix) = self.registry.prefix_for(&event.key) {
            match self.pending {
                Some(pending) => {
                    // A prefix that also selects under the armed prefix ("G G")
                    // completes rather than re-arms.
                    if let Some(command) = self.registry.lookup_sequence(pending.key, &event.key) {
                        self.pending = None;
                        log::debug!("Sequence {} {} -> {}", pending.key, event.key, command);
                        return KeyDisposition::Consumed(Some(command));
                    }
                    // First press armed the prefix; the deadline is not renewed.
                    log::trace!("Prefix {} already pending", pending.key);
                }
                None => {
                    log::debug!("Prefix {} armed", prefix);
                    self.pending = Some(PendingPrefix {
                        key: prefix,
                        armed_at: now,
                    });
                }
            }
            return KeyDisposition::PassThrough;
        }

        if let Some(pending) = self.pending.take() {
            let command = self.registry.lookup_sequence(pending.key, &event.key);
            match command {
                Some(command) => {
                    log::debug!("Sequence {} {} -> {}", pending.key, event.key, command)
                }
                None => log::debug!("Dead chord {} {}", pending.key, event.key),
            }
            return KeyDisposition::Consumed(command);
        }

        KeyDisposition::PassThrough
    }

    /// Clear the prefix if its deadline has passed. Returns `true` only when
    /// this call cleared it; a prefix already cleared by another path is a no-op.
    pub fn check_timeout(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(pending) if self.is_expired(pending, now) => {
                log::debug!("Prefix {} expired", pending.key);
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Whether a live (unexpired) prefix is armed at `now`.
    pub fn is_pending(&self, now: Instant) -> bool {
        self.pending_prefix(now).is_some()
    }

    /// The live prefix, for a "G…" indicator.
    pub fn pending_prefix(&self, now: Instant) -> Option<ParsedKey> {
        self.pending
            .filter(|pending| !self.is_expired(*pending, now))
            .map(|pending| pending.key)
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    /// Explicit close action from the help overlay.
    pub fn close_help(&mut self) {
        self.help_visible = false;
    }

    /// Drop all transient state.
    pub fn reset(&mut self) {
        self.pending = None;
        self.help_visible = false;
    }

    fn is_expired(&self, pending: PendingPrefix, now: Instant) -> bool {
        now.saturating_duration_since(pending.armed_at) > self.timeout
    }
}
