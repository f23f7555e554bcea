//! Host-neutral key event and the interpreter's verdict on it.

use crate::command::ShortcutCommand;

/// One physical key press as reported by the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Produced key, DOM style: `"g"`, `"?"`, `"/"`, `"Escape"`, `"Enter"`
    pub key: String,
    /// Meta or Ctrl was held
    pub has_modifier: bool,
    /// Focus is in a text input, textarea or content-editable element
    pub target_is_text_input: bool,
}

impl KeyEvent {
    /// An unmodified press outside any text field.
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            has_modifier: false,
            target_is_text_input: false,
        }
    }

    /// A press with Meta or Ctrl held, outside any text field.
    pub fn with_modifier(key: impl Into<String>) -> Self {
        Self {
            has_modifier: true,
            ..Self::plain(key)
        }
    }

    /// Mark the event as targeting a text input.
    pub fn in_text_input(mut self) -> Self {
        self.target_is_text_input = true;
        self
    }
}

/// What the host should do with a key press after the interpreter saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Not claimed; default host behaviour applies.
    PassThrough,
    /// Claimed; the host must suppress its default behaviour. A dead chord
    /// is consumed without a command.
    Consumed(Option<ShortcutCommand>),
}

impl KeyDisposition {
    pub fn is_consumed(&self) -> bool {
        matches!(self, KeyDisposition::Consumed(_))
    }

    pub fn command(&self) -> Option<ShortcutCommand> {
        match self {
            KeyDisposition::Consumed(command) => *command,
            KeyDisposition::PassThrough => None,
        }
    }
}
