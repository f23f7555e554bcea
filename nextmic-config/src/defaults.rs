//! Default values for configuration fields.

use crate::types::KeyBinding;

/// Window for completing a two-key sequence after its prefix, in milliseconds.
pub const CHORD_TIMEOUT_MS: u64 = 1000;

/// Upper bound accepted for `chord_timeout_ms`.
pub const MAX_CHORD_TIMEOUT_MS: u64 = 10_000;

pub fn chord_timeout_ms() -> u64 {
    CHORD_TIMEOUT_MS
}

pub fn bool_true() -> bool {
    true
}

/// Built-in shortcut bindings.
///
/// `CmdOrCtrl` matches either Meta or Ctrl, since the dashboard treats both as
/// "the" modifier on every platform.
pub fn keybindings() -> Vec<KeyBinding> {
    vec![
        KeyBinding::new("CmdOrCtrl+K", "open_search"),
        KeyBinding::new("CmdOrCtrl+N", "open_new"),
        KeyBinding::new("CmdOrCtrl+/", "open_toolkit"),
        KeyBinding::new("G H", "navigate_home"),
        KeyBinding::new("G F", "navigate_find"),
        KeyBinding::new("G P", "navigate_pipeline"),
        KeyBinding::new("G B", "navigate_business"),
        KeyBinding::new("G C", "navigate_calendar"),
    ]
}
