// Library exports for testing and embedding.
//
// The shortcut layer is single-threaded by design: one `ShortcutSession` per
// active view, driven synchronously by the host's key-press notifications.
// Shared state uses `parking_lot::Mutex` only so sessions and the hub can be
// owned from any thread.

/// Application version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod debug;
pub mod help_ui;
pub mod replay;
pub mod shortcuts;

pub use shortcuts::{
    KeyEventHub, Navigator, ShortcutActions, ShortcutSession, Subscription,
};
