//! Configuration system for NextMic.
//!
//! This crate provides configuration loading, saving, and default values
//! for the keyboard shortcut layer. It includes:
//!
//! - Shortcut bindings (modifier chords and two-key sequences)
//! - Chord timeout used by the sequence interpreter
//! - Log level for the debug log bridge

pub mod config;
pub mod defaults;
pub mod error;
mod types;

// Re-export main types for convenience
pub use config::Config;
pub use error::ConfigError;
pub use types::{KeyBinding, LogLevel};
