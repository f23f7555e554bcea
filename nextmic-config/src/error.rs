//! Typed error variants for the nextmic-config crate.
//!
//! `Config::load` and `Config::save` return `anyhow::Result` so the binary can
//! add context freely; callers that need to branch on the failure mode can
//! downcast to [`ConfigError`].
//!
//! ```rust,no_run
//! use nextmic_config::ConfigError;
//!
//! fn check_load_err(e: &anyhow::Error) {
//!     if let Some(cfg_err) = e.downcast_ref::<ConfigError>() {
//!         match cfg_err {
//!             ConfigError::Io(io) => eprintln!("I/O error: {io}"),
//!             ConfigError::Parse(p) => eprintln!("YAML parse error: {p}"),
//!             ConfigError::Validation(msg) => eprintln!("Validation: {msg}"),
//!             ConfigError::PathTraversal(msg) => eprintln!("Path traversal: {msg}"),
//!         }
//!     }
//! }
//! ```

use thiserror::Error;

/// Errors that can occur when loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the config file.
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file contained invalid YAML that could not be parsed.
    #[error("YAML parse error in config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// A field value failed semantic validation.
    ///
    /// The inner string names the field and why it was rejected.
    #[error("Config validation error: {0}")]
    Validation(String),

    /// The config file resolved outside the configuration directory
    /// (e.g. through a symlink).
    #[error("Path traversal detected: {0}")]
    PathTraversal(String),
}
