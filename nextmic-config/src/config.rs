//! Core `Config` struct, persistence, and path resolution.
//!
//! Covers:
//! - `load` / `save` (YAML file I/O with atomic write)
//! - XDG-compliant path helpers (`config_path`, `config_dir`)
//! - Merging new default shortcut bindings into an existing user config
//! - Field validation

use crate::defaults;
use crate::error::ConfigError;
use crate::types::{KeyBinding, LogLevel};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Shortcut layer configuration, stored as `config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Master switch for keyboard shortcuts in the dashboard
    #[serde(default = "crate::defaults::bool_true")]
    pub shortcuts_enabled: bool,

    /// How long a sequence prefix (e.g. `G`) stays armed, in milliseconds
    #[serde(default = "crate::defaults::chord_timeout_ms")]
    pub chord_timeout_ms: u64,

    /// Shortcut bindings: `CmdOrCtrl+K` style combos or `G H` style sequences
    #[serde(default = "crate::defaults::keybindings")]
    pub keybindings: Vec<KeyBinding>,

    /// Verbosity of the debug log file
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shortcuts_enabled: true,
            chord_timeout_ms: defaults::chord_timeout_ms(),
            keybindings: defaults::keybindings(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sequence prefix timeout
    pub fn with_chord_timeout_ms(mut self, ms: u64) -> Self {
        self.chord_timeout_ms = ms;
        self
    }

    /// Replace the shortcut bindings
    pub fn with_keybindings(mut self, keybindings: Vec<KeyBinding>) -> Self {
        self.keybindings = keybindings;
        self
    }

    /// Load configuration from the default path, or create it with defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if config_path.exists() {
            // Reject a config file that has been redirected (e.g. via a
            // symlink) outside the config directory.
            let config_dir = Self::config_dir();
            if let Err(e) = Self::validate_config_path(&config_path, &config_dir) {
                log::error!("Config path validation failed: {e}");
                return Err(e.into());
            }
            Self::load_from(&config_path)
        } else {
            log::info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            if let Err(e) = config.save() {
                log::error!("Failed to save default config: {}", e);
                return Err(e);
            }
            log::info!("Default config created successfully");
            Ok(config)
        }
    }

    /// Load configuration from an explicit file path.
    ///
    /// New default keybindings are merged in and the result is validated.
    pub fn load_from(path: &Path) -> Result<Self> {
        log::info!("Loading existing config from {:?}", path);
        let contents = fs::read_to_string(path).map_err(ConfigError::from)?;
        let mut config = Self::from_yaml(&contents)?;
        config.merge_default_keybindings();
        Ok(config)
    }

    /// Parse and validate configuration from YAML text.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml_ng::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::from)?;
        }

        let yaml = serde_yaml_ng::to_string(self).map_err(ConfigError::from)?;

        // Atomic save: write to temp file then rename
        let temp_path = config_path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml).map_err(ConfigError::from)?;
        fs::rename(&temp_path, config_path).map_err(ConfigError::from)?;

        Ok(())
    }

    /// Check field values that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chord_timeout_ms == 0 || self.chord_timeout_ms > defaults::MAX_CHORD_TIMEOUT_MS {
            return Err(ConfigError::Validation(format!(
                "chord_timeout_ms must be between 1 and {}, got {}",
                defaults::MAX_CHORD_TIMEOUT_MS,
                self.chord_timeout_ms
            )));
        }
        if let Some(empty) = self
            .keybindings
            .iter()
            .find(|kb| kb.key.trim().is_empty() || kb.action.trim().is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "keybinding entries need both a key and an action (key: '{}', action: '{}')",
                empty.key, empty.action
            )));
        }
        Ok(())
    }

    /// Merge default keybindings into the user's config.
    /// Only adds keybindings for actions that don't already exist in the user's config.
    pub(crate) fn merge_default_keybindings(&mut self) {
        let existing_actions: std::collections::HashSet<String> = self
            .keybindings
            .iter()
            .map(|kb| kb.action.clone())
            .collect();

        let mut added_count = 0;
        for default_kb in defaults::keybindings() {
            if !existing_actions.contains(&default_kb.action) {
                log::info!(
                    "Adding new default keybinding: {} -> {}",
                    default_kb.key,
                    default_kb.action
                );
                self.keybindings.push(default_kb);
                added_count += 1;
            }
        }

        if added_count > 0 {
            log::info!(
                "Merged {} new default keybinding(s) into user config",
                added_count
            );
        }
    }

    /// Get the configuration file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("nextmic").join("config.yaml")
            } else {
                PathBuf::from("config.yaml")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            // ~/.config/nextmic/config.yaml on every Unix, macOS included
            if let Some(home_dir) = dirs::home_dir() {
                home_dir
                    .join(".config")
                    .join("nextmic")
                    .join("config.yaml")
            } else {
                PathBuf::from("config.yaml")
            }
        }
    }

    /// Get the configuration directory path (using XDG convention)
    pub fn config_dir() -> PathBuf {
        Self::config_path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Validate that `path` (which must exist) canonicalizes to a location
    /// inside `expected_base`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::PathTraversal` when the canonical path escapes the
    /// base, or `ConfigError::Io` if `path` cannot be canonicalized.
    pub fn validate_config_path(path: &Path, expected_base: &Path) -> Result<PathBuf, ConfigError> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("cannot canonicalize {}: {e}", path.display()),
            )
        })?;

        // First run: the base may not exist yet
        let canonical_base =
            fs::canonicalize(expected_base).unwrap_or_else(|_| expected_base.to_path_buf());

        if !canonical.starts_with(&canonical_base) {
            return Err(ConfigError::PathTraversal(format!(
                "path '{}' resolves to '{}' which is outside the expected directory '{}'",
                path.display(),
                canonical.display(),
                canonical_base.display(),
            )));
        }

        Ok(canonical)
    }
}
