//! Scripted key-press replay.
//!
//! Feeds a YAML list of timed key presses through a real [`ShortcutSession`]
//! and records what the session did with each one. Used by `nextmic replay`
//! to check a config's bindings without a browser.
//!
//! ```yaml
//! - at_ms: 0
//!   key: g
//! - at_ms: 300
//!   key: h
//! - at_ms: 900
//!   key: k
//!   modifier: true
//! ```

use crate::shortcuts::{KeyEventHub, ShortcutActions, ShortcutSession};
use nextmic_config::Config;
use nextmic_keybindings::{KeyDisposition, KeyEvent};
use parking_lot::Mutex;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors loading a replay script.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("cannot read replay script: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid replay script: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    #[error("step {index} at {at_ms}ms is earlier than the previous step at {previous_ms}ms")]
    OutOfOrder {
        index: usize,
        at_ms: u64,
        previous_ms: u64,
    },
}

/// One scripted key press.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplayStep {
    /// Offset from the start of the replay
    pub at_ms: u64,
    pub key: String,
    #[serde(default)]
    pub modifier: bool,
    #[serde(default)]
    pub text_input: bool,
}

impl ReplayStep {
    fn to_event(&self) -> KeyEvent {
        KeyEvent {
            key: self.key.clone(),
            has_modifier: self.modifier,
            target_is_text_input: self.text_input,
        }
    }
}

/// Outcome of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayLine {
    pub at_ms: u64,
    pub key: String,
    pub disposition: KeyDisposition,
    /// Side effects in order: expiry, callbacks, navigation
    pub effects: Vec<String>,
}

impl fmt::Display for ReplayLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = match self.disposition {
            KeyDisposition::PassThrough => "pass".to_string(),
            KeyDisposition::Consumed(None) => "consumed".to_string(),
            KeyDisposition::Consumed(Some(command)) => format!("consumed {command}"),
        };
        write!(f, "{:>6}ms  {:<8} {}", self.at_ms, format!("{:?}", self.key), verdict)?;
        for effect in &self.effects {
            write!(f, "  [{effect}]")?;
        }
        Ok(())
    }
}

/// Parse a replay script, rejecting steps that go back in time.
pub fn parse_script(contents: &str) -> Result<Vec<ReplayStep>, ReplayError> {
    let steps: Vec<ReplayStep> = serde_yaml_ng::from_str(contents)?;
    for (index, pair) in steps.windows(2).enumerate() {
        if pair[1].at_ms < pair[0].at_ms {
            return Err(ReplayError::OutOfOrder {
                index: index + 1,
                at_ms: pair[1].at_ms,
                previous_ms: pair[0].at_ms,
            });
        }
    }
    Ok(steps)
}

/// Load and parse a replay script file.
pub fn load_script(path: &Path) -> Result<Vec<ReplayStep>, ReplayError> {
    let contents = std::fs::read_to_string(path)?;
    parse_script(&contents)
}

/// Run `steps` through a fresh session built from `config`.
pub fn run(config: &Config, steps: &[ReplayStep]) -> Vec<ReplayLine> {
    let effects: Arc<Mutex<Vec<String>>> = Arc::default();
    let record = |label: &'static str| {
        let effects = Arc::clone(&effects);
        move || effects.lock().push(label.to_string())
    };

    let actions = ShortcutActions::new()
        .on_open_search(record("open search"))
        .on_open_new(record("open new"))
        .on_open_toolkit(record("open toolkit"));
    let nav_effects = Arc::clone(&effects);
    let navigator = move |route: nextmic_keybindings::Route| {
        nav_effects.lock().push(format!("navigate {}", route.path()));
    };

    let hub = KeyEventHub::new();
    let session = ShortcutSession::attach(&hub, config, actions, navigator);
    let start = Instant::now();
    log::info!("Replaying {} key presses", steps.len());

    let mut lines = Vec::with_capacity(steps.len());
    for step in steps {
        let now = start + Duration::from_millis(step.at_ms);
        // Deferred expiry, as a host timer would run it before the next key
        if session.check_timeout(now) {
            effects.lock().push("prefix expired".to_string());
        }
        let disposition = hub.dispatch(&step.to_event(), now);
        if let Some(indicator) = session.pending_indicator(now) {
            effects.lock().push(format!("pending {indicator}"));
        }
        if session.help_visible() {
            effects.lock().push("help open".to_string());
        }
        lines.push(ReplayLine {
            at_ms: step.at_ms,
            key: step.key.clone(),
            disposition,
            effects: std::mem::take(&mut *effects.lock()),
        });
    }

    session.detach();
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use nextmic_keybindings::ShortcutCommand;

    #[test]
    fn test_parse_defaults() {
        let steps = parse_script("- at_ms: 5\n  key: g\n").unwrap();
        assert_eq!(
            steps,
            vec![ReplayStep {
                at_ms: 5,
                key: "g".to_string(),
                modifier: false,
                text_input: false,
            }]
        );
    }

    #[test]
    fn test_out_of_order_rejected() {
        let err = parse_script("- {at_ms: 10, key: g}\n- {at_ms: 5, key: h}\n").unwrap_err();
        assert!(matches!(
            err,
            ReplayError::OutOfOrder {
                index: 1,
                at_ms: 5,
                previous_ms: 10
            }
        ));
    }

    #[test]
    fn test_run_records_navigation() {
        let steps = parse_script("- {at_ms: 0, key: g}\n- {at_ms: 200, key: b}\n").unwrap();
        let lines = run(&Config::default(), &steps);

        assert_eq!(lines[0].disposition, KeyDisposition::PassThrough);
        assert_eq!(lines[0].effects, vec!["pending G…".to_string()]);
        assert_eq!(
            lines[1].disposition,
            KeyDisposition::Consumed(Some(ShortcutCommand::NavigateBusiness))
        );
        assert_eq!(lines[1].effects, vec!["navigate /business".to_string()]);
    }

    #[test]
    fn test_run_reports_expiry() {
        let steps = parse_script("- {at_ms: 0, key: g}\n- {at_ms: 1500, key: h}\n").unwrap();
        let lines = run(&Config::default(), &steps);
        assert_eq!(lines[1].disposition, KeyDisposition::PassThrough);
        assert_eq!(lines[1].effects, vec!["prefix expired".to_string()]);
    }

    #[test]
    fn test_line_display() {
        let line = ReplayLine {
            at_ms: 40,
            key: "k".to_string(),
            disposition: KeyDisposition::Consumed(Some(ShortcutCommand::OpenSearch)),
            effects: vec!["open search".to_string()],
        };
        assert_eq!(
            line.to_string(),
            "    40ms  \"k\"      consumed open_search  [open search]"
        );
    }
}
