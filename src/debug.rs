//! Debug logging for NextMic.
//!
//! Routes every `log::info!()`/`log::debug!()` call to a debug log file in the
//! temp directory (`/tmp/nextmic_debug.log` on Unix), so diagnostic output never
//! mixes with CLI output. When `RUST_LOG` is set, records are mirrored to stderr.
//!
//! Level precedence: `--log-level` flag, then `RUST_LOG`, then the config
//! file's `log_level` (applied after the config loads).

use nextmic_config::LogLevel;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

struct LogBridge {
    file: Mutex<Option<File>>,
    mirror_stderr: bool,
    /// Set when the CLI or RUST_LOG chose the level; config must not override
    level_locked: AtomicBool,
}

static BRIDGE: OnceLock<LogBridge> = OnceLock::new();

/// Path of the debug log file.
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("nextmic_debug.log")
}

/// Install the `log` bridge. Safe to call more than once; later calls only
/// adjust the level.
pub fn init_log_bridge(cli_level: Option<LogLevel>) {
    let env_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|v| v.parse::<LogLevel>().ok());
    let chosen = cli_level.or(env_level);

    let bridge = BRIDGE.get_or_init(|| LogBridge {
        file: Mutex::new(None),
        mirror_stderr: std::env::var_os("RUST_LOG").is_some(),
        level_locked: AtomicBool::new(false),
    });

    if log::set_logger(bridge).is_err() {
        // Another logger (or an earlier call) owns the facade
        log::debug!("log bridge already installed");
    }

    match chosen {
        Some(level) => {
            bridge.level_locked.store(true, Ordering::Relaxed);
            apply_level(level);
        }
        None => log::set_max_level(log::LevelFilter::Off),
    }
}

/// Apply the config file's level unless the CLI or `RUST_LOG` already chose one.
pub fn apply_config_level(level: LogLevel) {
    let Some(bridge) = BRIDGE.get() else {
        return;
    };
    if bridge.level_locked.load(Ordering::Relaxed) {
        return;
    }
    apply_level(level);
}

fn apply_level(level: LogLevel) {
    log::set_max_level(level.to_level_filter());
    if level != LogLevel::Off {
        log::info!(
            "nextmic debug session started at {} (level={})",
            timestamp(),
            level.display_name()
        );
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            timestamp(),
            record.level(),
            record.target(),
            record.args()
        );

        let mut file = self.file.lock();
        if file.is_none() {
            // Logging must never fail the caller; a missing file just drops lines
            *file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path())
                .ok();
        }
        if let Some(f) = file.as_mut() {
            let _ = f.write_all(line.as_bytes());
        }
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(f) = self.file.lock().as_mut() {
            let _ = f.flush();
        }
    }
}

fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}
