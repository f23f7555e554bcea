//! Command-line interface for nextmic.
//!
//! Subcommands inspect the shortcut configuration and replay scripted key
//! presses through the interpreter.

use crate::{help_ui, replay};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nextmic_config::{Config, LogLevel};
use std::path::PathBuf;

/// nextmic - keyboard shortcut layer of the NextMic speaker dashboard
#[derive(Parser)]
#[command(name = "nextmic")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level for the debug log file (off, error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Use this config file instead of ~/.config/nextmic/config.yaml
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the keyboard shortcuts reference
    Shortcuts,

    /// Replay a YAML script of timed key presses
    Replay {
        /// Script file: a list of {at_ms, key, modifier, text_input}
        #[arg(value_name = "FILE")]
        script: PathBuf,
    },

    /// Print the config file path
    ConfigPath,
}

impl Cli {
    /// Load the config named by `--config`, or the default one.
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("loading config from {}", path.display())),
            None => Config::load().context("loading default config"),
        }
    }
}

/// Execute the parsed command.
pub fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::ConfigPath => {
            let path = cli.config.clone().unwrap_or_else(Config::config_path);
            println!("{}", path.display());
        }
        Commands::Shortcuts => {
            let config = cli.load_config()?;
            crate::debug::apply_config_level(config.log_level);
            let registry = nextmic_keybindings::ShortcutRegistry::from_config(&config.keybindings);
            print!("{}", help_ui::render_text(&help_ui::shortcut_table(&registry)));
        }
        Commands::Replay { script } => {
            let config = cli.load_config()?;
            crate::debug::apply_config_level(config.log_level);
            let steps = replay::load_script(script)
                .with_context(|| format!("loading replay script {}", script.display()))?;
            for line in replay::run(&config, &steps) {
                println!("{line}");
            }
        }
    }
    Ok(())
}
