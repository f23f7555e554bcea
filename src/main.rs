use anyhow::Result;
use clap::Parser;
use nextmic::cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI --log-level takes highest precedence, then RUST_LOG, then config (applied later).
    nextmic::debug::init_log_bridge(cli.log_level);
    log::info!("Starting nextmic {}", nextmic::VERSION);

    let result = cli::run(&cli);
    if let Err(ref e) = result {
        log::error!("nextmic failed: {e:#}");
    }
    log::logger().flush();
    result
}
