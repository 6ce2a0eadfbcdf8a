mod aggregate;
mod config;
mod error;
mod export;
mod models;
mod run;
mod store;
mod ui;

use anyhow::{Context, Result};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use config::Config;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = Config::from_env()?;
    let interactive = args.len() == 1;
    init_logging(&config, interactive)?;

    let mut store = store::Store::open(&config.data_file)?;

    if interactive {
        run::as_tui(&mut store)
    } else {
        run::as_cli(&args, &mut store)
    }
}

/// The TUI owns the terminal, so it logs to a file instead of stderr.
fn init_logging(config: &Config, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_new(Config::log_filter()).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if to_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
            .with_context(|| format!("Failed to open log file: {}", config.log_file.display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else {
        builder.with_writer(std::io::stderr).init();
    }
    Ok(())
}
