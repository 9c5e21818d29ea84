//! `stowage-tui` — Terminal front end for the Stowage package inventory.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `stowage_core`'s [`EntityStream`](stowage_core::EntityStream). The
//! session starts on a role-selection screen; administrators get the
//! full intake dashboard, end users a read-only view of their own
//! packages.
//!
//! Logs are written to a file (default `/tmp/stowage-tui.log`) to avoid
//! corrupting the terminal UI. A background data bridge task streams
//! store updates and scanner events into the TUI action loop.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use stowage_core::{Inventory, LineWedge, Scanner};

use crate::app::App;

/// Terminal front end for the Stowage package inventory.
#[derive(Parser, Debug)]
#[command(name = "stowage-tui", version, about)]
struct Cli {
    /// Inventory API base URL (e.g. http://localhost:5234/api)
    #[arg(short = 'u', long, env = "STOWAGE_API_URL")]
    api_url: Option<String>,

    /// Scanner device node (e.g. /dev/hidraw0). Overrides the config file.
    #[arg(long, env = "STOWAGE_SCANNER_DEVICE")]
    scanner_device: Option<PathBuf>,

    /// Log file path (defaults to /tmp/stowage-tui.log)
    #[arg(long, default_value = "/tmp/stowage-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application so logs flush on exit.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stowage={log_level}")));

    let log_dir = cli.log_file.parent().unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("stowage-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    // Config file + env, then CLI flag overrides on top
    let config = stowage_config::load_config_or_default();
    let mut inventory_config = config
        .inventory()
        .map_err(|e| eyre!("configuration error: {e}"))?;
    if let Some(raw) = cli.api_url.as_deref() {
        inventory_config.base_url = raw.parse().map_err(|e| eyre!("invalid --api-url: {e}"))?;
    }
    let mut scanner_config = config.scanner();
    if cli.scanner_device.is_some() {
        scanner_config.device = cli.scanner_device.clone();
    }

    info!(
        api = %inventory_config.base_url,
        scanner = ?scanner_config.device,
        "starting stowage-tui"
    );

    let inventory =
        Inventory::new(&inventory_config).map_err(|e| eyre!("failed to build client: {e}"))?;

    let scanner = scanner_config
        .device
        .as_ref()
        .map(|device| Scanner::new(LineWedge::new(device), scanner_config.settle));

    let mut app = App::new(inventory, scanner);
    app.run().await?;

    Ok(())
}
