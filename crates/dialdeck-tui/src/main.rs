//! `dialdeck` — terminal console for operating a voice-campaign backend.
//!
//! Built on [ratatui](https://ratatui.rs) over `dialdeck-core`'s polling
//! [`Session`](dialdeck_core::Session). Two screens, navigable via number
//! keys: Dashboard (global metrics) and Campaigns (list, detail, call
//! pages, lifecycle actions, creation form, bulk simulation).
//!
//! Logs are written to a file (default `/tmp/dialdeck.log`) to avoid
//! corrupting the terminal UI. A background data bridge task forwards
//! every applied snapshot from the session into the TUI action loop.

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

use dialdeck_api::ConsoleClient;
use dialdeck_core::Session;

use crate::app::App;

/// Terminal console for operating a voice-campaign backend.
#[derive(Parser, Debug)]
#[command(name = "dialdeck", version, about)]
struct Cli {
    /// Backend base URL (e.g., http://localhost:8080)
    #[arg(short = 's', long, env = "DIALDECK_SERVER")]
    server: Option<String>,

    /// Poll interval in seconds (overrides config)
    #[arg(long, env = "DIALDECK_POLL_INTERVAL")]
    poll_interval: Option<u64>,

    /// Call-list page size (overrides config)
    #[arg(long, env = "DIALDECK_PAGE_SIZE")]
    page_size: Option<usize>,

    /// Log file path (defaults to /tmp/dialdeck.log)
    #[arg(long, default_value = "/tmp/dialdeck.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "dialdeck_tui={log_level},dialdeck_core={log_level},dialdeck_api={log_level}"
        ))
    });

    let log_dir = cli.log_file.parent().unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("dialdeck.log"));

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

/// Build the session from config file + CLI overrides.
fn build_session(cli: &Cli) -> Result<Session> {
    let mut config = dialdeck_config::load_config_or_default();
    if let Some(server) = &cli.server {
        config.server.clone_from(server);
    }
    if let Some(interval) = cli.poll_interval {
        config.poll_interval = interval;
    }
    if let Some(size) = cli.page_size {
        config.page_size = size;
    }

    let url = config
        .server_url()
        .map_err(|e| eyre!("bad server URL: {e}"))?;
    let client = ConsoleClient::new(&url, &config.transport())
        .map_err(|e| eyre!("failed to build HTTP client: {e}"))?;

    Ok(Session::with_settings(
        client,
        config.poll_interval(),
        config.page_size,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    info!(
        server = cli.server.as_deref().unwrap_or("(from config)"),
        "starting dialdeck"
    );

    let session = build_session(&cli)?;
    let mut app = App::new(session);
    app.run().await?;

    Ok(())
}
