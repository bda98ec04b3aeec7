//! Livepanel headless driver
//!
//! Runs the preview synchronization engine from a terminal against a real
//! rendering endpoint: the edit form is a JSON file re-read every poll
//! tick, the panel is an in-memory host that logs its transitions. Edit
//! the file while the driver runs and watch submissions fire.

use std::path::PathBuf;

use clap::Parser;
use url::Url;

use livepanel_client::{panel_surface_url, parse_preview_url, HttpRenderEndpoint};
use livepanel_core::prelude::*;
use livepanel_engine::{PanelConfig, PanelEngine, DEFAULT_MODE, DEFAULT_POLL_MS};

mod headless;

use headless::{FileFormSource, HeadlessHost};

/// Drive a live-preview panel from the terminal
#[derive(Parser, Debug)]
#[command(name = "livepanel")]
#[command(about = "Headless driver for the live preview synchronization engine", long_about = None)]
struct Args {
    /// Rendering endpoint accepting form-encoded POSTs
    #[arg(value_name = "ENDPOINT_URL")]
    endpoint: String,

    /// URL the preview surface displays
    #[arg(long, value_name = "URL")]
    preview_url: String,

    /// JSON object file holding the edit form's field values
    #[arg(long, value_name = "FILE")]
    form: PathBuf,

    /// Initial preview mode
    #[arg(long, default_value = DEFAULT_MODE)]
    mode: String,

    /// Poll cadence in milliseconds
    #[arg(long, default_value_t = DEFAULT_POLL_MS)]
    poll_ms: u64,

    /// Disable the automatic update loop
    #[arg(long)]
    no_auto_update: bool,

    /// Submit once and exit instead of polling
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    color_eyre::install().map_err(|e| Error::config(e.to_string()))?;
    livepanel_core::logging::init()?;
    eprintln!(
        "logging to {}",
        livepanel_core::logging::get_current_log_file()?.display()
    );

    let endpoint = Url::parse(&args.endpoint)
        .map_err(|e| Error::invalid_url(format!("endpoint {}: {e}", args.endpoint)))?;
    let preview = parse_preview_url(&args.preview_url)?;
    let surface_src = panel_surface_url(&preview, &args.mode);

    let host = HeadlessHost::new(surface_src.as_str(), !args.no_auto_update);
    let endpoint = HttpRenderEndpoint::new(endpoint);
    let form = FileFormSource::new(args.form);
    let config = PanelConfig::new()
        .with_poll_ms(args.poll_ms)
        .with_initial_mode(args.mode);

    let Some((engine, handle)) = PanelEngine::attach(host, endpoint, form, config)? else {
        // a headless host always has a panel; kept for symmetry with
        // hosts that may not
        return Ok(());
    };

    let task = tokio::spawn(engine.run());

    if args.once {
        handle.sync_now().await?;
        handle.shutdown().await?;
    } else {
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| Error::config(format!("signal handler: {e}")))?;
        info!("interrupted, shutting down");
        handle.shutdown().await?;
    }

    task.await.map_err(|e| Error::config(format!("engine task: {e}")))?
}
