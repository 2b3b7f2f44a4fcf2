//! Serve command - run the HTTP extraction service.

use std::path::PathBuf;

use clap::Args;
use console::style;

use invx_core::models::config::DEFAULT_DEBUG_OUTPUT;

use super::load_config;

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind (default from config: 0.0.0.0)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (default from config: 8000)
    #[arg(short, long)]
    port: Option<u16>,

    /// Write the raw OCR text of every request to a file
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = DEFAULT_DEBUG_OUTPUT)]
    debug_ocr: Option<PathBuf>,
}

pub async fn run(args: ServeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(path) = args.debug_ocr {
        config.ocr.debug_output = Some(path);
    }

    eprintln!(
        "{} Serving on http://{}:{} (POST /process-invoice/)",
        style("ℹ").blue(),
        config.server.host,
        config.server.port
    );

    invx_core::api::serve(&config).await?;

    Ok(())
}
