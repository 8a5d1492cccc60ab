//! filedrop - minimal HTTP file hosting
//!
//! Serves `public/`, accepts single-file uploads into `uploads/`, and lists
//! stored files at `/files`.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use filedrop_server::{run_server, ServerArgs, ServerConfig};
use tracing_subscriber::EnvFilter;

fn init_tracing(debug: bool) -> Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();
    init_tracing(args.debug).context("Failed to initialize tracing")?;

    let config = ServerConfig::from(&args);
    tracing::debug!(?config, "configuration loaded");

    run_server(config).await.context("Server error")?;

    Ok(())
}
