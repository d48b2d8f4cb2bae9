//! Phonebook API server
//!
//! Serves the contact directory over HTTP.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use phonebook_api::config::Backend;
use phonebook_api::{Server, ServerConfig};
use std::path::PathBuf;

/// Phonebook API server
#[derive(Parser, Debug)]
#[command(name = "phonebook-server")]
#[command(about = "Contact directory HTTP API", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory store backend (memory or redb)
    #[arg(long)]
    backend: Option<Backend>,

    /// Database file for the redb backend
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Start the memory backend empty
    #[arg(long)]
    no_seed: bool,

    /// Serve a built UI bundle from this directory
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,phonebook=debug".into()),
        )
        .init();

    let args = Args::parse();
    let mut config = ServerConfig::load(args.config.as_deref())?;

    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    if let Some(path) = args.db_path {
        config.db_path = path;
    }
    if args.no_seed {
        config.seed = false;
    }
    if let Some(dir) = args.static_dir {
        config.static_dir = Some(dir);
    }

    tracing::debug!(?config, "Resolved configuration");

    if let Err(e) = Server::new(config)?.run().await {
        tracing::error!("Server failed: {}", e);
        return Err(e.into());
    }
    Ok(())
}
