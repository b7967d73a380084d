//! Edge TDA web UI.
//!
//! Upload an image at `/`, get redirected to `/result/<name>` with its
//! persistence summary.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use edge_tda::{config, web, ServerConfig};

/// Serve the upload/result web UI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with server and analysis settings; flags below override it
    #[arg(short, long, env = "EDGE_TDA_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "EDGE_TDA_BIND")]
    bind: Option<SocketAddr>,

    /// Directory where uploads are stored
    #[arg(long, env = "EDGE_TDA_UPLOAD_DIR")]
    upload_dir: Option<PathBuf>,

    /// Seed for reproducible subsampling
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn server_config(&self) -> Result<ServerConfig> {
        let mut cfg: ServerConfig = match &self.config {
            Some(path) => config::from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => ServerConfig::default(),
        };
        if let Some(bind) = self.bind {
            cfg.bind = bind;
        }
        if let Some(dir) = &self.upload_dir {
            cfg.upload_dir = dir.clone();
        }
        if self.seed.is_some() {
            cfg.analysis.seed = self.seed;
        }
        Ok(cfg)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,edge_tda=debug,tower_http=debug".into()),
        )
        .init();

    let cfg = Args::parse().server_config()?;
    web::serve(cfg).await?;
    Ok(())
}
