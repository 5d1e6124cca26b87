use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use gauntlet::oracle::{CerebrasOracle, OracleConfig};
use gauntlet::server::{serve, AppState};

/// HTTP service running LLM-judged elimination tournaments.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the HTTP API on
    #[arg(long, default_value = "0.0.0.0:8000")]
    bind: SocketAddr,

    /// Path to the candidates JSON store
    #[arg(long, default_value = "api/candidates.json")]
    store: PathBuf,

    /// Override the oracle model name
    #[arg(long)]
    model: Option<String>,

    /// Override the oracle base URL
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = OracleConfig::from_env()?;
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }

    let oracle = CerebrasOracle::new(config)?;
    let state = AppState {
        oracle: Arc::new(oracle),
        store_path: args.store,
    };

    serve(state, args.bind).await
}
