use anyhow::Result;
use brain_core::config::DATA_DIR_ENV;
use brain_core::{BrainConfig, BrainIndex};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};
use brain_server::build_app;
use tokio::net::TcpListener;

#[derive(Parser)]
struct Args {
    /// Corpus root holding the apis/, docs/ and concepts/ directories
    #[arg(long, env = DATA_DIR_ENV, default_value = brain_core::config::DEFAULT_DATA_DIR)]
    data_dir: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Skip the startup rebuild; the first query builds the index instead
    #[arg(long, default_value_t = false)]
    no_warm: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let brain = Arc::new(BrainIndex::new(BrainConfig::new(&args.data_dir)));

    if !args.no_warm {
        let warm = brain.clone();
        tokio::task::spawn_blocking(move || warm.rebuild()).await?;
    }

    let data_dir = brain.config().root.clone();
    let app = build_app(brain);
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, data_dir = %data_dir.display(), "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
