use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use llamagate_config::{ConfigStore, FileConfigStore};
use llamagate_engine::InferenceEngine;
use llamagate_runtime::MockEngine;
use llamagate_server::{preload_default, run_server, AppState, ModelSession, DEFAULT_PORT};

/// llamagate — Ollama-compatible API server over a local model
#[derive(Parser)]
#[command(name = "llamagate")]
struct Cli {
    /// Port to listen on (loopback only).
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Data directory for configuration records and downloaded models.
    /// Defaults to the platform data dir.
    #[arg(short, long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let data_dir = cli
        .data_dir
        .or_else(|| dirs::data_local_dir().map(|d| d.join("llamagate")))
        .unwrap_or_else(|| PathBuf::from(".llamagate"));

    let store: Arc<dyn ConfigStore> = Arc::new(FileConfigStore::open(data_dir.join("configs"))?);
    // MockEngine until the llama.cpp binding lands; the server only sees
    // the trait.
    let engine: Arc<dyn InferenceEngine> = Arc::new(MockEngine::new());
    let session = ModelSession::new(engine, store.clone(), data_dir.join("models"));

    // Surface session lifecycle events in the log.
    let mut events = session.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => tracing::info!(?event, "session event"),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    let state = AppState { session, store };
    let addr = SocketAddr::from(([127, 0, 0, 1], cli.port));
    let handle = run_server(state.clone(), addr).await?;
    preload_default(&state);

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    handle.shutdown().await;
    Ok(())
}
