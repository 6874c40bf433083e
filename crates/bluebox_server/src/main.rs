use anyhow::{Context, Result};
use bluebox_server::{
    BlueboxConfig, ObservabilityConfig, Secrets, build_state, init_observability, router,
};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Bluebox streaming chat relay", long_about = None)]
struct Args {
    /// Configuration file layered over the bundled and user defaults
    #[arg(short, long, env = "BLUEBOX_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address (overrides server.host)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Send basic-tier output without pacing delays
    #[arg(long)]
    no_pacing: bool,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = BlueboxConfig::load(args.config.as_deref())?;

    let log_filter = if args.verbose {
        "debug".to_string()
    } else {
        config.server.log_filter.clone()
    };
    init_observability(&ObservabilityConfig {
        log_filter,
        json_logs: args.json_logs,
    })
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let state = build_state(&config, &Secrets::from_env(), args.no_pacing)?;

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let address = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    info!(%address, "Bluebox relay listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Bluebox relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
