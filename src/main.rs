//! BFHL operations service binary.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use bfhl_service::config::{load_config, load_default};
use bfhl_service::observability::{logging, metrics};
use bfhl_service::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "bfhl-service")]
#[command(about = "JSON operations API: fibonacci, prime, lcm, hcf and AI", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults plus environment when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => load_default()?,
    };

    logging::init(&config.observability.log_level);

    tracing::info!("bfhl-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_requests = config.limits.max_requests,
        window_secs = config.limits.window_secs,
        max_body_bytes = config.limits.max_body_bytes,
        ai_enabled = config.ai.enabled,
        "Configuration loaded"
    );
    if config.identity.official_email.is_empty() {
        tracing::warn!("official_email is empty; set OFFICIAL_EMAIL or identity.official_email");
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown.clone().trigger_on_signal());

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
