//! Development backend for the talent marketplace API.
//!
//! Serves the role-scoped auth, profile and upload endpoints from memory so
//! the `talent` CLI can be exercised without the production service.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use talent_client::backend::BackendServer;
use talent_client::config::load_or_default;
use talent_client::lifecycle::Shutdown;
use talent_client::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "talent-backend")]
#[command(about = "In-memory development backend", long_about = None, version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config)
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.backend.bind_address = bind;
    }
    logging::init(&config.observability);

    tracing::info!(
        bind_address = %config.backend.bind_address,
        request_timeout_secs = config.backend.request_timeout_secs,
        max_body_size = config.backend.max_body_size,
        "Configuration loaded"
    );

    if let Some(address) = &config.backend.metrics_address {
        match address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(metrics_address = %address, "Failed to parse metrics address"),
        }
    }

    let listener = TcpListener::bind(&config.backend.bind_address).await?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    BackendServer::new(&config.backend)
        .run(listener, shutdown.wait())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
