//! Trusted issuers registry.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client / proxy
//!         │
//!         ▼
//!     ┌─────────┐   ┌────────────┐   ┌──────────────┐   ┌────────────┐
//!     │   net   │──▶│ forwarding │──▶│ http (TIL /  │──▶│  registry  │
//!     │listener │   │   filter   │   │ TIR handlers)│   │   store    │
//!     └─────────┘   └────────────┘   └──────┬───────┘   └────────────┘
//!                                           │
//!                                           ▼
//!                                     ┌────────────┐
//!                                     │ pagination │
//!                                     └────────────┘
//!
//!     Cross-cutting: config, observability, lifecycle
//! ```

use std::path::PathBuf;

use clap::Parser;

use trusted_issuers_registry::lifecycle::{signals, startup};
use trusted_issuers_registry::{net, HttpServer, Shutdown};

#[derive(Parser, Debug)]
#[command(author, version, about = "Trusted issuers registry", long_about = None)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "REGISTRY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = startup::resolve_config(args.config.as_deref())?;
    startup::init_observability(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.server.bind_address,
        base_path = %config.api.base_path,
        tls = config.server.tls.is_some(),
        request_timeout_secs = config.timeouts.request_secs,
        "trusted-issuers-registry starting"
    );

    let store = startup::open_store(&config.storage)?;
    let listener = net::bind(&config.server.bind_address).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config, store.clone());
    server.run(listener, shutdown.subscribe()).await?;

    if let Err(e) = store.save_to_file() {
        tracing::error!(error = %e, "Failed to write issuer snapshot");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
