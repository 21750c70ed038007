//! gsdash development server -- in-memory stand-in for the task server.
//!
//! # Usage
//!
//! ```bash
//! # Run on the dashboard's default address 127.0.0.1:5000
//! cargo run --bin gsdash-devserver
//!
//! # Run on a custom address with demo data
//! cargo run --bin gsdash-devserver -- --bind 127.0.0.1:8080 --seed
//! ```

use std::sync::Arc;

use clap::Parser;
use gsdash_devserver::config::{ServerCliArgs, ServerConfig};
use gsdash_devserver::server::{self, ServerState};

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(addr = %config.bind_addr, "starting gsdash devserver");

    let state = Arc::new(ServerState::with_page_size(config.default_page_size));
    if config.seed_demo_data {
        state.store.seed_demo().await;
    }

    match server::start_server_with_state(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "devserver listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "devserver task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start devserver");
            std::process::exit(1);
        }
    }
}
