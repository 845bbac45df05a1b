//! DSMR Bridge binary.
//!
//! Bootstraps logging and configuration, then serves the scrape
//! endpoint until shut down. Only configuration problems are fatal;
//! upstream device failures surface per scrape.

use clap::Parser;
use dsmr_bridge::{
    config::{Args, BridgeConfig},
    fetch::Fetcher,
    metrics::MeterMetrics,
    server::{BridgeServer, LISTEN_PORT},
};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing, RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match BridgeConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let fetcher = match Fetcher::new(config.base_url.clone()) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("failed to build upstream client: {e}");
            std::process::exit(1);
        }
    };

    let metrics = match MeterMetrics::new() {
        Ok(metrics) => metrics,
        Err(e) => {
            eprintln!("failed to build metrics registry: {e}");
            std::process::exit(1);
        }
    };

    info!("dsmr-bridge v{}", dsmr_bridge::VERSION);
    info!(base_url = %config.base_url, port = LISTEN_PORT, "starting bridge");

    if let Err(e) = BridgeServer::new(fetcher, metrics).run().await {
        eprintln!("server error: {e}");
        std::process::exit(1);
    }
}
