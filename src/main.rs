//! len-router server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request        ┌──────────────────────────────────────────────┐
//!     ──────────────────────┼─▶ http server ──▶ routing::Router::dispatch  │
//!                           │                     │                        │
//!                           │          ┌──────────┴──────────┐             │
//!                           │          ▼                     ▼             │
//!                           │     guess cache  ──miss──▶ brute pass        │
//!                           │     (per length)  ◀─learn──  (all routes)    │
//!                           │          │                     │             │
//!                           │          └──────────┬──────────┘             │
//!     Client Response       │                     ▼                        │
//!     ◀─────────────────────┼──────────── handler / 404                    │
//!                           │                                              │
//!                           │  config · observability · admin · lifecycle  │
//!                           └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use len_router::admin::{setup_admin_router, AdminState};
use len_router::config::{load_config, AppConfig};
use len_router::http::{echo_handler, HttpHandle, HttpServer};
use len_router::observability::{logging, metrics};
use len_router::{Endpoint, Router, Shutdown};

#[derive(Parser)]
#[command(name = "len-router")]
#[command(about = "HTTP path router with a length-bucketed fast path", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "len-router starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.router.routes.len(),
        max_path_len = config.router.max_path_len,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let endpoints = config.router.routes.iter().map(|route| {
        let endpoint: Endpoint<HttpHandle> =
            Endpoint::new(route.pattern.clone(), echo_handler(route.name.clone()));
        match &route.method {
            Some(method) => endpoint.with_method(method.clone()),
            None => endpoint,
        }
    });
    let router = Arc::new(Router::new(config.router.max_path_len, endpoints));
    for (index, endpoint) in router.endpoints().iter().enumerate() {
        tracing::debug!(
            index,
            method = endpoint.method().unwrap_or("*"),
            pattern = endpoint.pattern(),
            params = endpoint.compiled().param_count(),
            "Route registered"
        );
    }

    let shutdown = Shutdown::new();

    let admin = if config.admin.enabled {
        let listener = TcpListener::bind(&config.admin.bind_address).await?;
        tracing::info!(address = %listener.local_addr()?, "Admin API listening");
        let app = setup_admin_router(AdminState {
            router: router.clone(),
            api_key: config.admin.api_key.as_str().into(),
        });
        let signal = shutdown.signal();
        Some(tokio::spawn(async move {
            axum::serve(listener, app).with_graceful_shutdown(signal).await
        }))
    } else {
        None
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config, router);
    let signal = shutdown.signal();
    let serving = tokio::spawn(server.run(listener, signal));

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    shutdown.trigger();

    serving.await??;
    if let Some(admin) = admin {
        admin.await??;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
