//! DiffGrid HTTP Server Binary
//!
//! This is the main entry point for the diffgrid REST API server.
//! It loads configuration, builds the store backend, and starts serving
//! requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with the in-memory store (default)
//! cargo run --bin diffgrid-server
//!
//! # Run with the JSON file store
//! # diffgrid.toml: [store] type = "file" root = "/var/lib/diffgrid"
//! cargo run --bin diffgrid-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use diffgrid::config::AppConfig;
use diffgrid::http::{create_router, AppState};
use diffgrid::store::StoreFactory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    info!("Starting DiffGrid HTTP Server");

    let config = AppConfig::from_default_location()?;
    info!(
        "Configured {} store, window size {}",
        config.store.store_type, config.grid.window_size
    );

    let store = StoreFactory::create(&config.store)?;
    let state = AppState::new(store, config.grid);

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
