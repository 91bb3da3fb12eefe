//! Smart Parking HTTP Server Binary
//!
//! This is the main entry point for the parking prediction REST API.
//! It loads the configuration, sets up the model registry and the HTTP
//! router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin parking-server
//!
//! # Explicit configuration file
//! PARKING_CONFIG=/etc/parking.toml cargo run --bin parking-server
//! ```
//!
//! # Environment Variables
//!
//! - `PARKING_CONFIG`: Configuration file (default: search for `parking.toml`)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `VACANCY_MODEL_PATH`: Vacancy model artifact
//! - `VEHICLE_MODEL_PATH`: Vehicle-type model artifact
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use smart_parking::classifier::ModelRegistry;
use smart_parking::config::ServiceConfig;
use smart_parking::http::{create_router, AppState};

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
        .with_thread_ids(true)
        .init();

    info!("Starting Smart Parking HTTP Server");

    let config_path = env::var("PARKING_CONFIG").ok().map(PathBuf::from);
    let config = ServiceConfig::load(config_path.as_deref())?;
    info!(
        "Models: vacancy={} vehicle={}",
        config.models.vacancy_path.display(),
        config.models.vehicle_path.display()
    );

    let registry = Arc::new(ModelRegistry::from_config(&config.models));
    if config.models.eager_load {
        let preload = Arc::clone(&registry);
        tokio::task::spawn_blocking(move || preload.preload()).await??;
        info!("Models loaded");
    } else {
        info!("Models will load on first prediction");
    }
    if !config.models.vacancy_path.exists() || !config.models.vehicle_path.exists() {
        warn!("A configured model artifact does not exist yet; predictions will return 503");
    }

    let app = create_router(AppState::new(registry));

    let addr = config.bind_addr()?;
    info!("Server listening on http://{}", addr);
    info!("API documentation: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
