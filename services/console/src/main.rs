use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod error;
mod middleware;
mod models;
mod routes;
mod state;

use common::config::HubConfig;

use crate::state::{AppState, BackendMode};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; RUST_LOG overrides the INFO default
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting console service");

    let config = HubConfig::from_env()?;
    let app_state = AppState::from_config(&config)?;

    match &app_state.backend {
        BackendMode::Mock(_) => info!(
            "Serving from the in-memory mock backend ({} ms latency)",
            config.mock_delay_ms
        ),
        BackendMode::Remote(client) => info!("Forwarding to backend at {}", client.base_url()),
    }

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.console_addr).await?;
    info!("Console service listening on {}", config.console_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
