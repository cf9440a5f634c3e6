use anyhow::Context;
use dotenv::dotenv;
use tracing::info;

use construct_site::{app::create_router, app_state::AppState, config::Config, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    telemetry::init_telemetry(None)?;

    let config = Config::from_env().context("Failed to load configuration")?;
    let addr = config.server_addr();
    let app_name = config.app.name.clone();

    let state = AppState::initialize(config).await;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("{} Listening on {}", app_name, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Failed to serve application")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
