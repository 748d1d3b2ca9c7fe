use skillshare_backend::{config::Config, error::Result, routes, state::AppState};
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skillshare_backend=info,tower_http=info".into()),
        )
        .with_target(false)
        .init();

    info!("Starting SkillShare backend...");

    // Load configuration
    let config = Config::from_env()
        .map_err(|e| skillshare_backend::AppError::Config(e.to_string()))?;

    info!("Configuration loaded");

    // Initialize application state
    let state = AppState::new(config.clone())
        .await
        .map_err(skillshare_backend::AppError::Internal)?;

    info!("Application state initialized");

    // Create router
    let app = routes::create_router(state);

    // Build address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));

    info!("Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| skillshare_backend::AppError::Internal(anyhow::anyhow!("Failed to bind: {}", e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| skillshare_backend::AppError::Internal(anyhow::anyhow!("Server error: {}", e)))?;

    Ok(())
}
