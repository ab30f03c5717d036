use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use huntdb::{config::Config, create_app, facade::DbUtil, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    info!(
        "Using {:?} store for project '{}'",
        config.store_backend, config.firebase.project_id
    );

    // One store handle for the lifetime of the process
    let db = DbUtil::from_config(&config)?;

    let state = Arc::new(AppState {
        db,
        config: config.clone(),
    });
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&config.server_address).await?;
    info!("Server starting on {}", config.server_address);
    info!("Serving front-end from {}", config.static_dir);

    axum::serve(listener, app).await?;

    Ok(())
}
