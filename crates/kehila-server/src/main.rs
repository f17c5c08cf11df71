//! KEHILA Server — application entry point.

use kehila_auth::external::JwksVerifier;
use kehila_db::DbManager;
use kehila_server::{AppState, ServerConfig, router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("kehila=info".parse()?),
        )
        .json()
        .init();

    let config = ServerConfig::from_env()?;

    let manager = DbManager::connect(&config.db).await?;
    manager.ping().await?;
    kehila_db::run_migrations(manager.client()).await?;

    let external = config.external.clone().map(JwksVerifier::new);
    let state = AppState::new(manager.client().clone(), config.auth.clone(), external);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "KEHILA server listening");

    axum::serve(listener, router(state)).await?;

    Ok(())
}
