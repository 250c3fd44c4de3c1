use tracing_subscriber::EnvFilter;

use tramites_search::api;
use tramites_search::config::Config;
use tramites_search::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!("Catalog: {}", config.catalog_path.display());

    let state = AppState::new(config.clone())?;
    tracing::info!("Loaded {} procedures", state.engine.catalog().len());

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
