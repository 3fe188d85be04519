// servistrack - service-order tracking backend
// Entry point and application setup

use servistrack::app::{router, AppState};
use servistrack::config::AppConfig;
use servistrack::database::create_pool;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "servistrack=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting servistrack");

    let config = Arc::new(AppConfig::from_env());

    let pool = create_pool(Path::new(&config.database_path)).await?;

    let state = AppState::new(pool, config.clone());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
