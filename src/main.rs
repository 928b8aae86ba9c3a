//! Storefront pricing service

use anyhow::Result;
use storefront_pricing::api::{router, AppState};
use storefront_pricing::config::Config;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port = config.port;
    tracing::info!(currency = %config.currency, "loaded configuration");
    let app = router(AppState::new(config)).layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive());

    tracing::info!("storefront pricing listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}
