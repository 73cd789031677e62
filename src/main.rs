use std::sync::Arc;

use blogsmith::{build_app, config::AppConfig, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    info!(
        region = %config.region,
        model_id = %config.model_id,
        bucket = %config.bucket,
        "starting blogsmith"
    );

    let state = Arc::new(AppState::from_config(&config));
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .expect("bind failed");
    info!(port = config.port, "listening");

    axum::serve(listener, app).await.expect("server failed");
}
