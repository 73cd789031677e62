mod handlers;
mod models;

use std::sync::Arc;

use axum::{routing::post, Router};

use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/generate", post(handlers::generate))
        .fallback(handlers::not_found)
        .with_state(state)
}
