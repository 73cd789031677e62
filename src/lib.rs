pub mod api;
pub mod config;
pub mod inference;
pub mod storage;

use std::sync::Arc;

use axum::Router;

use crate::config::AppConfig;
use crate::inference::InferenceClient;
use crate::storage::BlogStore;

pub struct AppState {
    pub inference: InferenceClient,
    pub store: BlogStore,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            inference: InferenceClient::new(config),
            store: BlogStore::new(config),
        }
    }
}

pub fn build_app(state: Arc<AppState>) -> Router {
    api::router(state)
}
