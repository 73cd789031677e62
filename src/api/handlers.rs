use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info};

use crate::storage::object_key;
use crate::AppState;

use super::models::{ErrorResponse, GenerateRequest, GenerateResponse};

pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, (StatusCode, Json<ErrorResponse>)> {
    let topic = payload.blog_topic.trim();
    if topic.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Field \"blog_topic\" must be a non-empty string".to_string(),
            }),
        ));
    }

    let blog = state.inference.generate(topic).await.map_err(|err| {
        error!(topic, "model invocation failed: {err}");
        (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: format!("blog generation failed: {err}"),
            }),
        )
    })?;

    if blog.is_empty() {
        info!(topic, "model returned an empty generation, skipping storage");
        return Ok(Json(GenerateResponse {
            message: "no blog was generated".to_string(),
            object_key: None,
        }));
    }

    let key = object_key();
    state.store.put(&key, &blog).await.map_err(|err| {
        error!(key = %key, bucket = state.store.bucket(), "failed to store blog: {err}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("failed to store generated blog: {err}"),
            }),
        )
    })?;

    info!(key = %key, bucket = state.store.bucket(), "blog generation completed");
    Ok(Json(GenerateResponse {
        message: "blog generation completed".to_string(),
        object_key: Some(key),
    }))
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "route not found".to_string(),
        }),
    )
        .into_response()
}
