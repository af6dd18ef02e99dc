use axum::extract::State;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET / - Greeting
pub async fn root() -> ApiResponse<Value> {
    ApiResponse::success(
        "Welcome to the API",
        json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// GET /about - Service description and endpoint map
pub async fn about() -> ApiResponse<Value> {
    ApiResponse::success(
        "About this API",
        json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "endpoints": {
                "users": "POST /users, POST /users/login, POST /users/refresh, GET /users (public)",
                "user": "GET|PUT|DELETE /users/:id (protected, self only)",
                "posts": "GET|POST /posts (protected)",
                "post": "GET|PUT /posts/:id, PUT /posts/:id/delete (protected, owner only)",
                "health": "/health (public)",
            }
        }),
    )
}

/// GET /health - Storage liveness check
///
/// 200 when storage answers, 503 with the error envelope otherwise.
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    state.storage.health_check().await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::service_unavailable("Database unavailable")
    })?;

    Ok(ApiResponse::success(
        "API is running",
        json!({
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "database": "ok"
        }),
    ))
}
