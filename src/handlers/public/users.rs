// handlers/public/users.rs - account creation and token acquisition

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{LoginRequest, LoginResponse, RefreshRequest, RegisterUser};
use crate::state::AppState;

/// POST /users - Register a new user account
///
/// Expected Input:
/// ```json
/// {
///   "email": "a@x.com",
///   "username": "a",
///   "first_name": "A",
///   "last_name": "B",
///   "password": "secret"
/// }
/// ```
///
/// Expected Output (201):
/// ```json
/// {
///   "message": "User created successfully",
///   "data": {
///     "id": 1,
///     "email": "a@x.com",
///     "username": "a",
///     "first_name": "A",
///     "last_name": "B",
///     "is_active": true,
///     "date_created": "2026-01-01T00:00:00Z",
///     "last_updated": "2026-01-01T00:00:00Z"
///   }
/// }
/// ```
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterUser>, JsonRejection>,
) -> ApiResult<User> {
    let Json(input) = payload?;
    let user = state.users.register(input).await?;
    Ok(ApiResponse::created("User created successfully", user))
}

/// POST /users/login - Exchange credentials for an access/refresh token pair
///
/// Expected Input:
/// ```json
/// { "email": "a@x.com", "password": "secret" }
/// ```
///
/// Expected Output:
/// ```json
/// {
///   "message": "Login successful",
///   "data": {
///     "access": "eyJhbGciOiJIUzI1NiI...",
///     "refresh": "eyJhbGciOiJIUzI1NiI...",
///     "expires_in": 900,
///     "id": 1,
///     "email": "a@x.com",
///     "first_name": "A",
///     "last_name": "B"
///   }
/// }
/// ```
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(input) = payload?;
    let tokens = state.users.login(input).await?;
    Ok(ApiResponse::success("Login successful", tokens))
}

/// POST /users/refresh - Trade a refresh token for a fresh pair
///
/// Expected Input:
/// ```json
/// { "refresh": "eyJhbGciOiJIUzI1NiI..." }
/// ```
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(input) = payload?;
    let tokens = state.users.refresh(input).await?;
    Ok(ApiResponse::success("Tokens refreshed successfully", tokens))
}

/// GET /users - List all live users
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = state.users.list().await?;
    Ok(ApiResponse::success("Users fetched successfully", users))
}
