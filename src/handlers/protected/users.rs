// handlers/protected/users.rs - self-service account endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::UpdateUser;
use crate::state::AppState;
use crate::types::UserId;

/// GET /users/:id - Fetch your own user record
pub async fn get(
    State(state): State<AppState>,
    caller: AuthUser,
    id: Result<Path<UserId>, PathRejection>,
) -> ApiResult<User> {
    let Path(id) = id?;
    let user = state.users.get(caller.id, id).await?;
    Ok(ApiResponse::success("User fetched successfully", user))
}

/// PUT /users/:id - Partially update your own email or names
///
/// Expected Input (any subset):
/// ```json
/// { "email": "new@x.com", "first_name": "A", "last_name": "B" }
/// ```
pub async fn update(
    State(state): State<AppState>,
    caller: AuthUser,
    id: Result<Path<UserId>, PathRejection>,
    payload: Result<Json<UpdateUser>, JsonRejection>,
) -> ApiResult<User> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let user = state.users.update(caller.id, id, input).await?;
    Ok(ApiResponse::success("User updated successfully", user))
}

/// DELETE /users/:id - Soft-delete your own account
///
/// Returns the record as it was before deletion.
pub async fn delete(
    State(state): State<AppState>,
    caller: AuthUser,
    id: Result<Path<UserId>, PathRejection>,
) -> ApiResult<User> {
    let Path(id) = id?;
    let user = state.users.delete(caller.id, id).await?;
    Ok(ApiResponse::success("User deleted successfully", user))
}
