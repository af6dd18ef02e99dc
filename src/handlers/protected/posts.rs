// handlers/protected/posts.rs - post CRUD for authenticated users

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};

use crate::database::models::Post;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{CreatePost, UpdatePost};
use crate::state::AppState;
use crate::types::PostId;

/// GET /posts - List every visible post
pub async fn list(State(state): State<AppState>, _caller: AuthUser) -> ApiResult<Vec<Post>> {
    let posts = state.posts.list().await?;
    Ok(ApiResponse::success("Posts fetched successfully", posts))
}

/// POST /posts - Create a post owned by the caller
///
/// Expected Input:
/// ```json
/// { "title": "Hello", "content": "World" }
/// ```
///
/// Expected Output (201):
/// ```json
/// {
///   "message": "Post created successfully",
///   "data": {
///     "id": 1,
///     "user_id": 1,
///     "title": "Hello",
///     "content": "World",
///     "is_active": true,
///     "date_created": "2026-01-01T00:00:00Z",
///     "last_updated": "2026-01-01T00:00:00Z"
///   }
/// }
/// ```
pub async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    payload: Result<Json<CreatePost>, JsonRejection>,
) -> ApiResult<Post> {
    let Json(input) = payload?;
    let post = state.posts.create(caller.id, input).await?;
    Ok(ApiResponse::created("Post created successfully", post))
}

/// GET /posts/:id - Fetch one of your posts
pub async fn get(
    State(state): State<AppState>,
    caller: AuthUser,
    id: Result<Path<PostId>, PathRejection>,
) -> ApiResult<Post> {
    let Path(id) = id?;
    let post = state.posts.get(caller.id, id).await?;
    Ok(ApiResponse::success("Post fetched successfully", post))
}

/// PUT /posts/:id - Partially update one of your posts
pub async fn update(
    State(state): State<AppState>,
    caller: AuthUser,
    id: Result<Path<PostId>, PathRejection>,
    payload: Result<Json<UpdatePost>, JsonRejection>,
) -> ApiResult<Post> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let post = state.posts.update(caller.id, id, input).await?;
    Ok(ApiResponse::success("Post updated successfully", post))
}

/// PUT /posts/:id/delete - Soft-delete one of your posts
pub async fn delete(
    State(state): State<AppState>,
    caller: AuthUser,
    id: Result<Path<PostId>, PathRejection>,
) -> ApiResult<Post> {
    let Path(id) = id?;
    let post = state.posts.delete(caller.id, id).await?;
    Ok(ApiResponse::success("Post deleted successfully", post))
}
