use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use crate::{
    api::{ApiError, ApiResult},
    db::repositories::{PostRepository, UserRepository},
    state::AppState,
};
use ripple_types::{CreatePostRequest, Post};

/// Interactive posts may be longer than generated ones, but stay bounded
const MAX_POST_LEN: usize = 500;

/// POST /posts - Create a new post
pub async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> ApiResult<Json<Post>> {
    // Validate content length
    if payload.content.is_empty() {
        return Err(ApiError::BadRequest(
            "Post content cannot be empty".to_string(),
        ));
    }
    if payload.content.len() > MAX_POST_LEN {
        return Err(ApiError::BadRequest(format!(
            "Post content exceeds {} character limit (current: {})",
            MAX_POST_LEN,
            payload.content.len()
        )));
    }

    let pool = state.db.pool.clone();
    let user_repo = UserRepository::new(pool.clone());
    let post_repo = PostRepository::new(pool);

    // Verify the author exists
    user_repo
        .get_by_id(payload.user_id)
        .map_err(|e| ApiError::InternalError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let post = post_repo
        .create(payload.user_id, &payload.content, Utc::now())
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    // Keep the denormalized counter in step without a read-modify-write
    user_repo
        .increment_posts_count(payload.user_id)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(Json(post))
}

/// POST /posts/:id/like - Like a post
pub async fn like_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let post_repo = PostRepository::new(state.db.pool.clone());

    let likes = post_repo
        .like(post_id)
        .map_err(|e| ApiError::InternalError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(Json(serde_json::json!({
        "message": "Post liked successfully",
        "post_id": post_id,
        "likes": likes
    })))
}
