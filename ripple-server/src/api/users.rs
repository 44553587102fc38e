use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    api::{ApiError, ApiResult},
    db::repositories::{is_unique_violation, PostRepository, UserRepository},
    state::AppState,
};
use ripple_types::{CreateUserRequest, User, UserWithPosts};

#[derive(Deserialize)]
pub struct ListUsersQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default = "default_posts_limit")]
    posts_limit: i64,
}

fn default_limit() -> i64 {
    10
}

fn default_posts_limit() -> i64 {
    5
}

/// POST /users - Register a new user
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<Json<User>> {
    // Validate the identity fields before touching the store
    if payload.username.is_empty() || payload.username.len() > 50 {
        return Err(ApiError::BadRequest(
            "Username must be between 1 and 50 characters".to_string(),
        ));
    }
    if !payload.email.contains('@') || payload.email.len() > 100 {
        return Err(ApiError::BadRequest("Invalid email address".to_string()));
    }

    let user_repo = UserRepository::new(state.db.pool.clone());
    let user = user_repo
        .create(&payload.username, &payload.email)
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::BadRequest("Username or email already exists".to_string())
            } else {
                ApiError::InternalError(e.to_string())
            }
        })?;

    Ok(Json(user))
}

/// GET /users - List users with their most recent posts
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<Vec<UserWithPosts>>> {
    if query.skip < 0 {
        return Err(ApiError::BadRequest("skip must be non-negative".to_string()));
    }
    if !(1..=100).contains(&query.limit) {
        return Err(ApiError::BadRequest(
            "limit must be between 1 and 100".to_string(),
        ));
    }
    if !(1..=20).contains(&query.posts_limit) {
        return Err(ApiError::BadRequest(
            "posts_limit must be between 1 and 20".to_string(),
        ));
    }

    let pool = state.db.pool.clone();
    let user_repo = UserRepository::new(pool.clone());
    let post_repo = PostRepository::new(pool);

    let users = user_repo
        .list(query.skip, query.limit)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    let mut results = Vec::with_capacity(users.len());
    for user in users {
        let posts = post_repo
            .recent_by_user(user.id, query.posts_limit)
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        results.push(UserWithPosts {
            id: user.id,
            username: user.username,
            email: user.email,
            posts_count: user.posts_count,
            posts,
        });
    }

    Ok(Json(results))
}
