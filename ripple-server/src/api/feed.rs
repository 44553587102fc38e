use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    api::{ApiError, ApiResult},
    db::repositories::PostRepository,
    state::AppState,
};
use ripple_types::Post;

#[derive(Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_limit() -> i64 {
    10
}

/// GET /feed - Global feed, newest posts first
pub async fn get_feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> ApiResult<Json<Vec<Post>>> {
    if query.skip < 0 {
        return Err(ApiError::BadRequest("skip must be non-negative".to_string()));
    }
    if !(1..=100).contains(&query.limit) {
        return Err(ApiError::BadRequest(
            "limit must be between 1 and 100".to_string(),
        ));
    }

    let post_repo = PostRepository::new(state.db.pool.clone());
    let posts = post_repo
        .feed(query.skip, query.limit)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(Json(posts))
}
