use axum::{extract::State, Json};

use crate::{
    api::{ApiError, ApiResult},
    seed::{BulkStore, Seeder},
    state::AppState,
};
use ripple_types::GenerateResponse;

/// POST /generate-test-data - Run the bulk generation pipeline
///
/// The run is synchronous database work that can take a while at the default
/// volume, so it is moved off the async executor onto a blocking worker. The
/// store connection is single-writer for the whole run; callers should not
/// trigger two runs against the same database concurrently.
pub async fn generate_test_data(
    State(state): State<AppState>,
) -> ApiResult<Json<GenerateResponse>> {
    let db = state.db.clone();
    let config = state.seed.clone();

    let summary = tokio::task::spawn_blocking(move || {
        let conn = db
            .connection()
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        let seeder = Seeder::new(BulkStore::new(conn), config);
        seeder.run().map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::InternalError(format!("generation task failed: {e}")))??;

    Ok(Json(GenerateResponse {
        message: summary.message,
        total_posts: summary.total_posts,
    }))
}
