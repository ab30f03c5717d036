use axum::{extract::State, response::Json, routing::get, Router};
use std::sync::Arc;

use crate::{errors::StoreError, models::Stats, AppState};

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_stats))
}

#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "stats",
    responses(
        (status = 200, description = "User and stamp totals", body = Stats),
        (status = 502, description = "Document store failure")
    )
)]
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<Stats>, StoreError> {
    let stats = state.db.get_stats().await?;
    Ok(Json(stats))
}
