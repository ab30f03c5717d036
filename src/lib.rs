pub mod config;
pub mod errors;
pub mod facade;
pub mod models;
pub mod routes;
pub mod store;
pub mod swagger;

#[cfg(test)]
mod tests;

use axum::{response::Json, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};

use config::Config;
use facade::DbUtil;
use models::HealthResponse;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: DbUtil,
    pub config: Config,
}

/// Health check endpoint for monitoring
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        store: state.db.store().name().to_string(),
    })
}

/// Full HTTP application: the JSON API, the OpenAPI document and the
/// front-end page served from `config.static_dir`.
pub fn create_app(state: Arc<AppState>) -> Router {
    let static_dir = state.config.static_dir.trim_end_matches('/').to_string();
    let index = format!("{}/index.html", static_dir);

    Router::new()
        .route("/api/health", get(health_check))
        .nest("/api/users", routes::users::router())
        .nest("/api/quizzes", routes::quizzes::router())
        .nest("/api/stats", routes::stats::router())
        .merge(swagger::create_swagger_router())
        .fallback_service(ServeDir::new(&static_dir).fallback(ServeFile::new(index)))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
