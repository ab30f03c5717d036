use axum::Router;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{HealthResponse, LogQuizAnswer, NewUser, Stats, UpdateStamps, User, WriteAck},
    AppState,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::health_check,
        // User endpoints
        crate::routes::users::list_users,
        crate::routes::users::get_user,
        crate::routes::users::save_user,
        crate::routes::users::update_stamps,
        // Quiz endpoints
        crate::routes::quizzes::log_quiz_answer,
        // Stats endpoints
        crate::routes::stats::get_stats,
    ),
    components(
        schemas(
            NewUser, User, UpdateStamps, LogQuizAnswer, Stats, WriteAck, HealthResponse
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "users", description = "User records keyed by email"),
        (name = "quizzes", description = "Append-only quiz attempt log"),
        (name = "stats", description = "Stamp totals across users"),
    ),
    info(
        title = "huntdb API",
        version = "0.1.0",
        description = "Document-store helpers for the campus stamp hunt"
    ),
    servers(
        (url = "/", description = "Service root")
    )
)]
pub struct ApiDoc;

pub fn create_swagger_router() -> Router<Arc<AppState>> {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
