use axum::{extract::State, response::Json, routing::post, Router};
use std::sync::Arc;

use crate::{
    errors::StoreError,
    models::{truthy, LogQuizAnswer, WriteAck},
    AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(log_quiz_answer))
}

#[utoipa::path(
    post,
    path = "/api/quizzes",
    tag = "quizzes",
    request_body = LogQuizAnswer,
    responses(
        (status = 200, description = "Attempt appended to the quiz log", body = WriteAck),
        (status = 502, description = "Document store failure")
    )
)]
pub async fn log_quiz_answer(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LogQuizAnswer>,
) -> Result<Json<WriteAck>, StoreError> {
    let ack = state
        .db
        .log_quiz_answer(&request.email, &request.location_id, truthy(&request.correct))
        .await?;
    Ok(Json(ack))
}
