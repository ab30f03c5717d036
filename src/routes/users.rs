use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{
    errors::StoreError,
    models::{NewUser, UpdateStamps, User, WriteAck},
    AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_users).post(save_user))
        .route("/{email}", get(get_user))
        .route("/{email}/stamps", put(update_stamps))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, description = "Every stored user, unordered", body = Vec<User>),
        (status = 502, description = "Document store failure")
    )
)]
pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>, StoreError> {
    let users = state.db.get_all_users().await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/users/{email}",
    tag = "users",
    params(
        ("email" = String, Path, description = "User email (document key)")
    ),
    responses(
        (status = 200, description = "The user, or null when none is stored under this email", body = User),
        (status = 502, description = "Document store failure")
    )
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Option<User>>, StoreError> {
    let user = state.db.get_user(&email).await?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = NewUser,
    responses(
        (status = 200, description = "User created or merged", body = WriteAck),
        (status = 400, description = "Email cannot be used as a document key"),
        (status = 502, description = "Document store failure")
    )
)]
pub async fn save_user(
    State(state): State<Arc<AppState>>,
    Json(user): Json<NewUser>,
) -> Result<Json<WriteAck>, StoreError> {
    let ack = state.db.save_user(user).await?;
    Ok(Json(ack))
}

#[utoipa::path(
    put,
    path = "/api/users/{email}/stamps",
    tag = "users",
    params(
        ("email" = String, Path, description = "User email (document key)")
    ),
    request_body = UpdateStamps,
    responses(
        (status = 200, description = "Stamps replaced", body = WriteAck),
        (status = 404, description = "No user stored under this email"),
        (status = 502, description = "Document store failure")
    )
)]
pub async fn update_stamps(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    Json(body): Json<UpdateStamps>,
) -> Result<Json<WriteAck>, StoreError> {
    let ack = state.db.update_stamps(&email, body.stamps).await?;
    Ok(Json(ack))
}
