use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::AppError,
    extract::AppJson,
    outcome::UpdateOutcome,
    state::AppState,
    users::{
        dto::{LoginRequest, PromotionResponse},
        promotion::promote_all_students,
        repo_types::{User, UserPatch},
        services,
    },
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(register))
        .route("/users/:id", put(update_user))
        .route("/users/by-email/:email", delete(delete_user))
        .route("/users/promote", post(promote))
}

#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<User>, AppError> {
    let user = services::authenticate(state.users.as_ref(), &payload.email, &payload.pass).await?;
    Ok(Json(user))
}

#[instrument(skip(state, payload), fields(user_id = %payload.id))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<User>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = services::register(state.users.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(services::list_users(state.users.as_ref()).await?))
}

#[instrument(skip(state, patch))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<UserPatch>,
) -> Result<Json<UpdateOutcome>, AppError> {
    Ok(Json(
        services::update_user(state.users.as_ref(), &id, &patch).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UpdateOutcome>, AppError> {
    Ok(Json(services::delete_user(state.users.as_ref(), &email).await?))
}

#[instrument(skip(state))]
pub async fn promote(State(state): State<AppState>) -> Result<Json<PromotionResponse>, AppError> {
    let updated = promote_all_students(state.users.as_ref()).await?;
    Ok(Json(PromotionResponse { updated }))
}
