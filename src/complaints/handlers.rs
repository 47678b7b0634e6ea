use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    complaints::{
        dto::{ListQuery, NewComplaint},
        lifecycle,
        repo_types::{ChatMessage, Complaint, ComplaintPatch, HistoryEntry},
        services,
    },
    error::AppError,
    extract::AppJson,
    outcome::UpdateOutcome,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/complaints", get(list_complaints))
        .route("/complaints/:id", get(get_complaint))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/complaints", post(file_complaint))
        .route(
            "/complaints/:id",
            put(update_complaint).delete(delete_complaint),
        )
        .route("/complaints/:id/history", post(append_history))
        .route("/complaints/:id/chat", post(append_chat))
}

#[instrument(skip(state, query))]
pub async fn list_complaints(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Complaint>>, AppError> {
    let Query(q) = query?;
    let items = services::list_complaints(state.complaints.as_ref(), q.anonymize).await?;
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_complaint(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Complaint>, AppError> {
    Ok(Json(
        services::get_complaint(state.complaints.as_ref(), &id).await?,
    ))
}

/// POST /complaints; the id is allocated here, never taken from the body.
#[instrument(skip(state, body))]
pub async fn file_complaint(
    State(state): State<AppState>,
    AppJson(body): AppJson<NewComplaint>,
) -> Result<(StatusCode, HeaderMap, Json<Complaint>), AppError> {
    let complaint = services::file_complaint(state.complaints.as_ref(), body).await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/complaints/{}", complaint.id).parse::<HeaderValue>() {
        headers.insert(axum::http::header::LOCATION, location);
    }

    Ok((StatusCode::CREATED, headers, Json(complaint)))
}

#[instrument(skip(state, patch))]
pub async fn update_complaint(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<ComplaintPatch>,
) -> Result<Json<UpdateOutcome>, AppError> {
    Ok(Json(
        lifecycle::update_complaint(state.complaints.as_ref(), &id, &patch).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_complaint(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateOutcome>, AppError> {
    Ok(Json(
        services::delete_complaint(state.complaints.as_ref(), &id).await?,
    ))
}

#[instrument(skip(state, entry))]
pub async fn append_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(entry): AppJson<HistoryEntry>,
) -> Result<Json<UpdateOutcome>, AppError> {
    Ok(Json(
        lifecycle::append_history(state.complaints.as_ref(), &id, &entry).await?,
    ))
}

#[instrument(skip(state, message))]
pub async fn append_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(message): AppJson<ChatMessage>,
) -> Result<Json<UpdateOutcome>, AppError> {
    Ok(Json(
        lifecycle::append_chat(state.complaints.as_ref(), &id, &message).await?,
    ))
}
