use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use tracing::{info, instrument};

use super::Notification;
use crate::{error::AppError, extract::AppJson, state::AppState};

#[derive(Debug, Serialize)]
pub struct NotifyResponse {
    pub sent: bool,
}

pub fn notify_routes() -> Router<AppState> {
    Router::new().route("/notify", post(notify))
}

#[instrument(skip(state, payload), fields(to = %payload.to))]
pub async fn notify(
    State(state): State<AppState>,
    AppJson(payload): AppJson<Notification>,
) -> Result<Json<NotifyResponse>, AppError> {
    state.notifier.send(&payload).await?;
    info!(subject = %payload.subject, "notification sent");
    Ok(Json(NotifyResponse { sent: true }))
}
