use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod promotion;
pub mod repo;
pub mod repo_types;
pub mod seed;
pub mod services;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::user_routes())
}
