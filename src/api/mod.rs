//! Axum HTTP handlers.

pub mod search;
pub mod tramites;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(tramites::health))
        .route("/api/tramites", get(tramites::list_tramites))
        .route("/api/tramites/by-name", get(tramites::get_tramite_by_name))
        .route("/api/tramites/{id}", get(tramites::get_tramite))
        .route("/api/tramites/{id}/offices", post(tramites::tramite_offices))
        .route("/api/search", post(search::search))
        .route("/api/suggest", get(search::suggest))
        .route("/api/finder", post(search::finder))
        .with_state(state)
}
