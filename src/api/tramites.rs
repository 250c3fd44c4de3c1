use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::geo::nearest_offices;
use crate::models::{
    HealthResponse, NameParams, NearestOfficesRequest, OfficeWithDistance, Procedure,
};
use crate::state::AppState;

/// GET /api/tramites - Whole catalog in catalog order
pub async fn list_tramites(State(state): State<AppState>) -> Json<Vec<Procedure>> {
    Json(state.engine.all().to_vec())
}

/// GET /api/tramites/{id}
pub async fn get_tramite(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Procedure>, (StatusCode, String)> {
    match state.engine.get_by_id(id) {
        Some(p) => Ok(Json(p.clone())),
        None => Err((StatusCode::NOT_FOUND, "Procedure not found".to_string())),
    }
}

/// GET /api/tramites/by-name?name= - Exact, case-sensitive name lookup
pub async fn get_tramite_by_name(
    State(state): State<AppState>,
    Query(params): Query<NameParams>,
) -> Result<Json<Procedure>, (StatusCode, String)> {
    match state.engine.get_by_exact_name(&params.name) {
        Some(p) => Ok(Json(p.clone())),
        None => Err((StatusCode::NOT_FOUND, "Procedure not found".to_string())),
    }
}

/// POST /api/tramites/{id}/offices - Offices of one procedure, closest first
pub async fn tramite_offices(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<NearestOfficesRequest>,
) -> Result<Json<Vec<OfficeWithDistance>>, (StatusCode, String)> {
    let Some(procedure) = state.engine.get_by_id(id) else {
        return Err((StatusCode::NOT_FOUND, "Procedure not found".to_string()));
    };

    let limit = req.limit.unwrap_or(state.config.max_offices);
    let offices = nearest_offices(
        procedure,
        req.location,
        req.municipality.as_deref(),
        limit,
    );
    tracing::debug!(
        "Procedure {id}: {} of {} offices returned",
        offices.len(),
        procedure.offices.len()
    );
    Ok(Json(offices))
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        procedures: state.engine.catalog().len(),
    })
}
