use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::geo::finder::find_offices;
use crate::models::{
    FinderRequest, FinderResponse, SearchRequest, SearchResponse, SuggestParams,
};
use crate::state::AppState;

/// POST /api/search - Ranked procedures for a free-text query
pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let query = req.query.trim().to_string();
    if query.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Query is required".to_string()));
    }

    let limit = req.limit.unwrap_or(state.config.default_limit);
    let results = state.engine.search_scored(&query, limit);
    tracing::info!(
        "Search {query:?}: {} results ({:?})",
        results.hits.len(),
        results.outcome
    );

    let results: Vec<_> = results.hits.iter().map(|h| h.procedure.clone()).collect();
    Ok(Json(SearchResponse {
        query,
        total: results.len(),
        results,
    }))
}

/// GET /api/suggest?q=&limit= - Autocomplete names
pub async fn suggest(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Json<Vec<String>> {
    let limit = params.limit.unwrap_or(state.config.default_limit);
    Json(state.engine.suggest(&params.q, limit))
}

/// POST /api/finder - Procedures with their offices, closest first
pub async fn finder(
    State(state): State<AppState>,
    Json(req): Json<FinderRequest>,
) -> Result<Json<FinderResponse>, (StatusCode, String)> {
    let query = req.query.trim().to_string();
    if query.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Query is required".to_string()));
    }

    let limit = req.limit.unwrap_or(state.config.finder_limit);
    let results = find_offices(
        &state.engine,
        &query,
        limit,
        req.location,
        state.config.nearby_radius_km,
    );
    tracing::info!(
        "Finder {query:?}: {} procedures (location: {})",
        results.len(),
        req.location.is_some()
    );

    Ok(Json(FinderResponse {
        query,
        location: req.location,
        results,
    }))
}
