use crate::geo::{nearest_distance, offices_by_distance};
use crate::models::{FinderResult, LatLng};
use crate::search::SearchEngine;

/// Office finder: search procedures, then attach each one's offices closest
/// first.
///
/// With a user location, procedures that have an office within
/// `nearby_radius_km` move ahead of the rest; relevance order is kept inside
/// each of the two groups.
pub fn find_offices(
    engine: &SearchEngine,
    query: &str,
    limit: usize,
    user: Option<LatLng>,
    nearby_radius_km: f64,
) -> Vec<FinderResult> {
    let mut results: Vec<FinderResult> = engine
        .search(query, limit)
        .into_iter()
        .map(|procedure| {
            let offices = offices_by_distance(&procedure.offices, user);
            let nearest_km = nearest_distance(&offices);
            FinderResult {
                procedure: procedure.clone(),
                offices,
                nearest_km,
                within_radius: nearest_km.is_some_and(|d| d < nearby_radius_km),
            }
        })
        .collect();

    if user.is_some() {
        results.sort_by_key(|r| !r.within_radius);
        tracing::debug!(
            "Finder {query:?}: {} of {} procedures have an office within {nearby_radius_km} km",
            results.iter().filter(|r| r.within_radius).count(),
            results.len()
        );
    }

    results
}
