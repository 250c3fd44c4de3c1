//! Straight-line distances between users and offices.

pub mod finder;

use std::cmp::Ordering;

use crate::models::{LatLng, Office, OfficeWithDistance, Procedure};
use crate::search::normalize::normalize_text;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres (Haversine formula).
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push near-antipodal points just past 1.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

pub fn distance_between(a: LatLng, b: LatLng) -> f64 {
    haversine_km(a.lat, a.lng, b.lat, b.lng)
}

/// Offices closest first. Offices without coordinates keep their relative
/// order after every office that has them.
pub fn sort_by_distance(offices: &[Office], user: LatLng) -> Vec<OfficeWithDistance> {
    let mut annotated: Vec<OfficeWithDistance> = offices
        .iter()
        .map(|office| OfficeWithDistance {
            office: office.clone(),
            distance_km: office.location().map(|loc| distance_between(user, loc)),
            is_real_distance: false,
        })
        .collect();

    annotated.sort_by(|a, b| match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    annotated
}

/// Like [`sort_by_distance`], but without a user location the offices stay
/// in catalog order with no distance.
pub fn offices_by_distance(offices: &[Office], user: Option<LatLng>) -> Vec<OfficeWithDistance> {
    match user {
        Some(user) => sort_by_distance(offices, user),
        None => offices
            .iter()
            .map(|office| OfficeWithDistance {
                office: office.clone(),
                distance_km: None,
                is_real_distance: false,
            })
            .collect(),
    }
}

/// Smallest known distance, if any office could be measured.
pub fn nearest_distance(offices: &[OfficeWithDistance]) -> Option<f64> {
    offices
        .iter()
        .filter_map(|o| o.distance_km)
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
}

/// Accent- and case-insensitive check of an office against a municipality
/// name, looking at its address, name and municipality.
pub fn office_in_municipality(office: &Office, municipality: &str) -> bool {
    let wanted = normalize_text(municipality);
    if wanted.is_empty() {
        return true;
    }
    [
        office.display_address(),
        office.name.clone(),
        office.municipality.clone(),
    ]
    .iter()
    .any(|field| normalize_text(field).contains(wanted.as_str()))
}

/// Offices located in `municipality`, in their original order.
pub fn filter_by_municipality<'a>(offices: &'a [Office], municipality: &str) -> Vec<&'a Office> {
    offices
        .iter()
        .filter(|o| office_in_municipality(o, municipality))
        .collect()
}

/// Offices of one procedure for the finder's detail view: closest first,
/// optionally restricted to a municipality, at most `limit`.
pub fn nearest_offices(
    procedure: &Procedure,
    user: Option<LatLng>,
    municipality: Option<&str>,
    limit: usize,
) -> Vec<OfficeWithDistance> {
    let mut offices = offices_by_distance(&procedure.offices, user);
    if let Some(municipality) = municipality {
        offices.retain(|o| office_in_municipality(&o.office, municipality));
    }
    offices.truncate(limit);
    offices
}
