use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A government procedure ("trámite") as exported by RUTS.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Procedure {
    #[serde(rename = "idtram", deserialize_with = "lenient_id")]
    pub id: i64,
    #[serde(rename = "nombre", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "descripcion", default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(rename = "requisitos", default, deserialize_with = "lenient_string")]
    pub requirements: String,
    #[serde(rename = "tipo", default, deserialize_with = "lenient_string")]
    pub kind: String,
    #[serde(rename = "secretaria", default)]
    pub agency: Option<Agency>,
    #[serde(rename = "dependencia", default)]
    pub department: Option<Department>,
    #[serde(rename = "concosto", default, deserialize_with = "lenient_bool")]
    pub has_cost: bool,
    #[serde(rename = "costo", default, deserialize_with = "lenient_number")]
    pub cost: Option<f64>,
    #[serde(rename = "urlsistema", default, deserialize_with = "lenient_string")]
    pub online_url: String,
    #[serde(rename = "atencion", default, deserialize_with = "null_as_default")]
    pub offices: Vec<Office>,
}

/// Values RUTS uses in `urlsistema` when there is no online system.
const NO_URL_SENTINELS: &[&str] = &["#", "null", "n/a", "na", "-", "undefined"];

impl Procedure {
    /// URL of the online system, if the procedure can be done online.
    pub fn online_url(&self) -> Option<&str> {
        let url = self.online_url.trim();
        if url.is_empty() || NO_URL_SENTINELS.contains(&url.to_lowercase().as_str()) {
            None
        } else {
            Some(url)
        }
    }

    pub fn cost_amount(&self) -> Option<f64> {
        if self.has_cost {
            self.cost
        } else {
            None
        }
    }

    pub fn agency_name(&self) -> &str {
        self.agency.as_ref().map(|a| a.name.as_str()).unwrap_or_default()
    }

    pub fn department_name(&self) -> &str {
        self.department
            .as_ref()
            .map(|d| d.name.as_str())
            .unwrap_or_default()
    }

    /// True when at least one office can be placed on a map.
    pub fn has_mappable_offices(&self) -> bool {
        self.offices.iter().any(|o| o.location().is_some())
    }
}

/// "Secretaría" owning the procedure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Agency {
    #[serde(rename = "nombre", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "siglas", default, deserialize_with = "lenient_string")]
    pub acronym: String,
}

/// "Dependencia" that attends the procedure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Department {
    #[serde(rename = "nombre", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "siglas", default, deserialize_with = "lenient_string")]
    pub acronym: String,
    #[serde(rename = "correo", default, deserialize_with = "lenient_string")]
    pub email: String,
}

/// A physical attention point. Every text field may be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Office {
    #[serde(rename = "nombre", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "direccion", default, deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(rename = "vialidad", default, deserialize_with = "lenient_string")]
    pub street_type: String,
    #[serde(rename = "vialidadnombre", default, deserialize_with = "lenient_string")]
    pub street_name: String,
    #[serde(rename = "noext", default, deserialize_with = "lenient_string")]
    pub exterior_number: String,
    #[serde(rename = "asentamientonombre", default, deserialize_with = "lenient_string")]
    pub settlement: String,
    #[serde(rename = "municipio", default, deserialize_with = "lenient_string")]
    pub municipality: String,
    #[serde(rename = "telefonos", default, deserialize_with = "lenient_string")]
    pub phones: String,
    #[serde(rename = "horario", default, deserialize_with = "lenient_string")]
    pub hours: String,
    #[serde(rename = "correo", default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(rename = "coordenadas", default, deserialize_with = "lenient_point")]
    pub coordinates: Option<PointGeometry>,
}

impl Office {
    /// `direccion` when present, otherwise composed from the street parts.
    pub fn display_address(&self) -> String {
        if !self.address.trim().is_empty() {
            return self.address.trim().to_string();
        }

        let street = [
            self.street_type.trim(),
            self.street_name.trim(),
            self.exterior_number.trim(),
        ]
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

        [street.as_str(), self.settlement.trim(), self.municipality.trim()]
            .iter()
            .filter(|p| !p.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn location(&self) -> Option<LatLng> {
        self.coordinates.as_ref().and_then(PointGeometry::to_lat_lng)
    }
}

/// GeoJSON-like point. `coordinates` is stored as `[lng, lat]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PointGeometry {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

impl PointGeometry {
    pub fn from_lat_lng(lat: f64, lng: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: vec![lng, lat],
        }
    }

    pub fn to_lat_lng(&self) -> Option<LatLng> {
        match self.coordinates.as_slice() {
            [lng, lat] if lng.is_finite() && lat.is_finite() => Some(LatLng {
                lat: *lat,
                lng: *lng,
            }),
            _ => None,
        }
    }
}

/// A user or office position in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// An office annotated with its straight-line distance to the user.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OfficeWithDistance {
    pub office: Office,
    /// `None` when the office has no coordinates or no user location is known
    pub distance_km: Option<f64>,
    /// Road distance from a routing service, as opposed to Haversine
    pub is_real_distance: bool,
}

/// Search request
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub limit: Option<usize>,
}

/// Search response
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total: usize,
    pub results: Vec<Procedure>,
}

/// Query string of `GET /api/suggest`
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

/// Query string of `GET /api/tramites/by-name`
#[derive(Debug, Clone, Deserialize)]
pub struct NameParams {
    pub name: String,
}

/// Office finder request
#[derive(Debug, Clone, Deserialize)]
pub struct FinderRequest {
    pub query: String,
    pub limit: Option<usize>,
    pub location: Option<LatLng>,
}

/// One procedure in the office finder, with its offices closest first.
#[derive(Debug, Clone, Serialize)]
pub struct FinderResult {
    pub procedure: Procedure,
    pub offices: Vec<OfficeWithDistance>,
    pub nearest_km: Option<f64>,
    pub within_radius: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinderResponse {
    pub query: String,
    pub location: Option<LatLng>,
    pub results: Vec<FinderResult>,
}

/// Request body of `POST /api/tramites/{id}/offices`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NearestOfficesRequest {
    pub location: Option<LatLng>,
    pub municipality: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub procedures: usize,
}

// ─── Lenient field decoding ──────────────────────────────
//
// RUTS exports mix nulls, numbers and strings in the same field, so any
// malformed optional value decodes as "absent" instead of failing the load.

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "1" | "si" | "sí" | "yes"
        ),
        _ => false,
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .trim()
            .parse::<f64>()
            .ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| D::Error::custom(format!("idtram is not an integer: {n}"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("idtram is not an integer: {s:?}"))),
        other => Err(D::Error::custom(format!("idtram is not an integer: {other}"))),
    }
}

fn lenient_point<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<PointGeometry>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(|v| serde_json::from_value::<PointGeometry>(v).ok())
        .filter(|p| p.to_lat_lng().is_some()))
}
