use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RUTS export loaded at startup
    pub catalog_path: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// Result count when a search request does not specify one
    pub default_limit: usize,
    /// Procedures returned by the office finder
    pub finder_limit: usize,
    /// Offices returned per procedure by the nearest-offices endpoint
    pub max_offices: usize,
    /// Offices closer than this promote their procedure in the finder
    pub nearby_radius_km: f64,
    /// Suggestions over-fetch `limit * suggest_overfetch` search results
    pub suggest_overfetch: usize,
    /// Relevance weights
    pub scoring: ScoringWeights,
}

/// Every constant the relevance scorer uses.
///
/// Only the relative magnitudes matter: the name-phrase bonus dominates,
/// the all-keywords-in-name bonus comes second, and the variant penalty
/// outweighs the primary bonus so that renewals and replacements rank
/// below the procedure they modify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Lower bound of the name-phrase bonus; the scorer raises it with the
    /// number of expanded terms so a phrase hit outranks keyword-only matches
    pub name_phrase: f64,
    pub all_principal_in_name: f64,
    pub variant_penalty: f64,
    pub primary_bonus: f64,
    pub description_phrase: f64,
    pub keyword_in_name: f64,
    pub keyword_in_description: f64,
    pub keyword_in_agency: f64,
    pub keyword_in_requirements: f64,
    pub keyword_in_type: f64,
    /// Multiplier for keywords no longer than `principal_min_len`
    pub short_keyword_factor: f64,
    /// Per distinct long keyword found in the name
    pub name_hits_bonus: f64,
    /// Per distinct long keyword found across name and description
    pub combined_hits_bonus: f64,
    /// Phrase bonuses need a normalized query longer than this
    pub phrase_min_len: usize,
    /// Keywords longer than this are "principal"
    pub principal_min_len: usize,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            name_phrase: 1000.0,
            all_principal_in_name: 200.0,
            variant_penalty: 150.0,
            primary_bonus: 100.0,
            description_phrase: 50.0,
            keyword_in_name: 20.0,
            keyword_in_description: 10.0,
            keyword_in_agency: 8.0,
            keyword_in_requirements: 5.0,
            keyword_in_type: 3.0,
            short_keyword_factor: 0.5,
            name_hits_bonus: 15.0,
            combined_hits_bonus: 5.0,
            phrase_min_len: 5,
            principal_min_len: 3,
        }
    }
}

impl ScoringWeights {
    /// Read a partial or complete set of weights from a JSON file.
    /// Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scoring weights {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("Invalid scoring weights in {}", path.display()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("./data/tramites.json"),
            bind_addr: "127.0.0.1:9000".to_string(),
            default_limit: 8,
            finder_limit: 10,
            max_offices: 10,
            nearby_radius_km: 50.0,
            suggest_overfetch: 2,
            scoring: ScoringWeights::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("TRAMITES_CATALOG_PATH") {
            config.catalog_path = PathBuf::from(path);
        }
        if let Ok(addr) = std::env::var("TRAMITES_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(val) = std::env::var("TRAMITES_DEFAULT_LIMIT") {
            if let Ok(v) = val.parse() {
                config.default_limit = v;
            }
        }
        if let Ok(val) = std::env::var("TRAMITES_FINDER_LIMIT") {
            if let Ok(v) = val.parse() {
                config.finder_limit = v;
            }
        }
        if let Ok(val) = std::env::var("TRAMITES_MAX_OFFICES") {
            if let Ok(v) = val.parse() {
                config.max_offices = v;
            }
        }
        if let Ok(val) = std::env::var("TRAMITES_NEARBY_RADIUS_KM") {
            if let Ok(v) = val.parse::<f64>() {
                if v.is_finite() && v >= 0.0 {
                    config.nearby_radius_km = v;
                }
            }
        }

        // Unlike the numbers above, a broken weights file is an error.
        if let Ok(path) = std::env::var("TRAMITES_SCORING_PATH") {
            config.scoring = ScoringWeights::from_file(Path::new(&path))?;
        }

        Ok(config)
    }
}
