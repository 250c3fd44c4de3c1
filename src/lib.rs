//! # tramites-search
//!
//! Relevance search over the RUTS catalog of government procedures
//! ("trámites"), plus nearest-office ordering for the office finder.
//!
//! ## Search pipeline
//!
//! ```text
//!                    ┌──────────────┐
//!                    │  User Query  │
//!                    └──────┬───────┘
//!                           │ normalize (lowercase, strip accents)
//!                           ▼
//!                  ┌─────────────────┐
//!                  │ Keyword extract │  stop words, len > 2
//!                  └────────┬────────┘
//!                           │ no keywords? → first N of catalog
//!                           ▼
//!                  ┌─────────────────┐
//!                  │ Synonym expand  │  licencia → carnet, ...
//!                  └────────┬────────┘
//!                           ▼
//!                  ┌─────────────────┐
//!                  │ Score every     │  name phrase, field hits,
//!                  │ procedure       │  variant penalty
//!                  └────────┬────────┘
//!                           │ nothing scored? → category match
//!                           ▼
//!                  ┌─────────────────┐
//!                  │ Stable sort,    │
//!                  │ take limit      │
//!                  └─────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration and scoring weights
//! - [`models`] - Catalog records (`Procedure`, `Office`) and request/response types
//! - [`catalog`] - Loading the JSON catalog and id/name lookups
//! - [`search::normalize`] - Text normalization and keyword extraction
//! - [`search::synonyms`] - Domain synonym table
//! - [`search::categories`] - Category keyword table used as fallback
//! - [`search::scoring`] - Per-procedure relevance score
//! - [`search::engine`] - Search orchestration, popular defaults, fallback
//! - [`search::suggest`] - Autocomplete names
//! - [`geo`] - Haversine distances and nearest-office ordering
//! - [`geo::finder`] - Office finder combining search and distances
//! - [`api`] - Axum HTTP handlers
//! - [`state`] - Shared application state

pub mod api;
pub mod catalog;
pub mod config;
pub mod geo;
pub mod models;
pub mod search;
pub mod state;
