//! Relevance search over the procedure catalog: normalization, keyword
//! extraction, synonym expansion, scoring and the category fallback.

pub mod categories;
pub mod engine;
pub mod normalize;
pub mod scoring;
pub mod suggest;
pub mod synonyms;

pub use engine::{ScoredProcedure, SearchEngine, SearchOutcome, SearchResults};
