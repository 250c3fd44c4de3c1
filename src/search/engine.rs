use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::ScoringWeights;
use crate::models::Procedure;
use crate::search::categories::CategoryTable;
use crate::search::normalize::{extract_keywords, normalize_text};
use crate::search::scoring::score_procedure;
use crate::search::synonyms::SynonymTable;

/// Queries whose normalized form is shorter than this and carry no keyword
/// get the popular defaults instead of a scored search.
const MIN_SCORED_QUERY_LEN: usize = 3;

/// A catalog record with the relevance it got for one query.
#[derive(Debug, Clone, Copy)]
pub struct ScoredProcedure<'a> {
    pub procedure: &'a Procedure,
    pub score: f64,
}

/// Which branch of the search produced the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank query, nothing returned
    Empty,
    /// No keyword and a very short query: first records in catalog order
    PopularDefaults,
    /// At least one record scored above zero
    Scored,
    /// Nothing scored; category matching (or its catalog-order fallback) answered
    CategoryFallback,
}

#[derive(Debug, Clone)]
pub struct SearchResults<'a> {
    pub outcome: SearchOutcome,
    /// Ordered results. Scores are zero outside the `Scored` outcome.
    pub hits: Vec<ScoredProcedure<'a>>,
}

impl<'a> SearchResults<'a> {
    pub fn procedures(&self) -> Vec<&'a Procedure> {
        self.hits.iter().map(|h| h.procedure).collect()
    }
}

/// Relevance search over an injected, read-only catalog.
///
/// Pipeline:
/// 1. Normalize the query and extract keywords.
/// 2. Expand keywords with the synonym table.
/// 3. Score every record, keep scores above zero, sort by score descending
///    (ties keep catalog order) and truncate.
/// 4. When nothing scored, fall back to category matching, which itself
///    falls back to catalog order.
///
/// The engine holds no mutable state, so one instance can serve any number
/// of concurrent requests.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    catalog: Arc<Catalog>,
    synonyms: SynonymTable,
    categories: CategoryTable,
    weights: ScoringWeights,
    pub(crate) suggest_overfetch: usize,
}

impl SearchEngine {
    pub fn new(catalog: Arc<Catalog>, weights: ScoringWeights) -> Self {
        Self::with_tables(
            catalog,
            SynonymTable::default(),
            CategoryTable::default(),
            weights,
        )
    }

    pub fn with_tables(
        catalog: Arc<Catalog>,
        synonyms: SynonymTable,
        categories: CategoryTable,
        weights: ScoringWeights,
    ) -> Self {
        Self {
            catalog,
            synonyms,
            categories,
            weights,
            suggest_overfetch: 2,
        }
    }

    /// Suggestions gather `limit * factor` search results before deduplicating.
    pub fn with_suggest_overfetch(mut self, factor: usize) -> Self {
        self.suggest_overfetch = factor.max(1);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn all(&self) -> &[Procedure] {
        self.catalog.all()
    }

    pub fn get_by_id(&self, id: i64) -> Option<&Procedure> {
        self.catalog.get_by_id(id)
    }

    pub fn get_by_exact_name(&self, name: &str) -> Option<&Procedure> {
        self.catalog.get_by_exact_name(name)
    }

    /// Up to `limit` procedures, most relevant first.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Procedure> {
        self.search_scored(query, limit).procedures()
    }

    /// Same as [`SearchEngine::search`], keeping scores and the branch taken.
    pub fn search_scored(&self, query: &str, limit: usize) -> SearchResults<'_> {
        if query.trim().is_empty() {
            return SearchResults {
                outcome: SearchOutcome::Empty,
                hits: Vec::new(),
            };
        }

        let normalized_query = normalize_text(query);
        let keywords = extract_keywords(query);

        if keywords.is_empty() && normalized_query.chars().count() < MIN_SCORED_QUERY_LEN {
            tracing::debug!("Query {query:?} has no keywords, returning popular procedures");
            return SearchResults {
                outcome: SearchOutcome::PopularDefaults,
                hits: unscored(self.catalog.first(limit).iter()),
            };
        }

        let expanded = self
            .synonyms
            .expand_query(&keywords, self.weights.principal_min_len);

        let mut hits: Vec<ScoredProcedure<'_>> = self
            .catalog
            .all()
            .iter()
            .map(|procedure| ScoredProcedure {
                procedure,
                score: score_procedure(procedure, &expanded, &normalized_query, &self.weights),
            })
            .filter(|h| h.score > 0.0)
            .collect();

        // Stable sort: equal scores keep catalog order.
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let matched = hits.len();
        hits.truncate(limit);

        if matched == 0 {
            let fallback = self.match_by_category(&normalized_query, limit);
            tracing::info!(
                "No scored match for {query:?} ({} keywords, {} expanded), category fallback returned {}",
                keywords.len(),
                expanded.terms.len(),
                fallback.len()
            );
            return SearchResults {
                outcome: SearchOutcome::CategoryFallback,
                hits: unscored(fallback.into_iter()),
            };
        }

        tracing::debug!(
            "Search {query:?}: {} keywords, {} expanded terms, {matched} matched, returning {}",
            keywords.len(),
            expanded.terms.len(),
            hits.len()
        );

        SearchResults {
            outcome: SearchOutcome::Scored,
            hits,
        }
    }

    /// Category fallback over this engine's catalog.
    pub fn match_by_category(&self, normalized_query: &str, limit: usize) -> Vec<&Procedure> {
        self.categories
            .match_by_category(&self.catalog, normalized_query, limit)
    }
}

fn unscored<'a>(procedures: impl Iterator<Item = &'a Procedure>) -> Vec<ScoredProcedure<'a>> {
    procedures
        .map(|procedure| ScoredProcedure {
            procedure,
            score: 0.0,
        })
        .collect()
}
