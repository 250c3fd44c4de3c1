use std::collections::HashSet;

use crate::search::engine::SearchEngine;

/// Queries shorter than this get no suggestions.
const MIN_SUGGEST_QUERY_LEN: usize = 2;

impl SearchEngine {
    /// Autocomplete: full names of the best matching procedures, without
    /// duplicates, in order of first appearance.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<String> {
        let query = query.trim();
        if query.chars().count() < MIN_SUGGEST_QUERY_LEN || limit == 0 {
            return Vec::new();
        }

        let candidates = self.search(query, limit.saturating_mul(self.suggest_overfetch));

        let mut seen = HashSet::new();
        let suggestions: Vec<String> = candidates
            .into_iter()
            .filter(|p| seen.insert(p.name.as_str()))
            .take(limit)
            .map(|p| p.name.clone())
            .collect();

        tracing::debug!("Suggest {query:?}: {} suggestions", suggestions.len());
        suggestions
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::catalog::Catalog;
    use crate::config::ScoringWeights;
    use crate::models::Procedure;
    use crate::search::engine::SearchEngine;

    fn make_engine(names: &[&str]) -> SearchEngine {
        let procedures: Vec<Procedure> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                serde_json::from_value(serde_json::json!({ "idtram": i as i64 + 1, "nombre": name }))
                    .unwrap()
            })
            .collect();
        SearchEngine::new(Arc::new(Catalog::new(procedures)), ScoringWeights::default())
    }

    #[test]
    fn test_suggest_returns_full_names() {
        let engine = make_engine(&[
            "Pago de predial",
            "Expedición de actas del registro familiar",
            "Acta de matrimonio",
        ]);
        let suggestions = engine.suggest("acta", 8);
        assert!(suggestions.contains(&"Expedición de actas del registro familiar".to_string()));
        assert!(suggestions.contains(&"Acta de matrimonio".to_string()));
    }

    #[test]
    fn test_suggest_deduplicates_names() {
        let engine = make_engine(&[
            "Acta de nacimiento",
            "Acta de nacimiento",
            "Acta de defunción",
        ]);
        let suggestions = engine.suggest("acta", 8);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0], "Acta de nacimiento");
    }

    #[test]
    fn test_suggest_too_short() {
        let engine = make_engine(&["Acta de nacimiento"]);
        assert!(engine.suggest("a", 8).is_empty());
        assert!(engine.suggest("", 8).is_empty());
        assert!(engine.suggest("   ", 8).is_empty());
        assert!(engine.suggest("acta", 0).is_empty());
    }

    #[test]
    fn test_suggest_respects_limit() {
        let names: Vec<String> = (0..20).map(|i| format!("Constancia tipo {i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let engine = make_engine(&refs);
        assert_eq!(engine.suggest("constancia", 5).len(), 5);
    }

    #[test]
    fn test_overfetch_fills_limit_past_duplicates() {
        let engine = make_engine(&[
            "Acta de nacimiento",
            "Acta de nacimiento",
            "Acta de nacimiento",
            "Acta de defunción",
        ])
        .with_suggest_overfetch(2);
        // 2 * 2 candidates are enough to see the second distinct name
        assert_eq!(engine.suggest("acta", 2).len(), 2);
    }
}
