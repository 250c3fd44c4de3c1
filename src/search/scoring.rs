use std::collections::BTreeSet;

use crate::config::ScoringWeights;
use crate::models::Procedure;
use crate::search::normalize::normalize_text;
use crate::search::synonyms::ExpandedKeywords;

/// Name fragments of procedures that modify a primary one (renewals,
/// replacements, provisional versions). Such procedures are down-ranked.
pub const VARIANT_MARKERS: &[&str] = &[
    "provisional",
    "reposicion",
    "renovacion",
    "canje",
    "duplicado",
    "constancia de no",
    "liberacion",
    "infraccion",
];

/// Normalized text of every field the scorer reads.
struct NormalizedFields {
    name: String,
    description: String,
    requirements: String,
    agency: String,
    department: String,
    kind: String,
}

impl NormalizedFields {
    fn of(procedure: &Procedure) -> Self {
        Self {
            name: normalize_text(&procedure.name),
            description: normalize_text(&procedure.description),
            requirements: normalize_text(&procedure.requirements),
            agency: normalize_text(procedure.agency_name()),
            department: normalize_text(procedure.department_name()),
            kind: normalize_text(&procedure.kind),
        }
    }
}

pub fn is_variant_name(normalized_name: &str) -> bool {
    VARIANT_MARKERS.iter().any(|m| normalized_name.contains(m))
}

fn contains_any(text: &str, group: &BTreeSet<String>) -> bool {
    group.iter().any(|t| !t.is_empty() && text.contains(t.as_str()))
}

/// Most a procedure can collect from rules 2 to 6, i.e. without the name
/// phrase, for `term_count` expanded terms.
pub fn keyword_score_ceiling(term_count: usize, weights: &ScoringWeights) -> f64 {
    let per_field = weights.keyword_in_name.max(0.0)
        + weights.keyword_in_description.max(0.0)
        + weights.keyword_in_agency.max(0.0)
        + weights.keyword_in_requirements.max(0.0)
        + weights.keyword_in_type.max(0.0);
    let per_term = per_field * weights.short_keyword_factor.max(1.0)
        + weights.name_hits_bonus.max(weights.combined_hits_bonus).max(0.0);

    weights.all_principal_in_name.max(0.0)
        + weights.primary_bonus.max(0.0)
        + weights.description_phrase.max(0.0)
        + term_count as f64 * per_term
}

/// Name-phrase bonus for this query: at least `name_phrase`, and large enough
/// that a phrase hit still beats every keyword-only match after a variant
/// penalty.
fn name_phrase_bonus(keywords: &ExpandedKeywords, weights: &ScoringWeights) -> f64 {
    let floor = keyword_score_ceiling(keywords.terms.len(), weights)
        + weights.variant_penalty.max(0.0)
        + 1.0;
    weights.name_phrase.max(floor)
}

/// Relevance of one procedure for an expanded query. Pure and never negative.
///
/// Rules, applied in order:
/// 1. the whole query appears in the name (dominant bonus);
/// 2. every principal keyword group appears in the name, with at least two groups;
/// 3. a variant name loses a fixed penalty, clamped at zero; a non-variant
///    name holding every principal group gains the primary bonus instead;
/// 4. the whole query appears in the description;
/// 5. each expanded term adds a weight per field it appears in, scaled down
///    for short terms;
/// 6. several distinct long terms in the name (or else across name and
///    description) add a bonus per term.
pub fn score_procedure(
    procedure: &Procedure,
    keywords: &ExpandedKeywords,
    normalized_query: &str,
    weights: &ScoringWeights,
) -> f64 {
    let fields = NormalizedFields::of(procedure);
    let mut score = 0.0;

    let phrase_eligible = normalized_query.chars().count() > weights.phrase_min_len;

    if phrase_eligible && fields.name.contains(normalized_query) {
        score += name_phrase_bonus(keywords, weights);
    }

    let all_principal_in_name = !keywords.principal.is_empty()
        && keywords
            .principal
            .iter()
            .all(|group| contains_any(&fields.name, group));

    if keywords.principal.len() >= 2 && all_principal_in_name {
        score += weights.all_principal_in_name;
    }

    if is_variant_name(&fields.name) {
        score = f64::max(score - weights.variant_penalty, 0.0);
    } else if all_principal_in_name {
        score += weights.primary_bonus;
    }

    if phrase_eligible && fields.description.contains(normalized_query) {
        score += weights.description_phrase;
    }

    for term in keywords.terms.iter().filter(|t| !t.is_empty()) {
        let term = term.as_str();
        let mut gained = 0.0;
        if fields.name.contains(term) {
            gained += weights.keyword_in_name;
        }
        if fields.description.contains(term) {
            gained += weights.keyword_in_description;
        }
        if fields.agency.contains(term) || fields.department.contains(term) {
            gained += weights.keyword_in_agency;
        }
        if fields.requirements.contains(term) {
            gained += weights.keyword_in_requirements;
        }
        if fields.kind.contains(term) {
            gained += weights.keyword_in_type;
        }

        let factor = if term.chars().count() <= weights.principal_min_len {
            weights.short_keyword_factor
        } else {
            1.0
        };
        score += gained * factor;
    }

    let long_terms: Vec<&str> = keywords
        .terms
        .iter()
        .map(String::as_str)
        .filter(|t| t.chars().count() > weights.principal_min_len)
        .collect();

    let in_name = long_terms
        .iter()
        .filter(|t| fields.name.contains(**t))
        .count();

    if in_name > 1 {
        score += in_name as f64 * weights.name_hits_bonus;
    } else {
        let in_name_or_description = long_terms
            .iter()
            .filter(|t| fields.name.contains(**t) || fields.description.contains(**t))
            .count();
        if in_name_or_description > 1 {
            score += in_name_or_description as f64 * weights.combined_hits_bonus;
        }
    }

    score.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::normalize::extract_keywords;
    use crate::search::synonyms::SynonymTable;
    use proptest::prelude::*;

    fn make_procedure(name: &str, description: &str) -> Procedure {
        serde_json::from_value(serde_json::json!({
            "idtram": 1,
            "nombre": name,
            "descripcion": description,
        }))
        .unwrap()
    }

    fn score_for(procedure: &Procedure, query: &str) -> f64 {
        let weights = ScoringWeights::default();
        let keywords = SynonymTable::default()
            .expand_query(&extract_keywords(query), weights.principal_min_len);
        score_procedure(procedure, &keywords, &normalize_text(query), &weights)
    }

    #[test]
    fn test_unrelated_procedure_scores_zero() {
        let p = make_procedure("Pago de predial", "Impuesto sobre la propiedad");
        assert_eq!(score_for(&p, "licencia de conducir"), 0.0);
    }

    #[test]
    fn test_empty_keywords_score_zero() {
        let p = make_procedure("Licencia para conducir", "");
        let weights = ScoringWeights::default();
        assert_eq!(
            score_procedure(&p, &ExpandedKeywords::default(), "", &weights),
            0.0
        );
    }

    #[test]
    fn test_primary_beats_renewal() {
        let primary = make_procedure("Licencia para conducir vehículos", "");
        let renewal = make_procedure("Licencia para conducir vehículos (renovación)", "");
        let a = score_for(&primary, "licencia de conducir");
        let b = score_for(&renewal, "licencia de conducir");
        assert!(a > b, "primary {a} should beat renewal {b}");
        assert!(b > 0.0);
    }

    #[test]
    fn test_every_variant_marker_is_penalized() {
        let primary = make_procedure("Expedición de placas vehiculares", "");
        let base = score_for(&primary, "placas vehiculares");
        for marker in ["provisional", "reposición", "renovación", "canje", "duplicado", "liberación", "infracción"] {
            let variant = make_procedure(&format!("Expedición de placas vehiculares {marker}"), "");
            assert!(score_for(&variant, "placas vehiculares") < base, "marker {marker}");
        }
        let variant = make_procedure("Constancia de no adeudo de placas vehiculares", "");
        assert!(score_for(&variant, "placas vehiculares") < base);
    }

    #[test]
    fn test_name_phrase_dominates_keyword_matches() {
        let exact = make_procedure("Expedición de acta de nacimiento", "");
        let scattered = make_procedure(
            "Registro de nacimiento y acta",
            "Acta de registro para el nacido. Nacimiento, nacer, actas, certificado.",
        );
        let a = score_for(&exact, "acta de nacimiento");
        let b = score_for(&scattered, "acta de nacimiento");
        assert!(a > b, "exact {a} should beat scattered {b}");
        assert!(a >= ScoringWeights::default().name_phrase);
    }

    #[test]
    fn test_name_phrase_beats_rival_stuffed_with_synonyms() {
        let query = "licencia conducir vehiculo placas matrimonio";
        let weights = ScoringWeights::default();
        let keywords = SynonymTable::default()
            .expand_query(&extract_keywords(query), weights.principal_min_len);
        let all_terms = keywords.terms.iter().map(String::as_str).collect::<Vec<_>>().join(", ");

        let exact = make_procedure(&format!("Trámite de {query}"), "");
        let rival: Procedure = serde_json::from_value(serde_json::json!({
            "idtram": 2,
            "nombre": all_terms,
            "descripcion": format!("{query}. {all_terms}"),
            "requisitos": all_terms,
            "tipo": all_terms,
            "secretaria": { "nombre": all_terms },
        }))
        .unwrap();

        let a = score_for(&exact, query);
        let b = score_for(&rival, query);
        assert!(a > b, "exact {a} should beat rival {b}");
        assert!(b <= keyword_score_ceiling(keywords.terms.len(), &weights));
    }

    #[test]
    fn test_variant_ties_primary_when_not_every_group_is_in_name() {
        // "placas" is in neither name: no primary bonus, and the penalty
        // has nothing to remove before the keyword rules run.
        let primary = make_procedure("Licencia de conducir", "");
        let renewal = make_procedure("Licencia de conducir renovación", "");
        assert_eq!(
            score_for(&primary, "licencia placas"),
            score_for(&renewal, "licencia placas")
        );
    }

    #[test]
    fn test_short_query_gets_no_phrase_bonus() {
        // "curp" is not longer than phrase_min_len
        let p = make_procedure("Consulta de CURP", "");
        let score = score_for(&p, "curp");
        assert!(score < ScoringWeights::default().name_phrase);
        assert_eq!(score, 20.0 + 100.0);
    }

    #[test]
    fn test_description_phrase_bonus() {
        let with = make_procedure("Servicio estatal", "Trámite para obtener copia certificada");
        let without = make_procedure("Servicio estatal", "Para obtener una copia que sea certificada");
        let a = score_for(&with, "copia certificada");
        let b = score_for(&without, "copia certificada");
        assert_eq!(a - b, ScoringWeights::default().description_phrase);
    }

    #[test]
    fn test_short_terms_are_scaled_down() {
        let weights = ScoringWeights::default();
        let keywords = SynonymTable::default().expand_query(&["ine".to_string()], 3);
        let p = make_procedure("Reposición de credencial ine", "");
        let with_ine = score_procedure(&p, &keywords, "ine", &weights);

        let only_ine = ExpandedKeywords {
            terms: ["ine".to_string()].into_iter().collect(),
            principal: Vec::new(),
        };
        assert_eq!(
            score_procedure(&p, &only_ine, "ine", &weights),
            weights.keyword_in_name * weights.short_keyword_factor
        );
        assert!(with_ine > weights.keyword_in_name * weights.short_keyword_factor);
    }

    #[test]
    fn test_field_weights_are_ordered() {
        let weights = ScoringWeights::default();
        let keywords = ExpandedKeywords {
            terms: ["predial".to_string()].into_iter().collect(),
            principal: Vec::new(),
        };
        let in_field = |json: serde_json::Value| {
            let p: Procedure = serde_json::from_value(json).unwrap();
            score_procedure(&p, &keywords, "", &weights)
        };

        let name = in_field(serde_json::json!({ "idtram": 1, "nombre": "Predial" }));
        let description = in_field(serde_json::json!({ "idtram": 1, "descripcion": "predial" }));
        let agency = in_field(serde_json::json!({ "idtram": 1, "secretaria": { "nombre": "Predial" } }));
        let department = in_field(serde_json::json!({ "idtram": 1, "dependencia": { "nombre": "Predial" } }));
        let requirements = in_field(serde_json::json!({ "idtram": 1, "requisitos": "Recibo predial" }));
        let kind = in_field(serde_json::json!({ "idtram": 1, "tipo": "Predial" }));

        assert!(name > description);
        assert!(description > agency);
        assert_eq!(agency, department);
        assert!(agency > requirements);
        assert!(requirements > kind);
        assert!(kind > 0.0);
    }

    #[test]
    fn test_multi_keyword_bonus_prefers_name() {
        let weights = ScoringWeights::default();
        let keywords = ExpandedKeywords {
            terms: ["alta".to_string(), "negocio".to_string()].into_iter().collect(),
            principal: Vec::new(),
        };
        let in_name = make_procedure("Alta de negocio", "");
        let split = make_procedure("Alta", "Registro de negocio");

        assert_eq!(
            score_procedure(&in_name, &keywords, "", &weights),
            2.0 * weights.keyword_in_name + 2.0 * weights.name_hits_bonus
        );
        assert_eq!(
            score_procedure(&split, &keywords, "", &weights),
            weights.keyword_in_name + weights.keyword_in_description + 2.0 * weights.combined_hits_bonus
        );
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let p: Procedure = serde_json::from_value(serde_json::json!({ "idtram": 3 })).unwrap();
        assert_eq!(score_for(&p, "licencia de conducir"), 0.0);
    }

    fn word() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec![
            "licencia", "conducir", "renovación", "acta", "nacimiento", "de", "predial",
            "canje", "agua", "ine", "placas", "duplicado", "constancia", "no", "registro",
        ])
    }

    fn query_word() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec![
            "licencia", "conducir", "vehiculo", "placas", "matrimonio", "acta", "nacimiento",
            "agua", "predial", "pago", "empresa", "escuela", "tarjeta",
        ])
    }

    fn sentence() -> impl Strategy<Value = String> {
        prop::collection::vec(word(), 0..6).prop_map(|w| w.join(" "))
    }

    proptest! {
        #[test]
        fn test_score_is_never_negative(name in sentence(), description in sentence(), query in sentence()) {
            let p = make_procedure(&name, &description);
            prop_assert!(score_for(&p, &query) >= 0.0);
        }

        #[test]
        fn test_variant_never_outscores_primary(base in sentence(), marker in prop::sample::select(VARIANT_MARKERS.to_vec())) {
            let primary = make_procedure(&base, "");
            let variant = make_procedure(&format!("{base} {marker}"), "");
            // Query with the base words only, so keyword overlap is identical.
            let query = base.clone();
            prop_assume!(!VARIANT_MARKERS.iter().any(|m| normalize_text(&base).contains(m)));
            let a = score_for(&primary, &query);
            let b = score_for(&variant, &query);
            let principal = SynonymTable::default()
                .expand_query(&extract_keywords(&query), ScoringWeights::default().principal_min_len)
                .principal;
            // Every principal group of the query is in both names.
            if principal.is_empty() {
                prop_assert!(a >= b, "primary {} < variant {}", a, b);
            } else {
                prop_assert!(a > b, "primary {} <= variant {}", a, b);
            }
        }

        #[test]
        fn test_name_phrase_beats_any_keyword_only_rival(
            words in prop::collection::vec(query_word(), 2..6),
            picks in prop::collection::vec(any::<prop::sample::Index>(), 0..60),
            phrase_in_description in any::<bool>(),
            variant_exact in any::<bool>(),
        ) {
            let query = words.join(" ");
            let normalized_query = normalize_text(&query);
            let weights = ScoringWeights::default();
            let keywords = SynonymTable::default()
                .expand_query(&extract_keywords(&query), weights.principal_min_len);
            let terms: Vec<&str> = keywords.terms.iter().map(String::as_str).collect();

            let mut stuffed: Vec<&str> = terms.clone();
            stuffed.extend(picks.iter().map(|i| *i.get(&terms)));
            let stuffed = stuffed.join(", ");
            let description = if phrase_in_description {
                format!("{query}. {stuffed}")
            } else {
                stuffed.clone()
            };
            let rival: Procedure = serde_json::from_value(serde_json::json!({
                "idtram": 2,
                "nombre": stuffed,
                "descripcion": description,
                "requisitos": stuffed,
                "tipo": stuffed,
                "secretaria": { "nombre": stuffed },
                "dependencia": { "nombre": stuffed },
            }))
            .unwrap();
            prop_assume!(!normalize_text(&rival.name).contains(normalized_query.as_str()));

            let suffix = if variant_exact { " (renovación)" } else { "" };
            let exact = make_procedure(&format!("Solicitud de {query}{suffix}"), "");

            let a = score_procedure(&exact, &keywords, &normalized_query, &weights);
            let b = score_procedure(&rival, &keywords, &normalized_query, &weights);
            prop_assert!(a > b, "exact {} <= rival {}", a, b);
        }
    }
}
