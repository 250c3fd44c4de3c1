use crate::catalog::Catalog;
use crate::models::Procedure;
use crate::search::normalize::normalize_text;

/// Broad domains used only when scored matching found nothing.
/// Order matters: the first category hit by the query wins.
fn procedure_categories() -> Vec<(&'static str, &'static [&'static str])> {
    vec![
        ("agua", &["agua", "potable", "alcantarillado", "drenaje", "hidrico", "toma"]),
        ("licencia", &["licencia", "conducir", "manejo", "chofer", "automovilista", "vehiculo"]),
        ("acta", &["acta", "nacimiento", "matrimonio", "defuncion", "registro", "civil"]),
        ("predial", &["predial", "impuesto", "propiedad", "catastro", "terreno"]),
        ("construccion", &["construccion", "obra", "edificar", "permiso", "licencia"]),
        ("salud", &["salud", "medico", "clinica", "hospital", "sanitario"]),
        ("educacion", &["educacion", "escuela", "certificado", "titulo", "estudios"]),
        ("negocio", &["negocio", "comercio", "establecimiento", "apertura", "empresa"]),
        ("transporte", &["transporte", "vehiculo", "placas", "tarjeton", "circulacion"]),
        ("medio_ambiente", &["ambiente", "ecologia", "residuos", "basura", "ambiental"]),
    ]
}

/// Ordered category tag → representative terms.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<(String, Vec<String>)>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new(procedure_categories())
    }
}

impl CategoryTable {
    pub fn new<S: AsRef<str>>(categories: Vec<(S, &[S])>) -> Self {
        Self {
            categories: categories
                .into_iter()
                .map(|(tag, terms)| {
                    (
                        tag.as_ref().to_string(),
                        terms.iter().map(|t| t.as_ref().to_string()).collect(),
                    )
                })
                .collect(),
        }
    }

    /// First category with a term contained in the normalized query.
    pub fn detect(&self, normalized_query: &str) -> Option<(&str, &[String])> {
        self.categories
            .iter()
            .find(|(_, terms)| terms.iter().any(|t| normalized_query.contains(t.as_str())))
            .map(|(tag, terms)| (tag.as_str(), terms.as_slice()))
    }

    /// Procedures in the first matching category, falling back to the first
    /// `limit` catalog records when the query hits no category or the
    /// category selects nothing.
    pub fn match_by_category<'a>(
        &self,
        catalog: &'a Catalog,
        normalized_query: &str,
        limit: usize,
    ) -> Vec<&'a Procedure> {
        if let Some((tag, terms)) = self.detect(normalized_query) {
            let matches: Vec<&Procedure> = catalog
                .all()
                .iter()
                .filter(|p| {
                    let name = normalize_text(&p.name);
                    let description = normalize_text(&p.description);
                    terms
                        .iter()
                        .any(|t| name.contains(t.as_str()) || description.contains(t.as_str()))
                })
                .take(limit)
                .collect();

            if !matches.is_empty() {
                tracing::debug!("Category '{tag}' matched {} procedures", matches.len());
                return matches;
            }
            tracing::debug!("Category '{tag}' matched no procedures");
        }

        catalog.first(limit).iter().collect()
    }
}
