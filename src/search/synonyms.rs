use std::collections::BTreeSet;

/// Canonical term → synonyms. Every entry lists its canonical term too.
/// Terms are written already normalized.
fn procedure_synonyms() -> Vec<(&'static str, &'static [&'static str])> {
    vec![
        ("licencia", &["licencia", "carnet", "credencial"]),
        ("conducir", &["conducir", "manejar", "manejo", "chofer", "automovilista"]),
        ("acta", &["acta", "actas", "certificado"]),
        ("nacimiento", &["nacimiento", "nacer", "nacido", "nacio"]),
        ("matrimonio", &["matrimonio", "casamiento", "boda", "casarse"]),
        ("divorcio", &["divorcio", "separacion"]),
        ("defuncion", &["defuncion", "fallecimiento", "muerte", "fallecido"]),
        ("vehiculo", &["vehiculo", "automovil", "carro", "coche", "auto"]),
        ("placas", &["placas", "placa", "matricula"]),
        ("tarjeta", &["tarjeta", "tarjeton"]),
        ("agua", &["agua", "potable", "hidrico"]),
        ("predial", &["predial", "catastro", "catastral"]),
        ("empresa", &["empresa", "negocio", "comercio", "establecimiento"]),
        ("identificacion", &["identificacion", "credencial", "ine"]),
        ("escuela", &["escuela", "escolar", "educacion", "estudios"]),
        ("titulo", &["titulo", "cedula"]),
        ("salud", &["salud", "medico", "clinica", "hospital", "sanitario"]),
        ("pago", &["pago", "pagar", "cobro"]),
        ("basura", &["basura", "residuos", "desechos"]),
        ("empleo", &["empleo", "trabajo", "vacante"]),
        ("beca", &["beca", "becas", "apoyo"]),
    ]
}

/// Fixed synonym table used to widen a keyword set before scoring.
#[derive(Debug, Clone)]
pub struct SynonymTable {
    entries: Vec<(String, Vec<String>)>,
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::new(procedure_synonyms())
    }
}

/// Keywords after synonym expansion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpandedKeywords {
    /// Query keywords plus every synonym reached from them
    pub terms: BTreeSet<String>,
    /// One group per principal (long enough) query keyword: the keyword and
    /// its synonyms. A group is present in a text when any member is.
    pub principal: Vec<BTreeSet<String>>,
}

impl SynonymTable {
    pub fn new<S: AsRef<str>>(entries: Vec<(S, &[S])>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(canonical, synonyms)| {
                let canonical = canonical.as_ref().to_string();
                let mut list: Vec<String> = synonyms.iter().map(|s| s.as_ref().to_string()).collect();
                if !list.contains(&canonical) {
                    list.insert(0, canonical.clone());
                }
                (canonical, list)
            })
            .collect();
        Self { entries }
    }

    /// All synonyms of every entry `keyword` belongs to, plus `keyword`.
    pub fn synonyms_of(&self, keyword: &str) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        out.insert(keyword.to_string());
        for (canonical, synonyms) in &self.entries {
            if canonical == keyword || synonyms.iter().any(|s| s == keyword) {
                out.extend(synonyms.iter().cloned());
            }
        }
        out
    }

    /// Input keywords plus the synonyms of every table entry they hit.
    pub fn expand(&self, keywords: &[String]) -> BTreeSet<String> {
        keywords
            .iter()
            .flat_map(|k| self.synonyms_of(k))
            .collect()
    }

    /// Expand keywords and group the principal ones (longer than
    /// `principal_min_len` characters) with their synonyms.
    pub fn expand_query(&self, keywords: &[String], principal_min_len: usize) -> ExpandedKeywords {
        let mut principal: Vec<BTreeSet<String>> = Vec::new();
        for keyword in keywords {
            if keyword.chars().count() <= principal_min_len {
                continue;
            }
            let group = self.synonyms_of(keyword);
            if !principal.contains(&group) {
                principal.push(group);
            }
        }

        ExpandedKeywords {
            terms: self.expand(keywords),
            principal,
        }
    }
}
