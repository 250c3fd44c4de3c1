use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

use crate::models::Procedure;

/// Read-only procedure catalog, built once at startup and shared by reference.
///
/// Records keep the order of the source file; that order is what the
/// "popular defaults" and tie-breaking rules of the search engine rely on.
#[derive(Debug, Default)]
pub struct Catalog {
    procedures: Vec<Procedure>,
    by_id: HashMap<i64, usize>,
}

impl Catalog {
    /// Build a catalog from records already in memory. Later records with an
    /// id that was already seen are dropped.
    pub fn new(procedures: Vec<Procedure>) -> Self {
        let mut kept = Vec::with_capacity(procedures.len());
        let mut by_id = HashMap::with_capacity(procedures.len());

        for procedure in procedures {
            if by_id.contains_key(&procedure.id) {
                tracing::warn!(
                    "Skipping duplicate procedure id {} ({})",
                    procedure.id,
                    procedure.name
                );
                continue;
            }
            by_id.insert(procedure.id, kept.len());
            kept.push(procedure);
        }

        Self {
            procedures: kept,
            by_id,
        }
    }

    /// Parse a RUTS JSON export (an array of procedures).
    pub fn from_json_str(data: &str) -> Result<Self> {
        let procedures: Vec<Procedure> =
            serde_json::from_str(data).context("Failed to parse procedure catalog")?;
        if procedures.is_empty() {
            anyhow::bail!("Procedure catalog is empty");
        }
        Ok(Self::new(procedures))
    }

    /// Load the catalog file. A missing, unparsable or empty file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read procedure catalog {}", path.display()))?;
        let catalog = Self::from_json_str(&data)
            .with_context(|| format!("Invalid procedure catalog {}", path.display()))?;
        tracing::info!(
            "Loaded {} procedures from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn all(&self) -> &[Procedure] {
        &self.procedures
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }

    pub fn get_by_id(&self, id: i64) -> Option<&Procedure> {
        self.by_id.get(&id).map(|&idx| &self.procedures[idx])
    }

    /// Exact, case-sensitive name lookup; the first match in catalog order wins.
    pub fn get_by_exact_name(&self, name: &str) -> Option<&Procedure> {
        self.procedures.iter().find(|p| p.name == name)
    }

    /// First `limit` records in catalog order.
    pub fn first(&self, limit: usize) -> &[Procedure] {
        &self.procedures[..limit.min(self.procedures.len())]
    }
}
