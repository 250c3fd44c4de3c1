use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::search::SearchEngine;

/// Shared application state. Everything in it is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: Arc<SearchEngine>,
}

impl AppState {
    /// Load the catalog named by the config and build the search engine.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let catalog = Catalog::load(&config.catalog_path)?;
        Ok(Self::with_catalog(config, catalog))
    }

    pub fn with_catalog(config: Config, catalog: Catalog) -> Self {
        let engine = SearchEngine::new(Arc::new(catalog), config.scoring.clone())
            .with_suggest_overfetch(config.suggest_overfetch);

        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
        }
    }
}
