use std::sync::Arc;

use psyscale_catalog::DirectoryCatalog;
use psyscale_core::models::scale::ScaleDefinition;
use psyscale_scales::strategy::StrategyRegistry;
use psyscale_scales::{BuiltinCatalog, ScaleCatalog};

/// Where scales come from for this invocation. A configured directory
/// shadows built-in scales of the same id.
pub struct Catalogs {
    pub directory: Option<DirectoryCatalog>,
    pub strategies: StrategyRegistry,
}

impl Catalogs {
    pub fn new(directory: Option<DirectoryCatalog>) -> eyre::Result<Self> {
        let strategies = match &directory {
            Some(catalog) => catalog.strategy_registry()?,
            None => StrategyRegistry::new(),
        };
        Ok(Self {
            directory,
            strategies,
        })
    }

    pub fn scale(&self, id: &str) -> eyre::Result<Arc<ScaleDefinition>> {
        if let Some(catalog) = &self.directory
            && catalog.scale_ids()?.iter().any(|known| known == id)
        {
            return Ok(Arc::new(catalog.scale(id)?));
        }
        Ok(Arc::new(BuiltinCatalog.scale(id)?))
    }

    /// Every available id, with its source, sorted and de-duplicated.
    pub fn scale_ids(&self) -> eyre::Result<Vec<(String, &'static str)>> {
        let mut ids: Vec<(String, &'static str)> = Vec::new();
        if let Some(catalog) = &self.directory {
            ids.extend(catalog.scale_ids()?.into_iter().map(|id| (id, "catalog")));
        }
        for id in BuiltinCatalog.scale_ids()? {
            if !ids.iter().any(|(known, _)| *known == id) {
                ids.push((id, "builtin"));
            }
        }
        ids.sort();
        Ok(ids)
    }
}
