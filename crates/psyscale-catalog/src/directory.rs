//! A catalog backed by one directory.
//!
//! Layout: `<root>/<id>.json` holds a scale definition and an optional
//! `<root>/<id>.lookup.json` holds the conversion table for a
//! `lookup_table` scale.

use std::path::{Path, PathBuf};

use psyscale_core::catalog_keys;
use psyscale_core::models::scale::{ScaleDefinition, ScoringMethod};
use psyscale_scales::ScaleCatalog;
use psyscale_scales::strategy::{LookupTable, LookupTableStrategy, StrategyRegistry};

use crate::error::CatalogError;
use crate::{objects, state};

#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
}

impl DirectoryCatalog {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(CatalogError::MissingRoot(root));
        }
        tracing::debug!(root = %root.display(), "catalog opened");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load and parse a definition. The definition's own id must match the
    /// file it was read from.
    pub fn load_scale(&self, id: &str) -> Result<ScaleDefinition, CatalogError> {
        let key = catalog_keys::scale_definition(id)?;
        let scale: ScaleDefinition = state::load_json(&self.root, &key)?;
        if scale.id != id {
            return Err(CatalogError::IdMismatch {
                key,
                declared: scale.id,
            });
        }
        tracing::debug!(scale_id = id, items = scale.items.len(), "scale loaded");
        Ok(scale)
    }

    pub fn lookup_table(&self, id: &str) -> Result<Option<LookupTable>, CatalogError> {
        let key = catalog_keys::lookup_table(id)?;
        state::load_json_if_exists(&self.root, &key)
    }

    /// Build strategies for every `lookup_table` scale that ships a table.
    /// Scales without one, and files that fail to load, are left out and
    /// fail at scoring time with a missing-strategy error. Only a failure to
    /// list the directory is returned.
    pub fn strategy_registry(&self) -> Result<StrategyRegistry, CatalogError> {
        let mut registry = StrategyRegistry::new();
        for id in self.list_ids()? {
            let scale = match self.load_scale(&id) {
                Ok(scale) => scale,
                Err(e) => {
                    tracing::warn!(scale_id = %id, error = %e, "skipping unloadable scale");
                    continue;
                }
            };
            if scale.scoring_method != ScoringMethod::LookupTable {
                continue;
            }
            match self.lookup_table(&id) {
                Ok(Some(table)) => {
                    registry.register(id, Box::new(LookupTableStrategy::new(table)));
                }
                Ok(None) => {
                    tracing::warn!(scale_id = %id, "lookup_table scale has no table");
                }
                Err(e) => {
                    tracing::warn!(scale_id = %id, error = %e, "skipping unloadable lookup table");
                }
            }
        }
        tracing::info!(strategies = registry.len(), "strategy registry built");
        Ok(registry)
    }

    fn list_ids(&self) -> Result<Vec<String>, CatalogError> {
        let mut ids: Vec<String> = objects::list_objects(&self.root)?
            .iter()
            .filter_map(|key| catalog_keys::scale_id_from_file_name(key))
            .map(str::to_string)
            .collect();
        ids.sort();
        Ok(ids)
    }
}

impl ScaleCatalog for DirectoryCatalog {
    type Error = CatalogError;

    fn scale(&self, id: &str) -> Result<ScaleDefinition, CatalogError> {
        self.load_scale(id)
    }

    fn scale_ids(&self) -> Result<Vec<String>, CatalogError> {
        self.list_ids()
    }
}
