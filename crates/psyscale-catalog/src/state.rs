use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::CatalogError;
use crate::objects;

/// Load a JSON object from the catalog.
pub fn load_json<T: DeserializeOwned>(root: &Path, key: &str) -> Result<T, CatalogError> {
    let body = objects::get_object(root, key)?;
    let value = serde_json::from_slice(&body)?;
    Ok(value)
}

/// Load a JSON object if present. Absence is not an error.
pub fn load_json_if_exists<T: DeserializeOwned>(
    root: &Path,
    key: &str,
) -> Result<Option<T>, CatalogError> {
    match load_json(root, key) {
        Ok(value) => Ok(Some(value)),
        Err(CatalogError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}
