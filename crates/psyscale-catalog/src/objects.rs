use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::CatalogError;

/// Read a catalog object by key (a file name under `root`).
pub fn get_object(root: &Path, key: &str) -> Result<Vec<u8>, CatalogError> {
    fs::read(root.join(key)).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            CatalogError::NotFound {
                key: key.to_string(),
            }
        } else {
            CatalogError::Read {
                key: key.to_string(),
                source: e,
            }
        }
    })
}

/// List object keys directly under `root`, sorted. Subdirectories and
/// non-UTF-8 names are skipped.
pub fn list_objects(root: &Path) -> Result<Vec<String>, CatalogError> {
    let mut keys = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            keys.push(name);
        }
    }
    keys.sort();
    Ok(keys)
}
