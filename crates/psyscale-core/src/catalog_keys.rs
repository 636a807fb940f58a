//! Catalog file naming conventions.
//!
//! Pure string functions with no filesystem access. These define the layout
//! of a scale catalog directory: one JSON definition per scale, plus an
//! optional lookup table for scales scored through a conversion table.

use crate::error::CoreError;

pub const DEFINITION_SUFFIX: &str = ".json";

pub const LOOKUP_TABLE_SUFFIX: &str = ".lookup.json";

pub fn scale_definition(id: &str) -> Result<String, CoreError> {
    check_scale_id(id)?;
    Ok(format!("{id}{DEFINITION_SUFFIX}"))
}

pub fn lookup_table(id: &str) -> Result<String, CoreError> {
    check_scale_id(id)?;
    Ok(format!("{id}{LOOKUP_TABLE_SUFFIX}"))
}

/// Recover the scale id from a catalog file name. Lookup tables are not
/// definitions and yield `None`.
pub fn scale_id_from_file_name(file_name: &str) -> Option<&str> {
    if file_name.ends_with(LOOKUP_TABLE_SUFFIX) {
        return None;
    }
    let id = file_name.strip_suffix(DEFINITION_SUFFIX)?;
    check_scale_id(id).ok().map(|()| id)
}

/// Scale ids become file names, so they are restricted to
/// `[A-Za-z0-9_-]` and may not be empty.
pub fn check_scale_id(id: &str) -> Result<(), CoreError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(CoreError::InvalidScaleId(id.to_string()))
    }
}
