//! psyscale-catalog
//!
//! File-backed scale catalog. Thin wrapper around a directory of JSON
//! definitions and lookup tables.

pub mod directory;
pub mod error;
pub mod objects;
pub mod state;

pub use directory::DirectoryCatalog;
pub use error::CatalogError;
