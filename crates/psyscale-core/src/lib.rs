//! psyscale-core
//!
//! Pure domain types for standardized psychometric scales: the scale
//! definition model, captured responses, and scoring results. No engine
//! logic lives here; this is the shared vocabulary of the psyscale system.

pub mod catalog_keys;
pub mod error;
pub mod models;
