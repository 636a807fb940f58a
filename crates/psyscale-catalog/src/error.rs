use std::path::PathBuf;

use thiserror::Error;

use psyscale_core::error::CoreError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog directory not found: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("{key} defines scale '{declared}' instead")]
    IdMismatch { key: String, declared: String },

    #[error(transparent)]
    Key(#[from] CoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("read error on {key}: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("list error: {0}")]
    List(#[from] std::io::Error),
}
