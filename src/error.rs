use std::path::PathBuf;

use thiserror::Error;

/// Why a snapshot of the register could not be fetched.
///
/// Callers get this instead of an empty record list so they can retry or
/// show a fallback of their own.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Project store query failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to read project snapshot {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Project snapshot is not a JSON array of records: {0}")]
    Decode(#[from] serde_json::Error),
}
