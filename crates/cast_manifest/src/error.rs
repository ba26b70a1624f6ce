use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, saving or validating a content manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Content manifest not found: {0}")]
    Missing(Utf8PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse content manifest {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The lookup index is flat, so an id may only be declared once per manifest.
    #[error("Duplicate resource id '{id}' declared in groups '{first_group}' and '{second_group}'")]
    DuplicateId {
        id: String,
        first_group: String,
        second_group: String,
    },

    #[error("Resource '{key}' in {table} of group '{group}' declares a different id '{id}'")]
    IdMismatch {
        group: String,
        table: &'static str,
        key: String,
        id: String,
    },
}
