use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors produced while turning source files into payloads.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to read source file {path}: {source}")]
    SourceRead {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid source file {path}: {message}")]
    Format { path: Utf8PathBuf, message: String },
}

impl CodecError {
    pub fn format(path: impl Into<Utf8PathBuf>, message: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum PakError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pak file not found: {0}")]
    NotFound(Utf8PathBuf),

    #[error("Invalid pak magic: {0:?}")]
    InvalidMagic([u8; 4]),

    #[error("Unsupported pak version: {0}")]
    UnsupportedVersion(u32),

    #[error("Failed to encode pak: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("Failed to decode pak: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("Failed to persist pak file: {0}")]
    Persist(#[from] tempfile::PersistError),
}
