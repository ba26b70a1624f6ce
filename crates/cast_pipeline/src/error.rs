//! Error types for build and watch operations.
//!
//! All fallible functions in this crate return [`Result<T>`], which uses [`Error`]
//! as the error type. Errors from the manifest, pak and codec crates are
//! converted via `From` impls.

use camino::Utf8PathBuf;
use cast_manifest::{ManifestError, ResourceKind};
use cast_pak::{CodecError, PakError};
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The project root has no `Content` folder or no `content.json` inside it.
    #[error("Invalid project: {0}")]
    InvalidProject(String),

    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Pak error: {0}")]
    Pak(#[from] PakError),

    /// A source file failed to compile into a payload.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// A source file was renamed to an extension its resource kind cannot use.
    #[error("Cannot rename {kind} '{id}' to '{path}': unsupported extension")]
    UnsupportedRename {
        kind: ResourceKind,
        id: String,
        path: Utf8PathBuf,
    },

    /// A rename would give a resource an id that is already declared.
    #[error("Cannot rename '{from}' to '{to}': id is already used in group '{group}'")]
    IdCollision {
        from: String,
        to: String,
        group: String,
    },

    /// The manifest, the lookup index and the paks disagree about a resource.
    #[error("Inconsistent state: {0}")]
    InconsistentState(String),

    /// An event path does not belong to the group folder of its resource.
    #[error("Asset path {path} is not inside group folder {group_dir}")]
    InvalidAssetPath {
        path: Utf8PathBuf,
        group_dir: Utf8PathBuf,
    },

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Watch worker thread panicked")]
    WorkerPanicked,
}
