//! On-disk layout of a Cast project.
//!
//! ```text
//! <project_root>/
//!   cast.toml            (optional, see PipelineConfig)
//!   Content/
//!     content.json
//!     <group>.pak        (build output)
//!     <group>/...        (source files of the group)
//! ```

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use cast_manifest::MANIFEST_FILE_NAME;
use cast_pak::Pak;

/// Name of the folder holding the manifest, sources and paks.
pub const CONTENT_FOLDER: &str = "Content";

/// Resolved paths of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPaths {
    pub project_root: Utf8PathBuf,
    pub content_dir: Utf8PathBuf,
    pub manifest_path: Utf8PathBuf,
}

impl ContentPaths {
    /// Resolve and validate the layout under `project_root`.
    ///
    /// Fails with [`Error::InvalidProject`] if the content folder or the manifest
    /// inside it is missing.
    pub fn resolve(project_root: impl Into<Utf8PathBuf>) -> Result<Self> {
        let project_root = project_root.into();
        let content_dir = project_root.join(CONTENT_FOLDER);
        let manifest_path = content_dir.join(MANIFEST_FILE_NAME);

        if !content_dir.is_dir() {
            return Err(Error::InvalidProject(format!(
                "content folder not found: {}",
                content_dir
            )));
        }

        if !manifest_path.is_file() {
            return Err(Error::InvalidProject(format!(
                "content manifest not found: {}",
                manifest_path
            )));
        }

        Ok(Self {
            project_root,
            content_dir,
            manifest_path,
        })
    }

    /// Folder holding the sources of `group`.
    pub fn group_dir(&self, group: &str) -> Utf8PathBuf {
        self.content_dir.join(group)
    }

    pub fn pak_path(&self, group: &str) -> Utf8PathBuf {
        Pak::path_for(&self.content_dir, group)
    }

    /// Path of `path` relative to the folder of `group`, with `/` separators.
    pub fn relative_to_group(&self, group: &str, path: &Utf8Path) -> Result<String> {
        let group_dir = self.group_dir(group);
        let relative = path
            .strip_prefix(&group_dir)
            .map_err(|_| Error::InvalidAssetPath {
                path: path.to_path_buf(),
                group_dir: group_dir.clone(),
            })?;

        Ok(relative
            .components()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join("/"))
    }
}
