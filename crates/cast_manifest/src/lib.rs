//! The content manifest (`content.json`) of a Cast project.
//!
//! A manifest declares which source files are compiled into which pak. Each
//! top-level group becomes one `<group>.pak` file, and inside a group resources
//! are declared in one table per [`ResourceKind`]:
//!
//! ```json
//! {
//!   "Content": {
//!     "ui": {
//!       "Images": { "logo": { "Id": "logo", "Path": "logo.png" } },
//!       "TextFiles": { "credits": { "Id": "credits", "Path": "credits.txt" } }
//!     }
//!   }
//! }
//! ```
//!
//! Paths are relative to the group's folder (`Content/<group>/`).

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

mod entry;
mod error;

pub use entry::*;
pub use error::ManifestError;

/// File name of the manifest inside the content folder.
pub const MANIFEST_FILE_NAME: &str = "content.json";

/// Describes the content of a project: group name -> group.
///
/// Groups are kept ordered by name so every pass over the manifest, and every
/// pak built from it, is deterministic.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ContentManifest {
    #[serde(rename = "Content", default)]
    pub content: BTreeMap<String, ContentGroup>,
}

/// The resources of one pak, one table per resource kind keyed by resource id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct ContentGroup {
    #[serde(default)]
    pub images: BTreeMap<String, ImageEntry>,

    #[serde(default)]
    pub fonts: BTreeMap<String, FontEntry>,

    #[serde(default)]
    pub shaders: BTreeMap<String, ShaderEntry>,

    #[serde(default)]
    pub effects: BTreeMap<String, EffectEntry>,

    #[serde(default)]
    pub songs: BTreeMap<String, SongEntry>,

    #[serde(default)]
    pub text_files: BTreeMap<String, TextFileEntry>,
}

impl ContentManifest {
    /// Load a manifest from a JSON file.
    ///
    /// Returns [`ManifestError::Missing`] if the file does not exist and
    /// [`ManifestError::Parse`] if it is not a valid manifest document. No other
    /// validation is performed; see [`validate`](Self::validate).
    pub fn load(path: &Utf8Path) -> Result<Self, ManifestError> {
        let bytes = match std::fs::read(path.as_std_path()) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ManifestError::Missing(path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&bytes).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save the manifest as pretty-printed JSON, replacing the file.
    pub fn save(&self, path: &Utf8Path) -> Result<(), ManifestError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_std_path(), contents)?;
        Ok(())
    }

    pub fn group(&self, name: &str) -> Option<&ContentGroup> {
        self.content.get(name)
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut ContentGroup> {
        self.content.get_mut(name)
    }

    /// Total number of entries across all groups.
    pub fn entry_count(&self) -> usize {
        self.content.values().map(ContentGroup::len).sum()
    }

    /// Check that every table key matches its entry's id and that no id is
    /// declared twice anywhere in the manifest.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut seen: HashMap<&str, &str> = HashMap::new();

        for (group_name, group) in &self.content {
            for kind in ResourceKind::ALL {
                for (key, id) in group.keyed_ids(kind) {
                    if key != id {
                        return Err(ManifestError::IdMismatch {
                            group: group_name.clone(),
                            table: kind.manifest_key(),
                            key: key.to_string(),
                            id: id.to_string(),
                        });
                    }

                    if let Some(first_group) = seen.insert(key, group_name) {
                        return Err(ManifestError::DuplicateId {
                            id: key.to_string(),
                            first_group: first_group.to_string(),
                            second_group: group_name.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

impl ContentGroup {
    /// All entries of the group, table by table in [`ResourceKind::ALL`] order.
    pub fn entries(&self) -> Vec<ManifestEntry> {
        let mut entries = Vec::with_capacity(self.len());
        entries.extend(self.images.values().cloned().map(ManifestEntry::Image));
        entries.extend(self.fonts.values().cloned().map(ManifestEntry::Font));
        entries.extend(self.shaders.values().cloned().map(ManifestEntry::Shader));
        entries.extend(self.effects.values().cloned().map(ManifestEntry::Effect));
        entries.extend(self.songs.values().cloned().map(ManifestEntry::Song));
        entries.extend(self.text_files.values().cloned().map(ManifestEntry::TextFile));
        entries
    }

    /// Ids declared in the table of `kind`.
    pub fn ids(&self, kind: ResourceKind) -> Vec<&str> {
        self.keyed_ids(kind).into_iter().map(|(key, _)| key).collect()
    }

    pub fn contains(&self, kind: ResourceKind, id: &str) -> bool {
        match kind {
            ResourceKind::Image => self.images.contains_key(id),
            ResourceKind::Font => self.fonts.contains_key(id),
            ResourceKind::Shader => self.shaders.contains_key(id),
            ResourceKind::Effect => self.effects.contains_key(id),
            ResourceKind::Song => self.songs.contains_key(id),
            ResourceKind::TextFile => self.text_files.contains_key(id),
        }
    }

    pub fn get(&self, kind: ResourceKind, id: &str) -> Option<ManifestEntry> {
        match kind {
            ResourceKind::Image => self.images.get(id).cloned().map(ManifestEntry::Image),
            ResourceKind::Font => self.fonts.get(id).cloned().map(ManifestEntry::Font),
            ResourceKind::Shader => self.shaders.get(id).cloned().map(ManifestEntry::Shader),
            ResourceKind::Effect => self.effects.get(id).cloned().map(ManifestEntry::Effect),
            ResourceKind::Song => self.songs.get(id).cloned().map(ManifestEntry::Song),
            ResourceKind::TextFile => self
                .text_files
                .get(id)
                .cloned()
                .map(ManifestEntry::TextFile),
        }
    }

    /// Insert an entry under its own id, returning the entry it replaced.
    pub fn insert(&mut self, entry: ManifestEntry) -> Option<ManifestEntry> {
        let id = entry.id().to_string();
        match entry {
            ManifestEntry::Image(e) => self.images.insert(id, e).map(ManifestEntry::Image),
            ManifestEntry::Font(e) => self.fonts.insert(id, e).map(ManifestEntry::Font),
            ManifestEntry::Shader(e) => self.shaders.insert(id, e).map(ManifestEntry::Shader),
            ManifestEntry::Effect(e) => self.effects.insert(id, e).map(ManifestEntry::Effect),
            ManifestEntry::Song(e) => self.songs.insert(id, e).map(ManifestEntry::Song),
            ManifestEntry::TextFile(e) => {
                self.text_files.insert(id, e).map(ManifestEntry::TextFile)
            }
        }
    }

    pub fn remove(&mut self, kind: ResourceKind, id: &str) -> Option<ManifestEntry> {
        match kind {
            ResourceKind::Image => self.images.remove(id).map(ManifestEntry::Image),
            ResourceKind::Font => self.fonts.remove(id).map(ManifestEntry::Font),
            ResourceKind::Shader => self.shaders.remove(id).map(ManifestEntry::Shader),
            ResourceKind::Effect => self.effects.remove(id).map(ManifestEntry::Effect),
            ResourceKind::Song => self.songs.remove(id).map(ManifestEntry::Song),
            ResourceKind::TextFile => self.text_files.remove(id).map(ManifestEntry::TextFile),
        }
    }

    pub fn len(&self) -> usize {
        self.images.len()
            + self.fonts.len()
            + self.shaders.len()
            + self.effects.len()
            + self.songs.len()
            + self.text_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(table key, entry id)` pairs of one table.
    fn keyed_ids(&self, kind: ResourceKind) -> Vec<(&str, &str)> {
        fn pairs<'a, T>(
            table: &'a BTreeMap<String, T>,
            id: impl Fn(&'a T) -> &'a str,
        ) -> Vec<(&'a str, &'a str)> {
            table.iter().map(|(k, v)| (k.as_str(), id(v))).collect()
        }

        match kind {
            ResourceKind::Image => pairs(&self.images, |e| e.id.as_str()),
            ResourceKind::Font => pairs(&self.fonts, |e| e.id.as_str()),
            ResourceKind::Shader => pairs(&self.shaders, |e| e.id.as_str()),
            ResourceKind::Effect => pairs(&self.effects, |e| e.id.as_str()),
            ResourceKind::Song => pairs(&self.songs, |e| e.id.as_str()),
            ResourceKind::TextFile => pairs(&self.text_files, |e| e.id.as_str()),
        }
    }
}
