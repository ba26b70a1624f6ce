//! Incremental handling of content file events.
//!
//! A [`WatchSession`] owns the manifest, the [`LookupIndex`] derived from it and
//! a cache of paks. [`WatchSession::apply`] brings paks and manifest back in sync
//! after one [`ContentEvent`]:
//!
//! | Event | Action | Persisted |
//! |---|---|---|
//! | asset changed/created | rebuild the payload, upsert into the group's pak | pak |
//! | asset deleted | remove from the pak and the manifest | pak, manifest |
//! | asset renamed | re-key the entry and its payload under the new file stem | manifest, pak |
//! | manifest changed | reload, prune removed entries, build added entries | paks |
//!
//! A resource is identified by the file stem of the event path. Events are
//! applied one at a time and never batched; every mutation is persisted before
//! `apply` returns. A failing event may leave the effects persisted before the
//! failure in place.

use crate::builder::{build_entry, load_manifest};
use crate::config::PipelineConfig;
use crate::diff::{added_resources, AddedResource};
use crate::error::{Error, Result};
use crate::index::LookupIndex;
use crate::project::ContentPaths;
use camino::{Utf8Path, Utf8PathBuf};
use cast_manifest::{ContentManifest, ManifestEntry, MANIFEST_FILE_NAME};
use cast_pak::{Pak, PakError};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

/// A file system change under the content folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentEvent {
    Created(Utf8PathBuf),
    Changed(Utf8PathBuf),
    Deleted(Utf8PathBuf),
    Renamed { from: Utf8PathBuf, to: Utf8PathBuf },
}

impl fmt::Display for ContentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentEvent::Created(p) => write!(f, "created {}", p),
            ContentEvent::Changed(p) => write!(f, "changed {}", p),
            ContentEvent::Deleted(p) => write!(f, "deleted {}", p),
            ContentEvent::Renamed { from, to } => write!(f, "renamed {} -> {}", from, to),
        }
    }
}

/// What a path refers to, as far as the session is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    Asset,
    Manifest,
    Ignored,
}

/// Classify a path by file name and extension.
pub fn classify(path: &Utf8Path, config: &PipelineConfig) -> EventTarget {
    if path.file_name() == Some(MANIFEST_FILE_NAME) {
        return EventTarget::Manifest;
    }

    match path.extension() {
        Some(ext) if config.is_asset_extension(&format!(".{}", ext)) => EventTarget::Asset,
        _ => EventTarget::Ignored,
    }
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event did not concern any declared resource.
    Ignored,
    Rebuilt {
        id: String,
        group: String,
    },
    Removed {
        id: String,
        group: String,
    },
    Renamed {
        from: String,
        to: String,
        group: String,
    },
    ManifestReloaded {
        /// Newly declared ids whose payload was built (or that need none).
        added: Vec<String>,
        removed: Vec<String>,
        /// Newly declared ids that failed to build and are missing from their pak.
        failed: Vec<String>,
    },
}

impl fmt::Display for EventOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventOutcome::Ignored => write!(f, "ignored"),
            EventOutcome::Rebuilt { id, group } => write!(f, "rebuilt '{}' in {}.pak", id, group),
            EventOutcome::Removed { id, group } => write!(f, "removed '{}' from {}.pak", id, group),
            EventOutcome::Renamed { from, to, group } => {
                write!(f, "renamed '{}' to '{}' in {}.pak", from, to, group)
            }
            EventOutcome::ManifestReloaded {
                added,
                removed,
                failed,
            } => {
                write!(
                    f,
                    "reloaded manifest ({} added, {} removed",
                    added.len(),
                    removed.len()
                )?;
                if !failed.is_empty() {
                    write!(f, ", failed to build: {}", failed.join(", "))?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Live state of a watched project.
pub struct WatchSession {
    paths: ContentPaths,
    config: PipelineConfig,
    manifest: ContentManifest,
    index: LookupIndex,
    paks: HashMap<String, Pak>,
}

impl WatchSession {
    /// Load and validate the manifest of a resolved project.
    ///
    /// Paks are loaded lazily, the first time an event touches their group.
    pub fn new(paths: ContentPaths, config: PipelineConfig) -> Result<Self> {
        let manifest = load_manifest(&paths.manifest_path)?;
        let index = LookupIndex::build(&manifest);

        Ok(Self {
            paths,
            config,
            manifest,
            index,
            paks: HashMap::new(),
        })
    }

    pub fn paths(&self) -> &ContentPaths {
        &self.paths
    }

    pub fn manifest(&self) -> &ContentManifest {
        &self.manifest
    }

    pub fn index(&self) -> &LookupIndex {
        &self.index
    }

    /// The cached pak of `group`, if an event has touched it.
    pub fn cached_pak(&self, group: &str) -> Option<&Pak> {
        self.paks.get(group)
    }

    pub fn apply(&mut self, event: &ContentEvent) -> Result<EventOutcome> {
        match event {
            ContentEvent::Created(path) | ContentEvent::Changed(path) => {
                match classify(path, &self.config) {
                    EventTarget::Asset => self.asset_changed(path),
                    EventTarget::Manifest => self.reload_manifest(),
                    EventTarget::Ignored => Ok(EventOutcome::Ignored),
                }
            }
            ContentEvent::Deleted(path) => match classify(path, &self.config) {
                EventTarget::Asset => self.asset_deleted(path),
                EventTarget::Manifest => {
                    tracing::warn!("Content manifest was deleted, keeping the loaded copy");
                    Ok(EventOutcome::Ignored)
                }
                EventTarget::Ignored => Ok(EventOutcome::Ignored),
            },
            ContentEvent::Renamed { from, to } => {
                let targets = (classify(from, &self.config), classify(to, &self.config));
                match targets {
                    // Editors commonly save by renaming a temporary file over the target.
                    (_, EventTarget::Manifest) => self.reload_manifest(),
                    (EventTarget::Asset, _) => self.asset_renamed(from, to),
                    (_, EventTarget::Asset) => self.asset_changed(to),
                    _ => Ok(EventOutcome::Ignored),
                }
            }
        }
    }

    fn asset_changed(&mut self, path: &Utf8Path) -> Result<EventOutcome> {
        let Some((group, entry)) = self.resolve(path) else {
            tracing::debug!("Ignoring change of undeclared asset {}", path);
            return Ok(EventOutcome::Ignored);
        };

        self.rebuild(&group, &entry)
    }

    fn asset_deleted(&mut self, path: &Utf8Path) -> Result<EventOutcome> {
        let Some((group, entry)) = self.resolve(path) else {
            return Err(Error::InconsistentState(format!(
                "deleted asset {} is not declared in the manifest",
                path
            )));
        };
        let id = entry.id().to_string();

        if entry.kind().produces_payload() {
            let level = self.config.compression_level;
            let content_dir = self.paths.content_dir.clone();
            let pak = self.pak_mut(&group)?;

            if !pak.remove(&id) {
                return Err(Error::InconsistentState(format!(
                    "resource '{}' is missing from {}.pak",
                    id, group
                )));
            }
            pak.save_with_level(&content_dir, level)?;
        }

        self.manifest_group_mut(&group)?.remove(entry.kind(), &id);
        self.persist_manifest()?;

        Ok(EventOutcome::Removed { id, group })
    }

    fn asset_renamed(&mut self, from: &Utf8Path, to: &Utf8Path) -> Result<EventOutcome> {
        let Some((group, entry)) = self.resolve(from) else {
            tracing::debug!("Ignoring rename of undeclared asset {}", from);
            return Ok(EventOutcome::Ignored);
        };
        let old_id = entry.id().to_string();
        let kind = entry.kind();

        let unsupported = || Error::UnsupportedRename {
            kind,
            id: old_id.clone(),
            path: to.to_path_buf(),
        };

        let new_id = to.file_stem().filter(|s| !s.is_empty()).ok_or_else(unsupported)?;
        let extension = to.extension().map(|e| format!(".{}", e)).unwrap_or_default();
        let new_path = self.paths.relative_to_group(&group, to)?;
        let new_entry = entry
            .renamed(new_id, &extension, &new_path)
            .ok_or_else(unsupported)?;

        if new_id != old_id {
            if let Some(owner) = self.index.group_of(new_id) {
                return Err(Error::IdCollision {
                    from: old_id,
                    to: new_id.to_string(),
                    group: owner.to_string(),
                });
            }
        }

        let level = self.config.compression_level;
        let content_dir = self.paths.content_dir.clone();

        // The old key leaves the pak on disk before the manifest stops declaring it.
        if kind.produces_payload() {
            let pak = self.pak_mut(&group)?;
            if pak.remove(&old_id) {
                pak.save_with_level(&content_dir, level)?;
            }
        }

        let manifest_group = self.manifest_group_mut(&group)?;
        manifest_group.remove(kind, &old_id);
        manifest_group.insert(new_entry.clone());
        self.persist_manifest()?;

        let new_id = new_entry.id().to_string();

        let payload = build_entry(&content_dir, &group, &new_entry)?;
        if kind.produces_payload() {
            let pak = self.pak_mut(&group)?;
            if let Some(payload) = payload {
                pak.upsert(new_id.clone(), payload);
            }
            pak.save_with_level(&content_dir, level)?;
        }

        Ok(EventOutcome::Renamed {
            from: old_id,
            to: new_id,
            group,
        })
    }

    /// Reload `content.json`. On failure the previously loaded manifest stays active.
    fn reload_manifest(&mut self) -> Result<EventOutcome> {
        let new_manifest = load_manifest(&self.paths.manifest_path)?;

        let added = added_resources(&self.manifest, &new_manifest);
        let removed = added_resources(&new_manifest, &self.manifest);

        self.manifest = new_manifest;
        self.index = LookupIndex::build(&self.manifest);

        for resource in &removed {
            if let Err(e) = self.prune(resource) {
                tracing::error!("Failed to remove '{}' from {}.pak: {}", resource.id, resource.group, e);
            }
        }

        let mut built = Vec::with_capacity(added.len());
        let mut failed = Vec::new();
        for resource in added {
            let Some(entry) = self.index.entry(&resource.id).cloned() else {
                continue;
            };
            match self.rebuild(&resource.group, &entry) {
                Ok(_) => built.push(resource.id),
                Err(e) => {
                    tracing::error!("Failed to build added resource '{}': {}", resource.id, e);
                    failed.push(resource.id);
                }
            }
        }

        Ok(EventOutcome::ManifestReloaded {
            added: built,
            removed: removed.into_iter().map(|r| r.id).collect(),
            failed,
        })
    }

    /// Rebuild one entry's payload and persist its group's pak.
    fn rebuild(&mut self, group: &str, entry: &ManifestEntry) -> Result<EventOutcome> {
        let content_dir = self.paths.content_dir.clone();
        let Some(payload) = build_entry(&content_dir, group, entry)? else {
            tracing::debug!("{} '{}' has no decoder, nothing to rebuild", entry.kind(), entry.id());
            return Ok(EventOutcome::Ignored);
        };

        let level = self.config.compression_level;
        let pak = self.pak_mut(group)?;
        pak.upsert(entry.id(), payload);
        pak.save_with_level(&content_dir, level)?;

        Ok(EventOutcome::Rebuilt {
            id: entry.id().to_string(),
            group: group.to_string(),
        })
    }

    /// Drop the payload of a resource that is no longer declared in its group.
    fn prune(&mut self, resource: &AddedResource) -> Result<()> {
        if !resource.kind.produces_payload() {
            return Ok(());
        }

        // Still declared under another kind of the same group: the rebuild replaces it.
        if self.index.group_of(&resource.id) == Some(resource.group.as_str()) {
            return Ok(());
        }

        let level = self.config.compression_level;
        let content_dir = self.paths.content_dir.clone();
        let pak = self.pak_mut(&resource.group)?;
        if pak.remove(&resource.id) {
            pak.save_with_level(&content_dir, level)?;
        }
        Ok(())
    }

    /// Group and entry of the resource named by `path`'s file stem.
    fn resolve(&self, path: &Utf8Path) -> Option<(String, ManifestEntry)> {
        let id = path.file_stem()?;
        let (group, entry) = self.index.resolve(id)?;
        Some((group.to_string(), entry.clone()))
    }

    /// The cached pak of `group`, loading it on first use.
    ///
    /// A group that has no pak on disk yet starts out empty.
    fn pak_mut(&mut self, group: &str) -> Result<&mut Pak> {
        match self.paks.entry(group.to_string()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let pak = match Pak::load(&self.paths.content_dir, group) {
                    Ok(pak) => pak,
                    Err(PakError::NotFound(path)) => {
                        tracing::debug!("No pak at {}, starting empty", path);
                        Pak::new(group)
                    }
                    Err(err) => return Err(err.into()),
                };
                Ok(e.insert(pak))
            }
        }
    }

    fn manifest_group_mut(&mut self, group: &str) -> Result<&mut cast_manifest::ContentGroup> {
        self.manifest.group_mut(group).ok_or_else(|| {
            Error::InconsistentState(format!("group '{}' is not declared in the manifest", group))
        })
    }

    /// Save the manifest and rebuild the index from it.
    fn persist_manifest(&mut self) -> Result<()> {
        self.manifest.save(&self.paths.manifest_path)?;
        self.index = LookupIndex::build(&self.manifest);
        Ok(())
    }
}
