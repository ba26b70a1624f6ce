//! One-shot full content build.
//!
//! The [`ContentBuilder`] compiles every group of a project's manifest into a
//! fresh [`Pak`] and writes them next to the manifest.
//!
//! # Build Algorithm
//!
//! 1. Resolve `<project_root>/Content/content.json` (see [`ContentPaths`]).
//! 2. Load and validate the manifest.
//! 3. For each group in name order, build a payload for every entry through the
//!    codec. Effects and songs have no decoder and are skipped.
//! 4. Only when every group built successfully, write each pak to
//!    `<project_root>/Content/<group>.pak`.
//!
//! Any codec error aborts the build before anything is written.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::project::ContentPaths;
use camino::{Utf8Path, Utf8PathBuf};
use cast_manifest::{ContentGroup, ContentManifest, ManifestEntry};
use cast_pak::{codec, Pak, ResourcePayload};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Progress information emitted during a build.
#[derive(Debug, Clone)]
pub struct BuildProgress {
    pub stage: BuildStage,
    /// Group currently being built or written.
    pub current_group: Option<String>,
    /// 1-based index of the current group.
    pub current: u32,
    pub total: u32,
}

/// Stages of a build, emitted in order:
/// `LoadingManifest` -> `BuildingGroup` (repeated) -> `WritingPaks` -> `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    LoadingManifest,
    BuildingGroup,
    WritingPaks,
    Complete,
}

/// A pak written by a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPak {
    pub name: String,
    pub path: Utf8PathBuf,
    pub resource_count: usize,
}

/// Summary returned after a build completes.
#[derive(Debug)]
pub struct BuildReport {
    pub content_dir: Utf8PathBuf,
    /// Paks in manifest order.
    pub paks: Vec<BuiltPak>,
    /// Entries that were skipped because their kind has no decoder.
    pub skipped: usize,
    /// Wall-clock time for the entire build.
    pub build_time: Duration,
}

impl BuildReport {
    pub fn resource_count(&self) -> usize {
        self.paks.iter().map(|p| p.resource_count).sum()
    }
}

type ProgressCallback = Arc<dyn Fn(BuildProgress) + Send + Sync>;

/// Drives a full build of one project.
pub struct ContentBuilder {
    project_root: Utf8PathBuf,
    config: PipelineConfig,
    progress_callback: Option<ProgressCallback>,
}

impl ContentBuilder {
    pub fn new(project_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            config: PipelineConfig::default(),
            progress_callback: None,
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a callback receiving [`BuildProgress`] updates.
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(BuildProgress) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(callback));
        self
    }

    /// Build every group of the manifest. See module-level docs for the algorithm.
    pub fn build(&self) -> Result<BuildReport> {
        let start_time = Instant::now();

        self.emit_progress(BuildStage::LoadingManifest, None, 0, 0);

        let paths = ContentPaths::resolve(self.project_root.clone())?;
        let manifest = load_manifest(&paths.manifest_path)?;

        tracing::info!("Building content...");
        tracing::info!("Content dir: {}", paths.content_dir);
        tracing::info!(
            "Groups: {} entries: {}",
            manifest.content.len(),
            manifest.entry_count()
        );

        let total = manifest.content.len() as u32;
        let mut paks = Vec::with_capacity(manifest.content.len());
        let mut skipped = 0;

        for (idx, (group_name, group)) in manifest.content.iter().enumerate() {
            self.emit_progress(
                BuildStage::BuildingGroup,
                Some(group_name),
                idx as u32 + 1,
                total,
            );

            let (pak, group_skipped) = build_group(&paths.content_dir, group_name, group)?;
            tracing::info!(
                "Group='{}' resources={} skipped={}",
                group_name,
                pak.len(),
                group_skipped
            );

            skipped += group_skipped;
            paks.push(pak);
        }

        let mut built = Vec::with_capacity(paks.len());
        for (idx, pak) in paks.iter().enumerate() {
            self.emit_progress(
                BuildStage::WritingPaks,
                Some(&pak.name),
                idx as u32 + 1,
                total,
            );

            let path = pak.save_with_level(&paths.content_dir, self.config.compression_level)?;
            tracing::info!("Wrote pak {}", path);

            built.push(BuiltPak {
                name: pak.name.clone(),
                path,
                resource_count: pak.len(),
            });
        }

        self.emit_progress(BuildStage::Complete, None, total, total);

        let build_time = start_time.elapsed();
        tracing::info!("Content build finished in {:?}", build_time);

        Ok(BuildReport {
            content_dir: paths.content_dir,
            paks: built,
            skipped,
            build_time,
        })
    }

    fn emit_progress(&self, stage: BuildStage, group: Option<&str>, current: u32, total: u32) {
        if let Some(callback) = &self.progress_callback {
            callback(BuildProgress {
                stage,
                current_group: group.map(str::to_string),
                current,
                total,
            });
        }
    }
}

/// Load a manifest and check it is internally consistent.
pub fn load_manifest(path: &Utf8Path) -> Result<ContentManifest> {
    let manifest = ContentManifest::load(path)?;
    manifest.validate()?;
    Ok(manifest)
}

/// Build a fresh pak for one group. Returns the pak and the number of entries
/// without a decoder.
pub fn build_group(content_dir: &Utf8Path, name: &str, group: &ContentGroup) -> Result<(Pak, usize)> {
    let mut pak = Pak::new(name);
    let mut skipped = 0;

    for entry in group.entries() {
        match build_entry(content_dir, name, &entry)? {
            Some(payload) => pak.upsert(entry.id(), payload),
            None => {
                tracing::debug!("Skipping {} '{}': no decoder", entry.kind(), entry.id());
                skipped += 1;
            }
        }
    }

    Ok((pak, skipped))
}

/// Compile one manifest entry of `group`.
///
/// Returns `None` for kinds that never produce a payload.
pub fn build_entry(
    content_dir: &Utf8Path,
    group: &str,
    entry: &ManifestEntry,
) -> Result<Option<ResourcePayload>> {
    let group_dir = content_dir.join(group);

    let payload = match entry {
        ManifestEntry::Image(e) => {
            ResourcePayload::Pixmap(codec::build_image(&group_dir.join(&e.path))?)
        }
        ManifestEntry::Font(e) => ResourcePayload::Font(codec::build_font(
            &group_dir.join(&e.path),
            &group_dir.join(&e.image_path),
        )?),
        ManifestEntry::Shader(e) => ResourcePayload::Shader(codec::build_shader(
            &group_dir.join(&e.vertex_path),
            &group_dir.join(&e.fragment_path),
        )?),
        ManifestEntry::TextFile(e) => {
            ResourcePayload::Text(codec::build_text_file(&group_dir.join(&e.path))?)
        }
        ManifestEntry::Effect(_) | ManifestEntry::Song(_) => return Ok(None),
    };

    Ok(Some(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_support::TestProject;
    use cast_pak::CodecError;
    use std::sync::Mutex;

    #[test]
    fn test_full_build() {
        let project = TestProject::new();

        let report = ContentBuilder::new(project.root.clone()).build().unwrap();

        let names: Vec<_> = report.paks.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["music", "ui"]);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.resource_count(), 5);

        let ui = project.load_pak("ui");
        assert_eq!(
            ui.ids().collect::<Vec<_>>(),
            vec!["credits", "hud", "logo", "sprite"]
        );
        assert!(!ui.contains("click"));

        let Some(ResourcePayload::Pixmap(logo)) = ui.get("logo") else {
            panic!("expected a pixmap");
        };
        assert_eq!((logo.width, logo.height), (4, 4));

        let music = project.load_pak("music");
        assert_eq!(music.ids().collect::<Vec<_>>(), vec!["lyrics"]);
    }

    #[test]
    fn test_build_is_idempotent() {
        let project = TestProject::new();
        let builder = ContentBuilder::new(project.root.clone());

        builder.build().unwrap();
        let first = (project.pak_bytes("ui"), project.pak_bytes("music"));

        builder.build().unwrap();
        let second = (project.pak_bytes("ui"), project.pak_bytes("music"));

        assert_eq!(first, second);
    }

    #[test]
    fn test_codec_error_writes_nothing() {
        let project = TestProject::new();
        project.write("ui/credits.txt", [0xff, 0xfe]);

        let err = ContentBuilder::new(project.root.clone()).build().unwrap_err();
        assert!(matches!(err, Error::Codec(CodecError::Format { .. })));

        assert!(!Pak::path_for(&project.content_dir(), "music").exists());
        assert!(!Pak::path_for(&project.content_dir(), "ui").exists());
    }

    #[test]
    fn test_missing_source_is_reported() {
        let project = TestProject::new();
        project.remove("ui/logo.png");

        let err = ContentBuilder::new(project.root.clone()).build().unwrap_err();
        match err {
            Error::Codec(CodecError::SourceRead { path, .. }) => {
                assert_eq!(path, project.path("ui/logo.png"));
            }
            other => panic!("expected a source read error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_project() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();

        assert!(matches!(
            ContentBuilder::new(root).build(),
            Err(Error::InvalidProject(_))
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let project = TestProject::new();
        let mut manifest = project.manifest();
        manifest
            .group_mut("music")
            .unwrap()
            .insert(ManifestEntry::TextFile(cast_manifest::TextFileEntry {
                id: "credits".to_string(),
                path: "credits.txt".to_string(),
            }));
        project.write_manifest(&manifest);

        assert!(matches!(
            ContentBuilder::new(project.root.clone()).build(),
            Err(Error::Manifest(cast_manifest::ManifestError::DuplicateId { .. }))
        ));
    }

    #[test]
    fn test_progress_events() {
        let project = TestProject::new();
        let stages = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&stages);
        ContentBuilder::new(project.root.clone())
            .with_progress(move |progress| sink.lock().unwrap().push(progress.stage))
            .build()
            .unwrap();

        let stages = stages.lock().unwrap();
        assert_eq!(stages.first(), Some(&BuildStage::LoadingManifest));
        assert_eq!(stages.last(), Some(&BuildStage::Complete));
        assert_eq!(
            stages
                .iter()
                .filter(|s| **s == BuildStage::BuildingGroup)
                .count(),
            2
        );
    }

    #[test]
    fn test_compression_level_from_config() {
        let project = TestProject::new();
        let config = PipelineConfig {
            compression_level: 19,
            ..PipelineConfig::default()
        };

        ContentBuilder::new(project.root.clone())
            .with_config(config)
            .build()
            .unwrap();

        assert_eq!(project.load_pak("ui").len(), 4);
    }
}
