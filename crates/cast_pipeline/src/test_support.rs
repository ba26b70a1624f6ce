use camino::Utf8PathBuf;
use cast_manifest::ContentManifest;
use cast_pak::Pak;
use image::{Rgba, RgbaImage};
use tempfile::TempDir;

use crate::project::{ContentPaths, CONTENT_FOLDER};

pub(crate) const FIXTURE_MANIFEST: &str = r#"{
  "Content": {
    "ui": {
      "Images": { "logo": { "Id": "logo", "Path": "logo.png" } },
      "Fonts": { "hud": { "Id": "hud", "Path": "fonts/hud.fnt", "ImagePath": "fonts/hud_sheet.png" } },
      "Shaders": { "sprite": { "Id": "sprite", "VertexSrcPath": "sprite.vs", "FragmentSrcPath": "sprite.fs" } },
      "Effects": { "click": { "Id": "click", "Path": "click.wav" } },
      "TextFiles": { "credits": { "Id": "credits", "Path": "credits.txt" } }
    },
    "music": {
      "Songs": { "theme": { "Id": "theme", "Path": "theme.ogg" } },
      "TextFiles": { "lyrics": { "Id": "lyrics", "Path": "lyrics.txt" } }
    }
  }
}"#;

/// A scratch project on disk, populated with the fixture manifest and sources.
pub(crate) struct TestProject {
    _dir: TempDir,
    pub root: Utf8PathBuf,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let project = Self { _dir: dir, root };

        project.write("content.json", FIXTURE_MANIFEST);
        project.write_png("ui/logo.png", 4, 4, [255, 0, 0, 255]);
        project.write_png("ui/fonts/hud_sheet.png", 8, 8, [255, 255, 255, 255]);
        project.write("ui/fonts/hud.fnt", "[BTFONT]\nChar=65,0,0,4,4,0,1\n");
        project.write("ui/sprite.vs", "void main() { gl_Position = a_position; }\n");
        project.write(
            "ui/sprite.fs",
            "SAMPLER2D(s_tex, 0);\nuniform vec4 u_tint;\nvoid main() {}\n",
        );
        project.write("ui/click.wav", b"RIFF");
        project.write("ui/credits.txt", "Design\n\nCode\n");
        project.write("music/theme.ogg", b"OggS");
        project.write("music/lyrics.txt", "la la la\n");

        project
    }

    pub fn paths(&self) -> ContentPaths {
        ContentPaths::resolve(self.root.clone()).unwrap()
    }

    pub fn content_dir(&self) -> Utf8PathBuf {
        self.root.join(CONTENT_FOLDER)
    }

    /// Absolute path of a file given relative to the content folder.
    pub fn path(&self, relative: &str) -> Utf8PathBuf {
        self.content_dir().join(relative)
    }

    pub fn write(&self, relative: &str, contents: impl AsRef<[u8]>) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    pub fn write_png(&self, relative: &str, width: u32, height: u32, color: [u8; 4]) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        RgbaImage::from_pixel(width, height, Rgba(color))
            .save(path.as_std_path())
            .unwrap();
    }

    pub fn rename(&self, from: &str, to: &str) {
        std::fs::rename(self.path(from), self.path(to)).unwrap();
    }

    pub fn remove(&self, relative: &str) {
        std::fs::remove_file(self.path(relative)).unwrap();
    }

    pub fn manifest(&self) -> ContentManifest {
        ContentManifest::load(&self.path("content.json")).unwrap()
    }

    pub fn write_manifest(&self, manifest: &ContentManifest) {
        manifest.save(&self.path("content.json")).unwrap();
    }

    pub fn load_pak(&self, name: &str) -> Pak {
        Pak::load(&self.content_dir(), name).unwrap()
    }

    pub fn pak_bytes(&self, name: &str) -> Vec<u8> {
        std::fs::read(Pak::path_for(&self.content_dir(), name)).unwrap()
    }
}

