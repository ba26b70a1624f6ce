use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of resource a manifest entry declares.
///
/// Each kind maps to one named table inside a [`ContentGroup`](crate::ContentGroup).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Image,
    Font,
    Shader,
    Effect,
    Song,
    TextFile,
}

impl ResourceKind {
    /// Every kind, in the order the tables appear in `content.json`.
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Image,
        ResourceKind::Font,
        ResourceKind::Shader,
        ResourceKind::Effect,
        ResourceKind::Song,
        ResourceKind::TextFile,
    ];

    /// Name of the kind's table inside a group in `content.json`.
    pub fn manifest_key(self) -> &'static str {
        match self {
            ResourceKind::Image => "Images",
            ResourceKind::Font => "Fonts",
            ResourceKind::Shader => "Shaders",
            ResourceKind::Effect => "Effects",
            ResourceKind::Song => "Songs",
            ResourceKind::TextFile => "TextFiles",
        }
    }

    /// Extensions (including the leading dot) a source file of this kind may have.
    ///
    /// Fonts and shaders are made of two files, so they accept one extension per
    /// source path.
    pub fn expected_extensions(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Image => &[".png"],
            ResourceKind::Font => &[".fnt", ".png"],
            ResourceKind::Shader => &[".vs", ".fs"],
            ResourceKind::Effect => &[".wav"],
            ResourceKind::Song => &[".ogg"],
            ResourceKind::TextFile => &[".txt"],
        }
    }

    /// Whether a decoder exists for this kind.
    ///
    /// Effects and songs are tracked in the manifest but never end up in a pak.
    pub fn produces_payload(self) -> bool {
        !matches!(self, ResourceKind::Effect | ResourceKind::Song)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::Image => "image",
            ResourceKind::Font => "font",
            ResourceKind::Shader => "shader",
            ResourceKind::Effect => "effect",
            ResourceKind::Song => "song",
            ResourceKind::TextFile => "text file",
        })
    }
}

/// A PNG image.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ImageEntry {
    pub id: String,
    pub path: String,
}

/// A bitmap font: a `[BTFONT]` description file plus its glyph sheet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct FontEntry {
    pub id: String,

    /// Path to the `.fnt` description file.
    pub path: String,

    /// Path to the `.png` glyph sheet.
    pub image_path: String,
}

/// A vertex + fragment shader pair.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ShaderEntry {
    pub id: String,

    #[serde(rename = "VertexSrcPath", alias = "VertexPath")]
    pub vertex_path: String,

    #[serde(rename = "FragmentSrcPath", alias = "FragmentPath")]
    pub fragment_path: String,
}

/// A sound effect (`.wav`). No decoder yet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct EffectEntry {
    pub id: String,
    pub path: String,
}

/// A streamed song (`.ogg`). No decoder yet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct SongEntry {
    pub id: String,
    pub path: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TextFileEntry {
    pub id: String,
    pub path: String,
}

/// Any manifest entry, tagged with its kind.
///
/// `content.json` stores entries in per-kind tables; this enum is the in-memory
/// view used wherever kind-specific behaviour is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestEntry {
    Image(ImageEntry),
    Font(FontEntry),
    Shader(ShaderEntry),
    Effect(EffectEntry),
    Song(SongEntry),
    TextFile(TextFileEntry),
}

impl ManifestEntry {
    pub fn id(&self) -> &str {
        match self {
            ManifestEntry::Image(e) => &e.id,
            ManifestEntry::Font(e) => &e.id,
            ManifestEntry::Shader(e) => &e.id,
            ManifestEntry::Effect(e) => &e.id,
            ManifestEntry::Song(e) => &e.id,
            ManifestEntry::TextFile(e) => &e.id,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            ManifestEntry::Image(_) => ResourceKind::Image,
            ManifestEntry::Font(_) => ResourceKind::Font,
            ManifestEntry::Shader(_) => ResourceKind::Shader,
            ManifestEntry::Effect(_) => ResourceKind::Effect,
            ManifestEntry::Song(_) => ResourceKind::Song,
            ManifestEntry::TextFile(_) => ResourceKind::TextFile,
        }
    }

    /// Builds the entry that results from one of its source files being renamed.
    ///
    /// `extension` is the new file's extension (with the leading dot) and selects
    /// which path field receives `new_path`; the other path fields are kept.
    /// Returns `None` when the extension does not belong to this entry's kind.
    pub fn renamed(&self, new_id: &str, extension: &str, new_path: &str) -> Option<ManifestEntry> {
        let id = new_id.to_string();
        let path = new_path.to_string();

        let slot = self
            .kind()
            .expected_extensions()
            .iter()
            .position(|e| *e == extension)?;

        // Two-file kinds list one extension per path field, in field order.
        let entry = match self {
            ManifestEntry::Image(_) => ManifestEntry::Image(ImageEntry { id, path }),
            ManifestEntry::Font(e) if slot == 0 => ManifestEntry::Font(FontEntry {
                id,
                path,
                image_path: e.image_path.clone(),
            }),
            ManifestEntry::Font(e) => ManifestEntry::Font(FontEntry {
                id,
                path: e.path.clone(),
                image_path: path,
            }),
            ManifestEntry::Shader(e) if slot == 0 => ManifestEntry::Shader(ShaderEntry {
                id,
                vertex_path: path,
                fragment_path: e.fragment_path.clone(),
            }),
            ManifestEntry::Shader(e) => ManifestEntry::Shader(ShaderEntry {
                id,
                vertex_path: e.vertex_path.clone(),
                fragment_path: path,
            }),
            ManifestEntry::Effect(_) => ManifestEntry::Effect(EffectEntry { id, path }),
            ManifestEntry::Song(_) => ManifestEntry::Song(SongEntry { id, path }),
            ManifestEntry::TextFile(_) => ManifestEntry::TextFile(TextFileEntry { id, path }),
        };

        Some(entry)
    }
}
