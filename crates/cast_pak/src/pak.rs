use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};

use crate::{error::PakError, payload::ResourcePayload};

/// Magic bytes at the start of every pak file.
pub const PAK_MAGIC: [u8; 4] = *b"CPAK";

/// Current pak format version.
pub const PAK_VERSION: u32 = 1;

/// File extension of pak files, without the leading dot.
pub const PAK_EXTENSION: &str = "pak";

/// zstd level used by [`Pak::save`].
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

/// The compiled resources of one content group.
///
/// On disk a pak is the [`PAK_MAGIC`], a little-endian `u32` version and a zstd
/// frame holding the MessagePack encoding of this struct. Resources are kept
/// ordered by id, so the same content always encodes to the same bytes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Pak {
    pub name: String,
    pub resources: BTreeMap<String, ResourcePayload>,
}

impl Pak {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resources: BTreeMap::new(),
        }
    }

    /// Path of the pak called `name` inside `root`.
    ///
    /// `name` may be given with or without the `.pak` extension.
    pub fn path_for(root: &Utf8Path, name: &str) -> Utf8PathBuf {
        if Utf8Path::new(name).extension() == Some(PAK_EXTENSION) {
            root.join(name)
        } else {
            root.join(format!("{}.{}", name, PAK_EXTENSION))
        }
    }

    /// Load the pak called `name` from `root`.
    pub fn load(root: &Utf8Path, name: &str) -> Result<Self, PakError> {
        Self::read_from_path(&Self::path_for(root, name))
    }

    /// Read a pak file from an explicit path.
    pub fn read_from_path(path: &Utf8Path) -> Result<Self, PakError> {
        let bytes = match std::fs::read(path.as_std_path()) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PakError::NotFound(path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };

        Self::from_bytes(&bytes)
    }

    /// Write the pak to `<root>/<name>.pak`, returning the written path.
    pub fn save(&self, root: &Utf8Path) -> Result<Utf8PathBuf, PakError> {
        self.save_with_level(root, DEFAULT_COMPRESSION_LEVEL)
    }

    /// Same as [`save`](Self::save) with an explicit zstd level.
    ///
    /// The file is written to a temporary file in `root` and then renamed over
    /// the destination, so readers never observe a partially written pak.
    pub fn save_with_level(&self, root: &Utf8Path, level: i32) -> Result<Utf8PathBuf, PakError> {
        let path = Self::path_for(root, &self.name);
        let bytes = self.to_bytes(level)?;

        std::fs::create_dir_all(root.as_std_path())?;
        let mut temp = tempfile::NamedTempFile::new_in(root.as_std_path())?;
        temp.write_all(&bytes)?;
        temp.as_file().sync_all()?;
        temp.persist(path.as_std_path())?;

        Ok(path)
    }

    pub fn to_bytes(&self, level: i32) -> Result<Vec<u8>, PakError> {
        let encoded = rmp_serde::to_vec_named(self)?;
        let compressed = zstd::encode_all(encoded.as_slice(), level)?;

        let mut out = Vec::with_capacity(compressed.len() + 8);
        out.write_all(&PAK_MAGIC)?;
        out.write_u32::<LE>(PAK_VERSION)?;
        out.write_all(&compressed)?;
        Ok(out)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PakError> {
        let mut reader = Cursor::new(bytes);

        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != PAK_MAGIC {
            return Err(PakError::InvalidMagic(magic));
        }

        let version = reader.read_u32::<LE>()?;
        if version != PAK_VERSION {
            return Err(PakError::UnsupportedVersion(version));
        }

        let decoder = zstd::Decoder::new(reader)?;
        Ok(rmp_serde::from_read(decoder)?)
    }

    /// Insert or replace the payload stored under `id`.
    pub fn upsert(&mut self, id: impl Into<String>, payload: ResourcePayload) {
        self.resources.insert(id.into(), payload);
    }

    /// Remove the payload stored under `id`. Returns whether it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        self.resources.remove(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&ResourcePayload> {
        self.resources.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.resources.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
