use serde::{Deserialize, Serialize};

/// Tunables shared by the content builder and the watch engine.
///
/// Every field has a default, so an empty document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct PipelineConfig {
    /// zstd level used when writing paks.
    pub compression_level: i32,

    /// Extensions (with the leading dot) of files the watcher treats as assets.
    /// Matching is case-sensitive.
    pub asset_extensions: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            compression_level: cast_pak::DEFAULT_COMPRESSION_LEVEL,
            asset_extensions: [".png", ".vs", ".fs", ".wav", ".ogg", ".txt"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl PipelineConfig {
    pub fn is_asset_extension(&self, extension: &str) -> bool {
        self.asset_extensions.iter().any(|e| e == extension)
    }
}
