use cast_manifest::{ContentManifest, ManifestEntry};
use std::collections::HashMap;

/// Flat lookup from resource id to the group and entry declaring it.
///
/// Derived from a [`ContentManifest`] and never edited in place: after any
/// manifest change the index is rebuilt from scratch.
#[derive(Debug, Clone, Default)]
pub struct LookupIndex {
    id_to_group: HashMap<String, String>,
    id_to_entry: HashMap<String, ManifestEntry>,
}

impl LookupIndex {
    pub fn build(manifest: &ContentManifest) -> Self {
        let mut index = Self::default();

        for (group_name, group) in &manifest.content {
            for entry in group.entries() {
                let id = entry.id().to_string();
                index.id_to_group.insert(id.clone(), group_name.clone());
                index.id_to_entry.insert(id, entry);
            }
        }

        index
    }

    /// Group and entry declaring `id`.
    pub fn resolve(&self, id: &str) -> Option<(&str, &ManifestEntry)> {
        let group = self.id_to_group.get(id)?;
        let entry = self.id_to_entry.get(id)?;
        Some((group.as_str(), entry))
    }

    pub fn group_of(&self, id: &str) -> Option<&str> {
        self.id_to_group.get(id).map(String::as_str)
    }

    pub fn entry(&self, id: &str) -> Option<&ManifestEntry> {
        self.id_to_entry.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id_to_entry.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.id_to_entry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_entry.is_empty()
    }

    /// Whether the index holds exactly the entries of `manifest`.
    pub fn matches(&self, manifest: &ContentManifest) -> bool {
        let mut count = 0;
        for (group_name, group) in &manifest.content {
            for entry in group.entries() {
                count += 1;
                match self.resolve(entry.id()) {
                    Some((group, indexed)) if group == group_name && *indexed == entry => {}
                    _ => return false,
                }
            }
        }
        count == self.len()
    }
}
