//! Presence-only comparison of two manifests.
//!
//! Content of an entry is never compared: an entry that exists in both manifests
//! under the same group and kind is considered unchanged.

use cast_manifest::{ContentManifest, ResourceKind};

/// A resource declared in the new manifest but not in the old one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedResource {
    pub group: String,
    pub kind: ResourceKind,
    pub id: String,
}

/// Resources present in `new` that `old` does not declare, in manifest order.
///
/// Each kind's table is compared with the same kind's table of the same group,
/// so moving an id from one kind to another counts as an addition.
pub fn added_resources(old: &ContentManifest, new: &ContentManifest) -> Vec<AddedResource> {
    let mut added = Vec::new();

    for (group_name, new_group) in &new.content {
        let old_group = old.group(group_name);

        for kind in ResourceKind::ALL {
            for id in new_group.ids(kind) {
                let existed = old_group.is_some_and(|g| g.contains(kind, id));
                if !existed {
                    added.push(AddedResource {
                        group: group_name.clone(),
                        kind,
                        id: id.to_string(),
                    });
                }
            }
        }
    }

    added
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ContentManifest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_identical_manifests() {
        let manifest = parse(
            r#"{ "Content": { "ui": { "Images": { "logo": { "Id": "logo", "Path": "logo.png" } } } } }"#,
        );
        assert!(added_resources(&manifest, &manifest).is_empty());
    }

    #[test]
    fn test_new_group() {
        let old = parse(r#"{ "Content": {} }"#);
        let new = parse(
            r#"{ "Content": { "ui": { "Images": { "icon": { "Id": "icon", "Path": "icon.png" } } } } }"#,
        );

        assert_eq!(
            added_resources(&old, &new),
            vec![AddedResource {
                group: "ui".to_string(),
                kind: ResourceKind::Image,
                id: "icon".to_string(),
            }]
        );
    }

    #[test]
    fn test_text_file_added_to_existing_group() {
        let old = parse(
            r#"{ "Content": { "ui": {
                "Songs": { "theme": { "Id": "theme", "Path": "theme.ogg" } },
                "TextFiles": { "credits": { "Id": "credits", "Path": "credits.txt" } }
            } } }"#,
        );
        let new = parse(
            r#"{ "Content": { "ui": {
                "Songs": { "theme": { "Id": "theme", "Path": "theme.ogg" } },
                "TextFiles": {
                    "credits": { "Id": "credits", "Path": "credits.txt" },
                    "intro": { "Id": "intro", "Path": "intro.txt" }
                }
            } } }"#,
        );

        let added = added_resources(&old, &new);
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].id, "intro");
        assert_eq!(added[0].kind, ResourceKind::TextFile);
    }

    #[test]
    fn test_removed_and_edited_entries_are_not_additions() {
        let old = parse(
            r#"{ "Content": { "ui": {
                "Images": {
                    "logo": { "Id": "logo", "Path": "logo.png" },
                    "old": { "Id": "old", "Path": "old.png" }
                }
            } } }"#,
        );
        let new = parse(
            r#"{ "Content": { "ui": {
                "Images": { "logo": { "Id": "logo", "Path": "art/logo.png" } }
            } } }"#,
        );

        assert!(added_resources(&old, &new).is_empty());
    }

    #[test]
    fn test_kind_change_is_an_addition() {
        let old = parse(
            r#"{ "Content": { "ui": { "Images": { "intro": { "Id": "intro", "Path": "intro.png" } } } } }"#,
        );
        let new = parse(
            r#"{ "Content": { "ui": { "TextFiles": { "intro": { "Id": "intro", "Path": "intro.txt" } } } } }"#,
        );

        let added = added_resources(&old, &new);
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].kind, ResourceKind::TextFile);
    }
}
