//! Persisted registry document
//!
//! Only group names and identifiers are stored. Display names and load state
//! are derived again after loading.

use serde::{Serialize, Deserialize};

use crate::config::Config;
use crate::identity::{display_name_from_path, AssetId, IdentityResolver};
use super::entry::{BundleEntry, RegistryEntry, SceneEntry};
use super::group::{Group, GroupList};
use super::Registry;

/// Stored reference to an asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    /// Stable identifier
    pub identifier: AssetId,
}

/// Stored scene group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneGroupRecord {
    /// Group name
    pub name: String,
    /// Member scenes in order
    #[serde(default)]
    pub scenes: Vec<EntryRecord>,
}

/// Stored bundle group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleGroupRecord {
    /// Group name
    pub name: String,
    /// Member bundles in order
    #[serde(default)]
    pub bundles: Vec<EntryRecord>,
}

/// The registry as written to disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryDocument {
    /// Scene groups, default group first
    #[serde(default)]
    pub scene_groups: Vec<SceneGroupRecord>,
    /// Bundle groups, default group first
    #[serde(default)]
    pub bundle_groups: Vec<BundleGroupRecord>,
}

impl Config for RegistryDocument {}

fn records<T: RegistryEntry>(group: &Group<T>) -> Vec<EntryRecord> {
    group
        .entries
        .iter()
        .map(|entry| EntryRecord { identifier: entry.id().clone() })
        .collect()
}

fn restore<T: RegistryEntry>(records: Vec<EntryRecord>, resolver: &dyn IdentityResolver) -> Vec<T> {
    records
        .into_iter()
        .map(|record| {
            // Unresolvable entries keep their identifier as a name until the next refresh prunes them
            let name = resolver
                .resolved_path(&record.identifier)
                .map_or_else(|| record.identifier.to_string(), |path| display_name_from_path(&path));
            T::new(record.identifier, name)
        })
        .collect()
}

impl Registry {
    /// Snapshot the persistent part of the registry
    pub fn to_document(&self) -> RegistryDocument {
        RegistryDocument {
            scene_groups: self
                .scenes
                .groups()
                .iter()
                .map(|group| SceneGroupRecord { name: group.name.clone(), scenes: records(group) })
                .collect(),
            bundle_groups: self
                .bundles
                .groups()
                .iter()
                .map(|group| BundleGroupRecord { name: group.name.clone(), bundles: records(group) })
                .collect(),
        }
    }
    
    /// Rebuild a registry from a stored document
    ///
    /// A document without groups yields fresh default groups named
    /// `default_group_name`.
    pub fn from_document(
        document: RegistryDocument,
        default_group_name: &str,
        resolver: &dyn IdentityResolver,
    ) -> Self {
        let scene_groups = document
            .scene_groups
            .into_iter()
            .map(|record| Group::<SceneEntry>::with_entries(record.name, restore(record.scenes, resolver)))
            .collect();
        let bundle_groups = document
            .bundle_groups
            .into_iter()
            .map(|record| Group::<BundleEntry>::with_entries(record.name, restore(record.bundles, resolver)))
            .collect();
        
        Self {
            scenes: GroupList::from_groups(default_group_name, scene_groups),
            bundles: GroupList::from_groups(default_group_name, bundle_groups),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::InMemoryAssetIndex;

    fn sample_index() -> InMemoryAssetIndex {
        let mut index = InMemoryAssetIndex::new();
        index.insert_scene("menu", "Assets/Menu.scene");
        index.insert_scene("level1", "Assets/Levels/Level1.scene");
        index.insert_bundle("campaign", "Assets/Campaign.bundle", vec![AssetId::new("level1")]);
        index
    }

    #[test]
    fn test_document_field_names() {
        let mut registry = Registry::new("Default");
        registry.refresh(&sample_index());

        let text = ron::to_string(&registry.to_document()).unwrap();
        assert!(text.contains("sceneGroups"));
        assert!(text.contains("bundleGroups"));
        assert!(text.contains("identifier:\"menu\""));
    }

    #[test]
    fn test_restore_keeps_groups_and_rederives_names() {
        let index = sample_index();
        let mut registry = Registry::new("Default");
        registry.refresh(&index);
        let levels = registry.scenes.add_group("Levels").unwrap();
        registry.scenes.move_entry(&AssetId::new("level1"), 0, levels).unwrap();

        let restored = Registry::from_document(registry.to_document(), "Default", &index);

        assert_eq!(restored.scenes.len(), 2);
        assert_eq!(restored.scenes.get(1).unwrap().entries[0].display_name, "Level1");
        assert_eq!(restored.bundles.default_group().entries[0].display_name, "Campaign");
        assert!(!restored.is_dirty());
    }

    #[test]
    fn test_empty_document_gets_default_groups() {
        let restored = Registry::from_document(RegistryDocument::default(), "Ungrouped", &sample_index());
        assert_eq!(restored.scenes.default_group().name, "Ungrouped");
        assert_eq!(restored.bundles.default_group().name, "Ungrouped");
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.toml");
        let path = path.to_str().unwrap();

        let mut registry = Registry::new("Default");
        registry.refresh(&sample_index());
        let document = registry.to_document();
        document.save_to_file(path).unwrap();

        assert_eq!(RegistryDocument::load_from_file(path).unwrap(), document);
    }
}
