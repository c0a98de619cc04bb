//! In-memory asset index
//!
//! A resolver backed by plain collections. Hosts without their own asset
//! database use it directly; tests use it to simulate renames and deletions.

use std::collections::HashMap;

use super::{AssetId, AssetKind, IdentityResolver};

#[derive(Debug, Clone)]
struct IndexedAsset {
    id: AssetId,
    path: String,
    kind: AssetKind,
}

/// Identity resolver over an in-memory table of assets
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssetIndex {
    /// Assets in registration order (discovery order)
    assets: Vec<IndexedAsset>,
    
    /// Bundle identifier → ordered member identifiers
    bundle_members: HashMap<AssetId, Vec<AssetId>>,
}

impl InMemoryAssetIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Register a scene, replacing any asset with the same identifier
    pub fn insert_scene(&mut self, id: impl Into<AssetId>, path: impl Into<String>) {
        self.insert(id.into(), path.into(), AssetKind::Scene);
    }
    
    /// Register a bundle and its ordered members
    pub fn insert_bundle(
        &mut self,
        id: impl Into<AssetId>,
        path: impl Into<String>,
        members: impl IntoIterator<Item = AssetId>,
    ) {
        let id = id.into();
        self.bundle_members.insert(id.clone(), members.into_iter().collect());
        self.insert(id, path.into(), AssetKind::Bundle);
    }
    
    /// Remove an asset, as if it was deleted from the project
    pub fn remove(&mut self, id: &AssetId) -> bool {
        let before = self.assets.len();
        self.assets.retain(|asset| &asset.id != id);
        self.bundle_members.remove(id);
        self.assets.len() != before
    }
    
    /// Move an asset to a new path, keeping its identifier
    pub fn rename(&mut self, id: &AssetId, new_path: impl Into<String>) -> bool {
        match self.assets.iter_mut().find(|asset| &asset.id == id) {
            Some(asset) => {
                asset.path = new_path.into();
                true
            }
            None => false,
        }
    }
    
    /// Number of indexed assets of all kinds
    pub fn len(&self) -> usize {
        self.assets.len()
    }
    
    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
    
    fn insert(&mut self, id: AssetId, path: String, kind: AssetKind) {
        if let Some(existing) = self.assets.iter_mut().find(|asset| asset.id == id) {
            existing.path = path;
            existing.kind = kind;
        } else {
            self.assets.push(IndexedAsset { id, path, kind });
        }
    }
}

impl IdentityResolver for InMemoryAssetIndex {
    fn path_of(&self, id: &AssetId) -> Option<String> {
        self.assets
            .iter()
            .find(|asset| &asset.id == id)
            .map(|asset| asset.path.clone())
    }
    
    fn id_of(&self, path: &str) -> Option<AssetId> {
        self.assets
            .iter()
            .find(|asset| asset.path == path)
            .map(|asset| asset.id.clone())
    }
    
    fn discover(&self, kind: AssetKind) -> Vec<AssetId> {
        self.assets
            .iter()
            .filter(|asset| asset.kind == kind)
            .map(|asset| asset.id.clone())
            .collect()
    }
    
    fn bundle_members(&self, bundle: &AssetId) -> Vec<AssetId> {
        self.bundle_members.get(bundle).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_by_kind_in_insertion_order() {
        let mut index = InMemoryAssetIndex::new();
        index.insert_scene("b", "Assets/B.scene");
        index.insert_bundle("bundle", "Assets/All.bundle", vec![AssetId::new("b")]);
        index.insert_scene("a", "Assets/A.scene");

        assert_eq!(index.discover(AssetKind::Scene), vec![AssetId::new("b"), AssetId::new("a")]);
        assert_eq!(index.discover(AssetKind::Bundle), vec![AssetId::new("bundle")]);
        assert_eq!(index.bundle_members(&AssetId::new("bundle")), vec![AssetId::new("b")]);
    }

    #[test]
    fn test_rename_keeps_identity() {
        let mut index = InMemoryAssetIndex::new();
        index.insert_scene("a", "Assets/A.scene");
        assert!(index.rename(&AssetId::new("a"), "Assets/Renamed.scene"));

        assert_eq!(index.id_of("Assets/Renamed.scene"), Some(AssetId::new("a")));
        assert_eq!(index.id_of("Assets/A.scene"), None);
    }

    #[test]
    fn test_remove() {
        let mut index = InMemoryAssetIndex::new();
        index.insert_scene("a", "Assets/A.scene");
        assert!(index.remove(&AssetId::new("a")));
        assert!(!index.remove(&AssetId::new("a")));
        assert!(index.is_empty());
        assert_eq!(index.path_of(&AssetId::new("a")), None);
    }
}
