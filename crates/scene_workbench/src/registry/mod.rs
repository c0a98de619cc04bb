//! Scene registry
//!
//! Two parallel registry kinds (scenes and bundles), each an ordered list of
//! user groups with a permanent default group at index 0.
//!
//! ## Architecture
//!
//! ```text
//! IdentityResolver (asset index)
//!      ↓ discover / resolve
//! Registry ── reconcile ──→ GroupList<SceneEntry>
//!                        └→ GroupList<BundleEntry>
//!      ↓ to_document
//! RegistryDocument (persisted)
//! ```

mod entry;
mod group;
mod reconcile;
mod document;

pub use entry::{RegistryEntry, SceneEntry, BundleEntry};
pub use group::{Group, GroupList, DEFAULT_GROUP};
pub use reconcile::ReconcileReport;
pub use document::{RegistryDocument, SceneGroupRecord, BundleGroupRecord, EntryRecord};

use thiserror::Error;

use crate::core::config::SortPolicy;
use crate::identity::{AssetId, IdentityResolver};

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The default group cannot be deleted or moved
    #[error("The default group cannot be deleted or moved")]
    DefaultGroupLocked,
    
    /// Group index out of range
    #[error("Group index {index} out of range ({count} groups)")]
    GroupOutOfRange {
        /// Requested index
        index: usize,
        /// Number of groups
        count: usize,
    },
    
    /// Entry not present in the given group
    #[error("Entry not found: {0}")]
    EntryNotFound(AssetId),
    
    /// Group names cannot be blank
    #[error("Group name cannot be empty")]
    EmptyGroupName,
}

/// Result of refreshing both registry kinds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryRefresh {
    /// Scene registry changes
    pub scenes: ReconcileReport,
    /// Bundle registry changes
    pub bundles: ReconcileReport,
}

/// The scene and bundle registries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    /// Scene groups
    pub scenes: GroupList<SceneEntry>,
    /// Bundle groups
    pub bundles: GroupList<BundleEntry>,
}

impl Registry {
    /// Create an empty registry with a default group of each kind
    pub fn new(default_group_name: &str) -> Self {
        Self {
            scenes: GroupList::new(default_group_name),
            bundles: GroupList::new(default_group_name),
        }
    }
    
    /// Reconcile both kinds against the asset index
    pub fn refresh(&mut self, resolver: &dyn IdentityResolver) -> RegistryRefresh {
        let refresh = RegistryRefresh {
            scenes: self.scenes.reconcile(resolver),
            bundles: self.bundles.reconcile(resolver),
        };
        
        log::debug!(
            "Registry refreshed: scenes +{} -{}, bundles +{} -{}",
            refresh.scenes.added.len(),
            refresh.scenes.removed.len(),
            refresh.bundles.added.len(),
            refresh.bundles.removed.len(),
        );
        refresh
    }
    
    /// Sort both kinds by display name
    pub fn sort(&mut self, policy: SortPolicy) {
        self.scenes.sort(policy);
        self.bundles.sort(policy);
    }
    
    /// Apply a search query to both kinds
    pub fn apply_filter(&mut self, query: &str) {
        self.scenes.apply_filter(query);
        self.bundles.apply_filter(query);
    }
    
    /// Whether either kind changed since the last save
    pub fn is_dirty(&self) -> bool {
        self.scenes.is_dirty() || self.bundles.is_dirty()
    }
    
    /// Mark both kinds as saved
    pub fn clear_dirty(&mut self) {
        self.scenes.clear_dirty();
        self.bundles.clear_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::InMemoryAssetIndex;

    #[test]
    fn test_refresh_handles_both_kinds() {
        let mut index = InMemoryAssetIndex::new();
        index.insert_scene("a", "Assets/A.scene");
        index.insert_bundle("b", "Assets/B.bundle", Vec::new());

        let mut registry = Registry::new("Default");
        assert!(!registry.is_dirty());

        let refresh = registry.refresh(&index);

        assert_eq!(refresh.scenes.added, vec![AssetId::new("a")]);
        assert_eq!(refresh.bundles.added, vec![AssetId::new("b")]);
        assert!(registry.is_dirty());

        registry.clear_dirty();
        assert!(!registry.is_dirty());
    }
}
