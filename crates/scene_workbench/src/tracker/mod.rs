//! Live load-state tracking
//!
//! `is_loaded` flags are never stored; they are recomputed from the host's
//! list of open scenes whenever that list may have changed. A scene entry is
//! loaded when its path is open. A bundle is loaded when every member path is
//! open; an empty bundle, or a member without a path, counts as loaded.

use std::collections::HashSet;

use crate::host::SceneHost;
use crate::identity::IdentityResolver;
use crate::registry::Registry;

/// Counts from the last recomputation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Scene entries flagged as loaded
    pub loaded_scenes: usize,
    /// Bundle entries flagged as loaded
    pub loaded_bundles: usize,
}

/// Derives per-entry load flags from the host's live scene list
#[derive(Debug, Clone, Default)]
pub struct LoadStateTracker {
    /// Live paths from the last update, with the unloading slot blanked
    live_paths: Vec<String>,
}

impl LoadStateTracker {
    /// Create a tracker with an empty live set
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Recompute every load flag from the host
    ///
    /// `unloading_slot` names the load-order index of a scene that is being
    /// unloaded this tick; it is treated as already gone.
    pub fn update_loaded_scenes(
        &mut self,
        registry: &mut Registry,
        resolver: &dyn IdentityResolver,
        host: &dyn SceneHost,
        unloading_slot: Option<usize>,
    ) -> LoadSummary {
        self.update_from_paths(registry, resolver, host.loaded_scenes(), unloading_slot)
    }
    
    /// Recompute every load flag from an explicit live path list
    pub fn update_from_paths(
        &mut self,
        registry: &mut Registry,
        resolver: &dyn IdentityResolver,
        mut live_paths: Vec<String>,
        unloading_slot: Option<usize>,
    ) -> LoadSummary {
        if let Some(slot) = unloading_slot.and_then(|slot| live_paths.get_mut(slot)) {
            slot.clear();
        }
        self.live_paths = live_paths;
        
        let live: HashSet<&str> = self
            .live_paths
            .iter()
            .map(String::as_str)
            .filter(|path| !path.is_empty())
            .collect();
        let mut summary = LoadSummary::default();
        
        for entry in registry.scenes.entries_mut() {
            entry.is_loaded = resolver
                .resolved_path(&entry.id)
                .is_some_and(|path| live.contains(path.as_str()));
            summary.loaded_scenes += usize::from(entry.is_loaded);
        }
        
        for bundle in registry.bundles.entries_mut() {
            bundle.is_loaded = resolver
                .bundle_members(&bundle.id)
                .iter()
                .all(|member| resolver.resolved_path(member).map_or(true, |path| live.contains(path.as_str())));
            summary.loaded_bundles += usize::from(bundle.is_loaded);
        }
        
        log::trace!(
            "Load state: {} scenes, {} bundles loaded ({} live paths)",
            summary.loaded_scenes,
            summary.loaded_bundles,
            live.len()
        );
        summary
    }
    
    /// Live paths seen by the last update
    pub fn live_paths(&self) -> &[String] {
        &self.live_paths
    }
    
    /// Whether `path` was live at the last update
    pub fn is_path_loaded(&self, path: &str) -> bool {
        !path.is_empty() && self.live_paths.iter().any(|live| live == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{AssetId, InMemoryAssetIndex};

    fn setup() -> (InMemoryAssetIndex, Registry) {
        let mut index = InMemoryAssetIndex::new();
        index.insert_scene("menu", "Assets/Menu.scene");
        index.insert_scene("intro", "Assets/Intro.scene");
        index.insert_scene("hub", "Assets/Hub.scene");
        index.insert_bundle(
            "campaign",
            "Assets/Campaign.bundle",
            vec![AssetId::new("intro"), AssetId::new("hub")],
        );
        index.insert_bundle("empty", "Assets/Empty.bundle", Vec::new());

        let mut registry = Registry::new("Default");
        registry.refresh(&index);
        (index, registry)
    }

    fn paths(list: &[&str]) -> Vec<String> {
        list.iter().map(|path| (*path).to_string()).collect()
    }

    fn scene_loaded(registry: &Registry, id: &str) -> bool {
        registry.scenes.entry(&AssetId::new(id)).unwrap().is_loaded
    }

    fn bundle_loaded(registry: &Registry, id: &str) -> bool {
        registry.bundles.entry(&AssetId::new(id)).unwrap().is_loaded
    }

    #[test]
    fn test_scene_flags_follow_live_set() {
        let (index, mut registry) = setup();
        let mut tracker = LoadStateTracker::new();

        let summary = tracker.update_from_paths(&mut registry, &index, paths(&["Assets/Menu.scene"]), None);

        assert!(scene_loaded(&registry, "menu"));
        assert!(!scene_loaded(&registry, "intro"));
        assert_eq!(summary.loaded_scenes, 1);
        assert!(tracker.is_path_loaded("Assets/Menu.scene"));
    }

    #[test]
    fn test_bundle_requires_every_member() {
        let (index, mut registry) = setup();
        let mut tracker = LoadStateTracker::new();

        tracker.update_from_paths(&mut registry, &index, paths(&["Assets/Intro.scene"]), None);
        assert!(!bundle_loaded(&registry, "campaign"));
        assert!(bundle_loaded(&registry, "empty"));

        tracker.update_from_paths(
            &mut registry,
            &index,
            paths(&["Assets/Hub.scene", "Assets/Intro.scene"]),
            None,
        );
        assert!(bundle_loaded(&registry, "campaign"));
    }

    #[test]
    fn test_member_without_path_is_vacuously_loaded() {
        let (mut index, mut registry) = setup();
        index.remove(&AssetId::new("hub"));
        let mut tracker = LoadStateTracker::new();

        tracker.update_from_paths(&mut registry, &index, paths(&["Assets/Intro.scene"]), None);
        assert!(bundle_loaded(&registry, "campaign"));
    }

    #[test]
    fn test_unloading_slot_is_treated_as_gone() {
        let (index, mut registry) = setup();
        let mut tracker = LoadStateTracker::new();

        tracker.update_from_paths(
            &mut registry,
            &index,
            paths(&["Assets/Menu.scene", "Assets/Intro.scene"]),
            Some(1),
        );

        assert!(scene_loaded(&registry, "menu"));
        assert!(!scene_loaded(&registry, "intro"));
        assert!(!tracker.is_path_loaded("Assets/Intro.scene"));
        assert!(!tracker.is_path_loaded(""));
    }

    #[test]
    fn test_out_of_range_slot_is_ignored() {
        let (index, mut registry) = setup();
        let mut tracker = LoadStateTracker::new();

        tracker.update_from_paths(&mut registry, &index, paths(&["Assets/Menu.scene"]), Some(4));
        assert!(scene_loaded(&registry, "menu"));
    }

    #[test]
    fn test_recompute_does_not_dirty_registry() {
        let (index, mut registry) = setup();
        registry.clear_dirty();
        let mut tracker = LoadStateTracker::new();

        tracker.update_from_paths(&mut registry, &index, paths(&["Assets/Menu.scene"]), None);
        assert!(!registry.is_dirty());
    }
}
