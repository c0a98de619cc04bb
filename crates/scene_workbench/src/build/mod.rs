//! Build configuration mirror
//!
//! Keeps a copy of which scenes the host's build configuration ships, by
//! identifier, plus a diagnostic list of discovered scenes that are not
//! flagged for builds.

use serde::{Serialize, Deserialize};

use crate::config::Config;
use crate::identity::{display_name_from_path, AssetId, AssetKind, IdentityResolver};

/// One row of the host's build configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSceneEntry {
    /// Scene path
    pub path: String,
    /// Whether the scene is included in builds
    pub enabled: bool,
}

impl BuildSceneEntry {
    /// Build row for `path`
    pub fn new(path: impl Into<String>, enabled: bool) -> Self {
        Self { path: path.into(), enabled }
    }
}

/// A discovered scene that does not ship
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonBuildScene {
    /// Display name
    pub name: String,
    /// Stable identifier
    pub identifier: AssetId,
}

/// Result of one synchronization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSyncReport {
    /// Enabled scenes mirrored
    pub build_scenes: usize,
    /// Discovered scenes not shipping
    pub non_build_scenes: usize,
    /// Build rows whose path no longer maps to an identifier
    pub unresolved: usize,
}

/// Mirror of the host's build configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildMirror {
    /// Identifiers of enabled build scenes, in build order
    pub build_scene_ids: Vec<AssetId>,
    /// Discovered scenes not flagged for builds
    pub non_build_scenes: Vec<NonBuildScene>,
}

impl Config for BuildMirror {}

impl BuildMirror {
    /// Create an empty mirror
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Rebuild the mirror from the host's build rows and a discovery scan
    pub fn sync(&mut self, build_scenes: &[BuildSceneEntry], resolver: &dyn IdentityResolver) -> BuildSyncReport {
        let mut report = BuildSyncReport::default();
        
        self.build_scene_ids.clear();
        for row in build_scenes.iter().filter(|row| row.enabled) {
            match resolver.id_of(&row.path) {
                Some(id) if !self.build_scene_ids.contains(&id) => self.build_scene_ids.push(id),
                Some(_) => {}
                None => {
                    log::debug!("Build scene {} has no asset identity", row.path);
                    report.unresolved += 1;
                }
            }
        }
        
        self.non_build_scenes = resolver
            .discover(AssetKind::Scene)
            .into_iter()
            .filter(|id| !self.build_scene_ids.contains(id))
            .filter_map(|id| {
                resolver.resolved_path(&id).map(|path| NonBuildScene {
                    name: display_name_from_path(&path),
                    identifier: id,
                })
            })
            .collect();
        
        report.build_scenes = self.build_scene_ids.len();
        report.non_build_scenes = self.non_build_scenes.len();
        log::debug!(
            "Build mirror synced: {} shipping, {} not shipping",
            report.build_scenes,
            report.non_build_scenes
        );
        report
    }
    
    /// Whether the scene ships in builds
    pub fn contains(&self, id: &AssetId) -> bool {
        self.build_scene_ids.contains(id)
    }
    
    /// Build index of a shipping scene
    pub fn build_index(&self, id: &AssetId) -> Option<usize> {
        self.build_scene_ids.iter().position(|build_id| build_id == id)
    }
}
