//! # Unified Configuration
//!
//! Configuration for the scene workbench: where the registry document and the
//! session store live, how groups are sorted, and which scene (if any) is the
//! core scene kept loaded during play mode.
//!
//! Supports TOML and RON through the [`Config`] trait:
//!
//! ```toml
//! log_level = "info"
//! registry_path = "ProjectSettings/scene_registry.ron"
//! session_path = "Library/workbench_session.ron"
//! default_group_name = "Default"
//! sort_policy = "Always"
//!
//! [core_scene]
//! enabled = true
//! scene_id = "5f0c2e1a"
//! ```

use serde::{Serialize, Deserialize};

use crate::identity::AssetId;

// Re-export from the config module for convenience
pub use crate::config::{Config, ConfigError};

/// When group contents are sorted by display name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortPolicy {
    /// Sort after every refresh, even when only the default group exists
    Always,
    /// Only sort when a registry kind holds more than one group
    MultipleGroupsOnly,
}

impl Default for SortPolicy {
    fn default() -> Self {
        Self::Always
    }
}

/// # Core Scene Configuration
///
/// The core scene is loaded additively, moved first and made active right
/// before play mode starts, then unloaded again when edit mode resumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreSceneConfig {
    /// Whether the core scene feature is enabled
    pub enabled: bool,
    /// Stable identifier of the core scene
    pub scene_id: Option<AssetId>,
}

impl CoreSceneConfig {
    /// Enabled core scene configuration for the given identifier
    pub fn enabled(scene_id: impl Into<AssetId>) -> Self {
        Self {
            enabled: true,
            scene_id: Some(scene_id.into()),
        }
    }
    
    /// Identifier of the core scene, only when the feature is enabled
    pub fn active_scene_id(&self) -> Option<&AssetId> {
        if self.enabled {
            self.scene_id.as_ref()
        } else {
            None
        }
    }
}

/// # Workbench Configuration
///
/// Top-level configuration handed to [`crate::SceneWorkbench::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbenchConfig {
    /// Log filter used by hosts that initialize logging from config
    pub log_level: String,
    /// Registry document location (`.ron` or `.toml`); `None` keeps the registry in memory
    pub registry_path: Option<String>,
    /// Session store location; `None` selects an in-memory store
    pub session_path: Option<String>,
    /// Name given to the permanent default group of each registry kind
    pub default_group_name: String,
    /// Sorting policy applied after refresh
    pub sort_policy: SortPolicy,
    /// Core scene feature
    pub core_scene: CoreSceneConfig,
}

impl WorkbenchConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            registry_path: None,
            session_path: None,
            default_group_name: "Default".to_string(),
            sort_policy: SortPolicy::default(),
            core_scene: CoreSceneConfig::default(),
        }
    }
    
    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
    
    /// Persist the registry at the given path
    pub fn with_registry_path(mut self, path: impl Into<String>) -> Self {
        self.registry_path = Some(path.into());
        self
    }
    
    /// Keep session state in a file at the given path
    pub fn with_session_path(mut self, path: impl Into<String>) -> Self {
        self.session_path = Some(path.into());
        self
    }
    
    /// Set the default group name
    pub fn with_default_group_name(mut self, name: impl Into<String>) -> Self {
        self.default_group_name = name.into();
        self
    }
    
    /// Set the sorting policy
    pub fn with_sort_policy(mut self, policy: SortPolicy) -> Self {
        self.sort_policy = policy;
        self
    }
    
    /// Enable the core scene feature
    pub fn with_core_scene(mut self, scene_id: impl Into<AssetId>) -> Self {
        self.core_scene = CoreSceneConfig::enabled(scene_id);
        self
    }
    
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.default_group_name.trim().is_empty() {
            return Err("Default group name cannot be empty".to_string());
        }
        
        if self.core_scene.enabled && self.core_scene.scene_id.is_none() {
            return Err("Core scene is enabled but no scene id is set".to_string());
        }
        
        if matches!(&self.registry_path, Some(path) if !(path.ends_with(".ron") || path.ends_with(".toml"))) {
            return Err("Registry path must end in .ron or .toml".to_string());
        }
        
        Ok(())
    }
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for WorkbenchConfig {}
