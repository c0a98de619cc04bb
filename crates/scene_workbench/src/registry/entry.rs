//! Registry entries
//!
//! The registry holds two parallel kinds of entries. Both carry only a stable
//! identifier plus derived, never-persisted state.

use crate::identity::{AssetId, AssetKind};

/// Behaviour shared by scene and bundle entries so both registry kinds run
/// through the same group and reconciliation code.
pub trait RegistryEntry: Clone {
    /// Asset kind this entry tracks
    const KIND: AssetKind;
    
    /// Create an entry with a derived display name
    fn new(id: AssetId, display_name: String) -> Self;
    
    /// Stable identifier
    fn id(&self) -> &AssetId;
    
    /// Name derived from the resolved path
    fn display_name(&self) -> &str;
    
    /// Replace the derived display name
    fn set_display_name(&mut self, name: String);
    
    /// Search-filter result
    fn is_visible(&self) -> bool;
    
    /// Set the search-filter result
    fn set_visible(&mut self, visible: bool);
    
    /// Whether the entry is currently loaded in the host
    fn is_loaded(&self) -> bool;
}

/// A scene registered in a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneEntry {
    /// Stable identifier
    pub id: AssetId,
    /// Name derived from the resolved path
    pub display_name: String,
    /// Scene path is in the host's live set
    pub is_loaded: bool,
    /// Search-filter result
    pub is_visible: bool,
}

impl RegistryEntry for SceneEntry {
    const KIND: AssetKind = AssetKind::Scene;
    
    fn new(id: AssetId, display_name: String) -> Self {
        Self {
            id,
            display_name,
            is_loaded: false,
            is_visible: true,
        }
    }
    
    fn id(&self) -> &AssetId {
        &self.id
    }
    
    fn display_name(&self) -> &str {
        &self.display_name
    }
    
    fn set_display_name(&mut self, name: String) {
        self.display_name = name;
    }
    
    fn is_visible(&self) -> bool {
        self.is_visible
    }
    
    fn set_visible(&mut self, visible: bool) {
        self.is_visible = visible;
    }
    
    fn is_loaded(&self) -> bool {
        self.is_loaded
    }
}

/// A bundle registered in a group
///
/// Members are owned by the bundle asset itself and enumerated through the
/// identity resolver when load state is computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
    /// Stable identifier of the bundle asset
    pub id: AssetId,
    /// Name derived from the resolved path
    pub display_name: String,
    /// Every member scene is in the host's live set
    pub is_loaded: bool,
    /// Search-filter result
    pub is_visible: bool,
}

impl RegistryEntry for BundleEntry {
    const KIND: AssetKind = AssetKind::Bundle;
    
    fn new(id: AssetId, display_name: String) -> Self {
        Self {
            id,
            display_name,
            is_loaded: false,
            is_visible: true,
        }
    }
    
    fn id(&self) -> &AssetId {
        &self.id
    }
    
    fn display_name(&self) -> &str {
        &self.display_name
    }
    
    fn set_display_name(&mut self, name: String) {
        self.display_name = name;
    }
    
    fn is_visible(&self) -> bool {
        self.is_visible
    }
    
    fn set_visible(&mut self, visible: bool) {
        self.is_visible = visible;
    }
    
    fn is_loaded(&self) -> bool {
        self.is_loaded
    }
}
