//! Host integration
//!
//! The editor (or any runtime embedding the workbench) is reached only through
//! the traits in this module. The workbench never stores a host; every call
//! that needs one receives it explicitly.

mod simulated;

pub use simulated::{SimulatedHost, ScriptedOperator};

use thiserror::Error;

use crate::build::BuildSceneEntry;

/// Current host mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HostMode {
    /// Authoring mode
    #[default]
    Edit,
    /// Running / simulation mode
    Play,
}

/// How a scene is opened relative to the scenes already open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenMode {
    /// Replace every open scene
    Replace,
    /// Open alongside the scenes already open
    Additive,
}

/// Operator's answer to the "save modified scenes?" prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
    /// Save and continue
    Save,
    /// Continue without saving
    Discard,
    /// Abort the operation
    Cancel,
}

/// Host errors
#[derive(Debug, Error)]
pub enum HostError {
    /// No scene exists at the path
    #[error("Scene not found: {0}")]
    SceneNotFound(String),
    
    /// The request is not valid in the host's current state
    #[error("Invalid state: {0}")]
    InvalidState(String),
    
    /// Any other host failure
    #[error("Host error: {0}")]
    Backend(String),
}

impl HostError {
    /// Whether this is a "resource not found" class failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SceneNotFound(_))
    }
}

/// Scene services provided by the host
pub trait SceneHost {
    /// Current mode
    fn mode(&self) -> HostMode;
    
    /// Paths of the scenes currently open, in load order
    fn loaded_scenes(&self) -> Vec<String>;
    
    /// Open a scene in edit mode
    fn open_scene(&mut self, path: &str, mode: OpenMode) -> Result<(), HostError>;
    
    /// Load a scene immediately in play mode
    fn load_scene(&mut self, path: &str, mode: OpenMode) -> Result<(), HostError>;
    
    /// Close a scene in edit mode; `Ok(false)` if it was not open
    fn close_scene(&mut self, path: &str) -> Result<bool, HostError>;
    
    /// Begin unloading a scene in play mode; `Ok(false)` if it was not loaded.
    /// Completion is reported later with a scene-unloaded event.
    fn unload_scene(&mut self, path: &str) -> Result<bool, HostError>;
    
    /// Whether any open scene has unsaved changes
    fn has_modified_scenes(&self) -> bool;
    
    /// Save every modified scene
    fn save_modified_scenes(&mut self) -> Result<(), HostError>;
    
    /// Make an open scene the active one
    fn set_active_scene(&mut self, path: &str) -> Result<(), HostError>;
    
    /// Move an open scene to the front of the load order
    fn move_scene_to_front(&mut self, path: &str) -> Result<(), HostError>;
    
    /// Build configuration: scene paths in build order with their enabled flag
    fn build_scenes(&self) -> Vec<BuildSceneEntry>;
    
    /// Ask the host to switch modes. The host fires the transition events.
    fn request_mode(&mut self, mode: HostMode);
}

/// Interactive prompts answered by the operator
///
/// Both prompts are modal: the host blocks until they return.
pub trait Operator {
    /// Offer to save modified scenes before a destructive operation
    fn confirm_save_modified(&mut self) -> SaveChoice;
    
    /// Ask how to open a scene; `None` cancels
    fn choose_open_mode(&mut self, path: &str) -> Option<OpenMode>;
}
