//! Simulated host
//!
//! A self-contained host with the same observable behaviour as an editor:
//! edit-mode opens, play-mode loads, deferred mode switches, and a queue of
//! outgoing events. Used by the demo binary and by tests.

use std::collections::BTreeSet;

use crate::build::BuildSceneEntry;
use crate::events::{EventQueue, HostEvent};
use crate::transition::ModeTransition;
use super::{HostError, HostMode, OpenMode, Operator, SaveChoice, SceneHost};

#[derive(Debug, Clone)]
struct OpenScene {
    path: String,
    modified: bool,
}

/// In-process host implementation
#[derive(Debug, Default)]
pub struct SimulatedHost {
    mode: HostMode,
    available: BTreeSet<String>,
    open: Vec<OpenScene>,
    active: Option<String>,
    build_scenes: Vec<BuildSceneEntry>,
    pending_mode: Option<HostMode>,
    events: EventQueue,
    save_count: usize,
}

impl SimulatedHost {
    /// Create a host in edit mode with no scenes
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Add a scene that can be opened (builder form)
    #[must_use]
    pub fn with_scene(mut self, path: &str) -> Self {
        self.add_scene(path);
        self
    }
    
    /// Add a scene that can be opened
    pub fn add_scene(&mut self, path: &str) {
        self.available.insert(path.to_string());
    }
    
    /// Delete a scene from disk; it stays open if it already was
    pub fn delete_scene(&mut self, path: &str) -> bool {
        self.available.remove(path)
    }
    
    /// Replace the build configuration
    pub fn set_build_scenes(&mut self, scenes: Vec<BuildSceneEntry>) {
        self.build_scenes = scenes;
        self.events.send(HostEvent::BuildSettingsChanged);
    }
    
    /// Flag an open scene as having unsaved changes
    pub fn mark_modified(&mut self, path: &str) -> bool {
        match self.open.iter_mut().find(|scene| scene.path == path) {
            Some(scene) => {
                scene.modified = true;
                true
            }
            None => false,
        }
    }
    
    /// Path of the active scene
    pub fn active_scene(&self) -> Option<&str> {
        self.active.as_deref()
    }
    
    /// Number of times modified scenes were saved
    pub fn save_count(&self) -> usize {
        self.save_count
    }
    
    /// Mode requested but not yet entered
    pub fn pending_mode(&self) -> Option<HostMode> {
        self.pending_mode
    }
    
    /// Take every event fired since the last call
    pub fn take_events(&mut self) -> EventQueue {
        std::mem::take(&mut self.events)
    }
    
    /// Finish a requested mode switch (the reload boundary) and fire the
    /// matching "entered" event
    pub fn complete_mode_change(&mut self) -> Option<ModeTransition> {
        let mode = self.pending_mode.take()?;
        self.mode = mode;
        
        let transition = match mode {
            HostMode::Edit => ModeTransition::EnteredEditMode,
            HostMode::Play => ModeTransition::EnteredPlayMode,
        };
        self.events.send(HostEvent::ModeChanged(transition));
        Some(transition)
    }
    
    fn is_open(&self, path: &str) -> bool {
        self.open.iter().any(|scene| scene.path == path)
    }
    
    fn require_mode(&self, mode: HostMode, action: &str) -> Result<(), HostError> {
        if self.mode() == mode {
            Ok(())
        } else {
            Err(HostError::InvalidState(format!("{} is not available in {:?} mode", action, self.mode())))
        }
    }
    
    fn add_open(&mut self, path: &str, mode: OpenMode) -> Result<(), HostError> {
        if !self.available.contains(path) {
            return Err(HostError::SceneNotFound(path.to_string()));
        }
        
        match mode {
            OpenMode::Replace => {
                self.open.clear();
                self.open.push(OpenScene { path: path.to_string(), modified: false });
                self.active = Some(path.to_string());
            }
            OpenMode::Additive => {
                if !self.is_open(path) {
                    self.open.push(OpenScene { path: path.to_string(), modified: false });
                }
                if self.active.is_none() {
                    self.active = Some(path.to_string());
                }
            }
        }
        Ok(())
    }
    
    fn remove_open(&mut self, path: &str) -> Result<bool, HostError> {
        let Some(position) = self.open.iter().position(|scene| scene.path == path) else {
            return Ok(false);
        };
        if self.open.len() == 1 {
            return Err(HostError::InvalidState("cannot close the last open scene".to_string()));
        }
        
        self.open.remove(position);
        if self.active.as_deref() == Some(path) {
            self.active = self.open.first().map(|scene| scene.path.clone());
        }
        Ok(true)
    }
}

impl SceneHost for SimulatedHost {
    fn mode(&self) -> HostMode {
        self.mode
    }
    
    fn loaded_scenes(&self) -> Vec<String> {
        self.open.iter().map(|scene| scene.path.clone()).collect()
    }
    
    fn open_scene(&mut self, path: &str, mode: OpenMode) -> Result<(), HostError> {
        self.require_mode(HostMode::Edit, "open_scene")?;
        self.add_open(path, mode)?;
        self.events.send(HostEvent::SceneOpened { path: path.to_string() });
        Ok(())
    }
    
    fn load_scene(&mut self, path: &str, mode: OpenMode) -> Result<(), HostError> {
        self.require_mode(HostMode::Play, "load_scene")?;
        self.add_open(path, mode)?;
        self.events.send(HostEvent::SceneLoaded { path: path.to_string() });
        Ok(())
    }
    
    fn close_scene(&mut self, path: &str) -> Result<bool, HostError> {
        self.require_mode(HostMode::Edit, "close_scene")?;
        let closed = self.remove_open(path)?;
        if closed {
            self.events.send(HostEvent::SceneClosed { path: path.to_string() });
        }
        Ok(closed)
    }
    
    fn unload_scene(&mut self, path: &str) -> Result<bool, HostError> {
        self.require_mode(HostMode::Play, "unload_scene")?;
        let slot = self.open.iter().position(|scene| scene.path == path);
        if let Some(slot) = slot {
            self.events.send(HostEvent::SceneUnloading { slot });
        }
        // The simulation completes the unload within the same tick
        let unloaded = self.remove_open(path)?;
        if unloaded {
            self.events.send(HostEvent::SceneUnloaded { path: path.to_string() });
        }
        Ok(unloaded)
    }
    
    fn has_modified_scenes(&self) -> bool {
        self.open.iter().any(|scene| scene.modified)
    }
    
    fn save_modified_scenes(&mut self) -> Result<(), HostError> {
        for scene in &mut self.open {
            scene.modified = false;
        }
        self.save_count += 1;
        Ok(())
    }
    
    fn set_active_scene(&mut self, path: &str) -> Result<(), HostError> {
        if !self.is_open(path) {
            return Err(HostError::InvalidState(format!("{} is not open", path)));
        }
        self.active = Some(path.to_string());
        Ok(())
    }
    
    fn move_scene_to_front(&mut self, path: &str) -> Result<(), HostError> {
        let position = self
            .open
            .iter()
            .position(|scene| scene.path == path)
            .ok_or_else(|| HostError::InvalidState(format!("{} is not open", path)))?;
        let scene = self.open.remove(position);
        self.open.insert(0, scene);
        Ok(())
    }
    
    fn build_scenes(&self) -> Vec<BuildSceneEntry> {
        self.build_scenes.clone()
    }
    
    fn request_mode(&mut self, mode: HostMode) {
        if mode == self.mode() || self.pending_mode.is_some() {
            return;
        }
        
        let transition = match self.mode() {
            HostMode::Edit => ModeTransition::ExitingEditMode,
            HostMode::Play => ModeTransition::ExitingPlayMode,
        };
        self.pending_mode = Some(mode);
        self.events.send(HostEvent::ModeChanged(transition));
    }
}

/// Operator with fixed answers, counting how often it was asked
#[derive(Debug, Clone)]
pub struct ScriptedOperator {
    /// Answer to the save prompt
    pub save_choice: SaveChoice,
    /// Answer to the open-mode prompt
    pub open_mode: Option<OpenMode>,
    /// Number of prompts shown
    pub prompts: usize,
}

impl ScriptedOperator {
    /// Operator that always answers with the given save choice
    pub fn answering(save_choice: SaveChoice) -> Self {
        Self { save_choice, ..Self::default() }
    }
}

impl Default for ScriptedOperator {
    fn default() -> Self {
        Self {
            save_choice: SaveChoice::Save,
            open_mode: Some(OpenMode::Replace),
            prompts: 0,
        }
    }
}

impl Operator for ScriptedOperator {
    fn confirm_save_modified(&mut self) -> SaveChoice {
        self.prompts += 1;
        self.save_choice
    }
    
    fn choose_open_mode(&mut self, _path: &str) -> Option<OpenMode> {
        self.prompts += 1;
        self.open_mode
    }
}
