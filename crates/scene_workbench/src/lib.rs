//! # Scene Workbench
//!
//! Editor-side scene management for hosts that switch between an authoring
//! (edit) mode and a running (play) mode.
//!
//! ## Features
//!
//! - **Scene Registry**: User-defined groups of scenes and bundles, kept in
//!   sync with the project's asset index
//! - **Load-State Tracking**: Per-entry "is loaded" flags derived from the host
//! - **Build Mirror**: Which scenes ship in builds and which do not
//! - **Play-Mode Handoff**: Working set and core-scene state carried across the
//!   edit/play reload through a durable key-value store
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_workbench::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut index = InMemoryAssetIndex::new();
//!     index.insert_scene("a1", "Assets/Scenes/Menu.scene");
//!
//!     let mut host = SimulatedHost::new().with_scene("Assets/Scenes/Menu.scene");
//!     let session = MemorySessionStore::new();
//!
//!     let mut workbench = SceneWorkbench::new(
//!         WorkbenchConfig::default(),
//!         Box::new(index),
//!         Box::new(session),
//!     )?;
//!     workbench.refresh(&host)?;
//!
//!     let mut operator = ScriptedOperator::default();
//!     workbench.open_scene(&mut host, &mut operator, "Assets/Scenes/Menu.scene", OpenMode::Replace);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core modules
pub mod core;
pub mod config;
pub mod foundation;

// Scene management
pub mod identity;
pub mod registry;
pub mod tracker;
pub mod build;
pub mod host;
pub mod session;
pub mod operations;
pub mod transition;
pub mod events;

mod workbench;


pub use workbench::{SceneWorkbench, WorkbenchError, RefreshReport};

/// Common imports for workbench users
pub mod prelude {
    pub use crate::{
        SceneWorkbench, WorkbenchError, RefreshReport,
        core::config::{WorkbenchConfig, CoreSceneConfig, SortPolicy},
        config::{Config, ConfigError},
        identity::{AssetId, AssetKind, IdentityResolver, InMemoryAssetIndex},
        registry::{Registry, Group, GroupList, SceneEntry, BundleEntry, RegistryEntry, RegistryError},
        tracker::LoadStateTracker,
        build::{BuildMirror, BuildSceneEntry},
        host::{SceneHost, Operator, HostMode, OpenMode, SaveChoice, HostError, SimulatedHost, ScriptedOperator},
        session::{SessionStore, MemorySessionStore, FileSessionStore, SessionError},
        operations::{SceneOperations, OperationOutcome},
        transition::{ModeTransition, TransitionCoordinator, TransitionReport},
        events::{HostEvent, EventQueue},
    };
}
