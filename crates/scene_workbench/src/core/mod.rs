//! # Core Workbench Module
//!
//! Shared configuration types used by every workbench subsystem.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for the registry, session storage and
//!   the core-scene feature

pub mod config;

// Re-export commonly used config types
pub use config::{
    WorkbenchConfig,
    CoreSceneConfig,
    SortPolicy,
    Config,
    ConfigError,
};
