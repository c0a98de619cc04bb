//! Durable session storage
//!
//! Ordinary memory is wiped when the host reloads at the edit/play boundary.
//! Anything that must cross that boundary goes through a [`SessionStore`]:
//! string keys, string values, written through before the transition and
//! readable immediately after.

mod file_store;
pub mod keys;

pub use file_store::FileSessionStore;

use std::collections::BTreeMap;
use thiserror::Error;

/// Session storage errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// IO error while reading or writing the backing file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    
    /// Stored session data could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
    
    /// Session data could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(String),
}

/// String key-value store that outlives the in-memory state
pub trait SessionStore {
    /// Value for `key`, if set
    fn get(&self, key: &str) -> Option<String>;
    
    /// Set `key` to `value`
    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError>;
    
    /// Make every write durable; called before a mode transition is requested
    fn flush(&mut self) -> Result<(), SessionError> {
        Ok(())
    }
}

/// In-process store for hosts without a reload boundary, and for tests
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    values: BTreeMap<String, String>,
}

impl MemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
    
    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Open the store selected by configuration: a file store when a path is
/// given, an in-memory store otherwise
pub fn open_store(path: Option<&str>) -> Result<Box<dyn SessionStore>, SessionError> {
    match path {
        Some(path) => Ok(Box::new(FileSessionStore::open(path)?)),
        None => Ok(Box::new(MemorySessionStore::new())),
    }
}
