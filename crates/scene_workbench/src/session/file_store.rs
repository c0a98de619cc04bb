//! File-backed session store
//!
//! Values live in a RON map. Every `set` writes the whole map through, so a
//! store opened after a reload sees everything written before it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{SessionError, SessionStore};

/// Session store persisted to a RON file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileSessionStore {
    /// Open the store at `path`, reading existing values if the file exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                ron::from_str(&contents).map_err(|e| SessionError::Parse(e.to_string()))?
            }
        } else {
            BTreeMap::new()
        };
        
        log::debug!("Opened session store at {} ({} values)", path.display(), values.len());
        Ok(Self { path, values })
    }
    
    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
    
    fn write(&self) -> Result<(), SessionError> {
        let contents = ron::ser::to_string_pretty(&self.values, ron::ser::PrettyConfig::default())
            .map_err(|e| SessionError::Serialize(e.to_string()))?;
        
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        
        // Staged write; readers only ever see a complete file
        let staging = self.path.with_extension("ron.tmp");
        std::fs::write(&staging, contents)?;
        std::fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
    
    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        if self.values.get(key).map(String::as_str) == Some(value) && self.path.exists() {
            return Ok(());
        }
        let previous = self.values.insert(key.to_string(), value.to_string());
        if let Err(e) = self.write() {
            // Keep memory in step with what is on disk
            match previous {
                Some(previous) => self.values.insert(key.to_string(), previous),
                None => self.values.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
    
    fn flush(&mut self) -> Result<(), SessionError> {
        self.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.ron");

        {
            let mut store = FileSessionStore::open(&path).unwrap();
            store.set("PlayScenes", "Intro:Hub").unwrap();
            store.set("UnloadCoreScene", "True").unwrap();
        }

        let store = FileSessionStore::open(&path).unwrap();
        assert_eq!(store.get("PlayScenes").as_deref(), Some("Intro:Hub"));
        assert_eq!(store.get("UnloadCoreScene").as_deref(), Some("True"));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::open(dir.path().join("nested").join("session.ron")).unwrap();
        assert_eq!(store.get("PlayScenes"), None);
    }

    #[test]
    fn test_flush_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.ron");
        let mut store = FileSessionStore::open(&path).unwrap();

        store.flush().unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn test_failed_write_keeps_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.ron");
        let mut store = FileSessionStore::open(&path).unwrap();
        store.set("PlayScenes", "Intro").unwrap();

        // A directory where the staging file should go makes every write fail
        std::fs::create_dir(path.with_extension("ron.tmp")).unwrap();

        assert!(store.set("PlayScenes", "Hub").is_err());
        assert_eq!(store.get("PlayScenes").as_deref(), Some("Intro"));
        assert!(store.set("UnloadCoreScene", "True").is_err());
        assert_eq!(store.get("UnloadCoreScene"), None);

        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(reopened.get("PlayScenes").as_deref(), Some("Intro"));
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.ron");
        std::fs::write(&path, "{ not ron").unwrap();

        assert!(matches!(FileSessionStore::open(&path), Err(SessionError::Parse(_))));
    }
}
