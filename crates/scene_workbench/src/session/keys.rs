//! Typed access to the durable handoff keys

use super::{SessionError, SessionStore};

/// Set when the core scene was loaded for play mode and must be unloaded on return
pub const UNLOAD_CORE_SCENE: &str = "UnloadCoreScene";

/// Working set requested for the next play session, `:`-joined paths
pub const PLAY_SCENES: &str = "PlayScenes";

/// Separator between working-set paths
pub const WORKING_SET_SEPARATOR: char = ':';

/// Whether the core scene must be unloaded when edit mode resumes (default `false`)
pub fn unload_core_scene(store: &dyn SessionStore) -> bool {
    store
        .get(UNLOAD_CORE_SCENE)
        .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
}

/// Store the core-scene unload flag as `"True"` / `"False"`
pub fn set_unload_core_scene(store: &mut dyn SessionStore, value: bool) -> Result<(), SessionError> {
    store.set(UNLOAD_CORE_SCENE, if value { "True" } else { "False" })
}

/// Join paths into the working-set encoding
pub fn encode_working_set<S: AsRef<str>>(paths: &[S]) -> String {
    let separator = WORKING_SET_SEPARATOR.to_string();
    paths
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|path| !path.is_empty())
        .collect::<Vec<_>>()
        .join(separator.as_str())
}

/// Split the working-set encoding; empty segments are ignored
pub fn decode_working_set(encoded: &str) -> Vec<String> {
    encoded
        .split(WORKING_SET_SEPARATOR)
        .filter(|path| !path.is_empty())
        .map(str::to_string)
        .collect()
}

/// Working set requested for the next play session (empty when none)
pub fn working_set(store: &dyn SessionStore) -> Vec<String> {
    store
        .get(PLAY_SCENES)
        .map(|encoded| decode_working_set(&encoded))
        .unwrap_or_default()
}

/// Store the working set for the next play session
pub fn set_working_set<S: AsRef<str>>(store: &mut dyn SessionStore, paths: &[S]) -> Result<(), SessionError> {
    store.set(PLAY_SCENES, &encode_working_set(paths))
}

/// Clear the working set once it has been consumed
pub fn clear_working_set(store: &mut dyn SessionStore) -> Result<(), SessionError> {
    store.set(PLAY_SCENES, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;

    #[test]
    fn test_unload_flag_defaults_to_false() {
        let mut store = MemorySessionStore::new();
        assert!(!unload_core_scene(&store));

        set_unload_core_scene(&mut store, true).unwrap();
        assert_eq!(store.get(UNLOAD_CORE_SCENE).as_deref(), Some("True"));
        assert!(unload_core_scene(&store));

        set_unload_core_scene(&mut store, false).unwrap();
        assert_eq!(store.get(UNLOAD_CORE_SCENE).as_deref(), Some("False"));
        assert!(!unload_core_scene(&store));
    }

    #[test]
    fn test_unload_flag_ignores_garbage() {
        let mut store = MemorySessionStore::new();
        store.set(UNLOAD_CORE_SCENE, "yes").unwrap();
        assert!(!unload_core_scene(&store));
    }

    #[test]
    fn test_working_set_encoding() {
        assert_eq!(encode_working_set(&["Intro", "Hub"]), "Intro:Hub");
        assert_eq!(encode_working_set(&["Intro", ""]), "Intro");
        assert_eq!(decode_working_set("Intro:Hub"), vec!["Intro", "Hub"]);
        assert_eq!(decode_working_set("::Intro:"), vec!["Intro"]);
        assert!(decode_working_set("").is_empty());
    }

    #[test]
    fn test_working_set_lifecycle() {
        let mut store = MemorySessionStore::new();
        assert!(working_set(&store).is_empty());

        set_working_set(&mut store, &["Assets/Intro.scene", "Assets/Hub.scene"]).unwrap();
        assert_eq!(store.get(PLAY_SCENES).as_deref(), Some("Assets/Intro.scene:Assets/Hub.scene"));
        assert_eq!(working_set(&store).len(), 2);

        clear_working_set(&mut store).unwrap();
        assert!(working_set(&store).is_empty());
    }
}
