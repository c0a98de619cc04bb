//! Scene open/close operations
//!
//! Interactive primitives shared by direct user actions and the transition
//! coordinator. They never fail loudly: every problem degrades to "nothing
//! happened", reported as `false` (or as an [`OperationOutcome`] for callers
//! that need to tell cancellation apart from a no-op).
//!
//! | Host mode | Open                                   | Close                         |
//! |-----------|----------------------------------------|-------------------------------|
//! | Play      | immediate load                         | asynchronous unload           |
//! | Edit      | save prompt first (`Replace` only)     | save prompt first             |

use crate::host::{HostError, HostMode, OpenMode, Operator, SaveChoice, SceneHost};

/// What an open or close request ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    /// The scene was opened or closed
    Completed,
    /// The request had an empty path and was ignored
    EmptyPath,
    /// The host has no scene at the path
    NotFound,
    /// The operator cancelled a prompt
    Cancelled,
    /// Close requested for a scene that is not open
    NotOpen,
    /// The host refused the request
    Failed(String),
}

impl OperationOutcome {
    /// Whether the request changed the open scenes
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl From<HostError> for OperationOutcome {
    fn from(error: HostError) -> Self {
        match error {
            HostError::SceneNotFound(_) => Self::NotFound,
            other => Self::Failed(other.to_string()),
        }
    }
}

/// Stateless open/close primitives over a host and an operator
pub struct SceneOperations;

impl SceneOperations {
    /// Open a scene; `false` when nothing changed
    pub fn open(host: &mut dyn SceneHost, operator: &mut dyn Operator, path: &str, mode: OpenMode) -> bool {
        Self::open_with_outcome(host, operator, path, mode).succeeded()
    }

    /// Open a scene and report exactly what happened
    pub fn open_with_outcome(
        host: &mut dyn SceneHost,
        operator: &mut dyn Operator,
        path: &str,
        mode: OpenMode,
    ) -> OperationOutcome {
        if path.is_empty() {
            return OperationOutcome::EmptyPath;
        }

        let result = match host.mode() {
            HostMode::Play => host.load_scene(path, mode),
            HostMode::Edit => {
                if mode == OpenMode::Replace {
                    if let Some(outcome) = Self::offer_save(host, operator) {
                        return outcome;
                    }
                }
                host.open_scene(path, mode)
            }
        };

        Self::finish("open", path, result.map(|()| true))
    }

    /// Ask the operator how to open the scene, then open it
    pub fn open_interactive(host: &mut dyn SceneHost, operator: &mut dyn Operator, path: &str) -> OperationOutcome {
        if path.is_empty() {
            return OperationOutcome::EmptyPath;
        }

        match operator.choose_open_mode(path) {
            Some(mode) => Self::open_with_outcome(host, operator, path, mode),
            None => OperationOutcome::Cancelled,
        }
    }

    /// Close a scene; `false` when nothing changed, including cancellation
    pub fn close(host: &mut dyn SceneHost, operator: &mut dyn Operator, path: &str) -> bool {
        Self::close_with_outcome(host, operator, path).succeeded()
    }

    /// Close a scene and report exactly what happened
    pub fn close_with_outcome(host: &mut dyn SceneHost, operator: &mut dyn Operator, path: &str) -> OperationOutcome {
        if path.is_empty() {
            return OperationOutcome::EmptyPath;
        }

        let result = match host.mode() {
            HostMode::Play => host.unload_scene(path),
            HostMode::Edit => {
                if let Some(outcome) = Self::offer_save(host, operator) {
                    return outcome;
                }
                host.close_scene(path)
            }
        };

        Self::finish("close", path, result)
    }

    /// Prompt to save modified scenes. `Some` ends the operation early.
    fn offer_save(host: &mut dyn SceneHost, operator: &mut dyn Operator) -> Option<OperationOutcome> {
        if !host.has_modified_scenes() {
            return None;
        }

        match operator.confirm_save_modified() {
            SaveChoice::Cancel => {
                log::debug!("Operator cancelled save prompt");
                Some(OperationOutcome::Cancelled)
            }
            SaveChoice::Discard => None,
            SaveChoice::Save => match host.save_modified_scenes() {
                Ok(()) => None,
                Err(e) => {
                    log::warn!("Saving modified scenes failed: {}", e);
                    Some(OperationOutcome::Failed(e.to_string()))
                }
            },
        }
    }

    fn finish(action: &str, path: &str, result: Result<bool, HostError>) -> OperationOutcome {
        match result {
            Ok(true) => {
                log::info!("Scene {}: {}", action, path);
                OperationOutcome::Completed
            }
            Ok(false) => OperationOutcome::NotOpen,
            Err(e) if e.is_not_found() => {
                log::debug!("Scene {} skipped, not found: {}", action, path);
                OperationOutcome::NotFound
            }
            Err(e) => {
                log::warn!("Scene {} failed for {}: {}", action, path, e);
                e.into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ScriptedOperator, SimulatedHost};

    fn host() -> SimulatedHost {
        SimulatedHost::new().with_scene("Menu").with_scene("Hub")
    }

    #[test]
    fn test_empty_path_is_rejected_without_prompt() {
        let mut host = host();
        let mut operator = ScriptedOperator::default();

        assert!(!SceneOperations::open(&mut host, &mut operator, "", OpenMode::Replace));
        assert_eq!(
            SceneOperations::close_with_outcome(&mut host, &mut operator, ""),
            OperationOutcome::EmptyPath
        );
        assert_eq!(operator.prompts, 0);
        assert!(host.take_events().is_empty());
    }

    #[test]
    fn test_missing_scene_returns_false() {
        let mut host = host();
        let mut operator = ScriptedOperator::default();

        assert_eq!(
            SceneOperations::open_with_outcome(&mut host, &mut operator, "missing/path", OpenMode::Replace),
            OperationOutcome::NotFound
        );
        assert!(host.loaded_scenes().is_empty());
    }

    #[test]
    fn test_replace_prompts_only_when_modified() {
        let mut host = host();
        let mut operator = ScriptedOperator::default();

        assert!(SceneOperations::open(&mut host, &mut operator, "Menu", OpenMode::Replace));
        assert_eq!(operator.prompts, 0);

        host.mark_modified("Menu");
        assert!(SceneOperations::open(&mut host, &mut operator, "Hub", OpenMode::Replace));
        assert_eq!(operator.prompts, 1);
        assert_eq!(host.save_count(), 1);
    }

    #[test]
    fn test_cancelled_replace_leaves_scenes_untouched() {
        let mut host = host();
        let mut operator = ScriptedOperator::answering(SaveChoice::Cancel);
        host.open_scene("Menu", OpenMode::Replace).unwrap();
        host.mark_modified("Menu");

        let outcome = SceneOperations::open_with_outcome(&mut host, &mut operator, "Hub", OpenMode::Replace);

        assert_eq!(outcome, OperationOutcome::Cancelled);
        assert_eq!(host.loaded_scenes(), vec!["Menu"]);
        assert!(host.has_modified_scenes());
    }

    #[test]
    fn test_additive_open_skips_prompt() {
        let mut host = host();
        let mut operator = ScriptedOperator::answering(SaveChoice::Cancel);
        host.open_scene("Menu", OpenMode::Replace).unwrap();
        host.mark_modified("Menu");

        assert!(SceneOperations::open(&mut host, &mut operator, "Hub", OpenMode::Additive));
        assert_eq!(operator.prompts, 0);
    }

    #[test]
    fn test_close_distinguishes_cancel_from_not_open() {
        let mut host = host();
        host.open_scene("Menu", OpenMode::Replace).unwrap();
        host.open_scene("Hub", OpenMode::Additive).unwrap();

        let mut discard = ScriptedOperator::answering(SaveChoice::Discard);
        assert_eq!(
            SceneOperations::close_with_outcome(&mut host, &mut discard, "Missing"),
            OperationOutcome::NotOpen
        );

        host.mark_modified("Hub");
        let mut cancel = ScriptedOperator::answering(SaveChoice::Cancel);
        assert_eq!(
            SceneOperations::close_with_outcome(&mut host, &mut cancel, "Hub"),
            OperationOutcome::Cancelled
        );
        assert!(!SceneOperations::close(&mut host, &mut cancel, "Hub"));

        assert!(SceneOperations::close(&mut host, &mut discard, "Hub"));
        assert_eq!(host.loaded_scenes(), vec!["Menu"]);
    }

    #[test]
    fn test_play_mode_loads_and_unloads_without_prompt() {
        let mut host = host();
        let mut operator = ScriptedOperator::answering(SaveChoice::Cancel);
        host.open_scene("Menu", OpenMode::Replace).unwrap();
        host.mark_modified("Menu");
        host.request_mode(HostMode::Play);
        host.complete_mode_change();

        assert!(SceneOperations::open(&mut host, &mut operator, "Hub", OpenMode::Additive));
        assert!(SceneOperations::close(&mut host, &mut operator, "Menu"));
        assert_eq!(host.loaded_scenes(), vec!["Hub"]);
        assert_eq!(operator.prompts, 0);
    }

    #[test]
    fn test_host_refusal_is_contained() {
        let mut host = host();
        let mut operator = ScriptedOperator::default();
        host.open_scene("Menu", OpenMode::Replace).unwrap();

        let outcome = SceneOperations::close_with_outcome(&mut host, &mut operator, "Menu");
        assert!(matches!(outcome, OperationOutcome::Failed(_)));
        assert_eq!(host.loaded_scenes(), vec!["Menu"]);
    }

    #[test]
    fn test_open_interactive() {
        let mut host = host();
        let mut operator = ScriptedOperator { open_mode: None, ..ScriptedOperator::default() };
        assert_eq!(
            SceneOperations::open_interactive(&mut host, &mut operator, "Menu"),
            OperationOutcome::Cancelled
        );

        operator.open_mode = Some(OpenMode::Additive);
        assert!(SceneOperations::open_interactive(&mut host, &mut operator, "Menu").succeeded());
        assert_eq!(host.loaded_scenes(), vec!["Menu"]);
    }
}
