//! Edit/play transition coordinator
//!
//! The host reloads all in-memory state when it switches between edit and
//! play mode. Anything that must cross that boundary goes through the
//! [`SessionStore`](crate::session::SessionStore):
//!
//! - `UnloadCoreScene`: set when the coordinator loaded the core scene on the
//!   way into play mode, so the next return to edit mode closes it again.
//! - `PlayScenes`: the working set a "play" action asked for, consumed once
//!   play mode has been entered.
//!
//! The coordinator itself holds only configuration. Collaborators are passed
//! per call through a [`TransitionContext`].

use serde::{Deserialize, Serialize};

use crate::core::config::CoreSceneConfig;
use crate::host::{Operator, OpenMode, SceneHost};
use crate::identity::IdentityResolver;
use crate::operations::SceneOperations;
use crate::session::{keys, SessionError, SessionStore};

/// Mode transitions fired by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeTransition {
    /// Edit mode is active again after a reload
    EnteredEditMode,
    /// Edit mode is about to be left
    ExitingEditMode,
    /// Play mode is active after a reload
    EnteredPlayMode,
    /// Play mode is about to be left
    ExitingPlayMode,
}

/// Collaborators a transition handler works with
pub struct TransitionContext<'a> {
    /// Scene host
    pub host: &'a mut dyn SceneHost,
    /// Prompt provider
    pub operator: &'a mut dyn Operator,
    /// Durable store surviving the reload
    pub session: &'a mut dyn SessionStore,
    /// Identifier to path resolution
    pub resolver: &'a dyn IdentityResolver,
}

/// What a transition handler did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionReport {
    /// Paths loaded by the handler
    pub loaded: Vec<String>,
    /// Paths unloaded by the handler
    pub unloaded: Vec<String>,
    /// Whether the core scene was made active
    pub core_scene_activated: bool,
    /// Whether a pending working set was consumed
    pub working_set_consumed: bool,
}

/// Reacts to mode transitions using durable session keys
#[derive(Debug, Clone, Default)]
pub struct TransitionCoordinator {
    core: CoreSceneConfig,
}

impl TransitionCoordinator {
    /// Create a coordinator for the given core-scene setting
    pub fn new(core: CoreSceneConfig) -> Self {
        Self { core }
    }

    /// Core-scene setting
    pub fn core_scene(&self) -> &CoreSceneConfig {
        &self.core
    }

    /// Resolved path of the core scene, `None` when disabled or unresolvable
    pub fn core_scene_path(&self, resolver: &dyn IdentityResolver) -> Option<String> {
        self.core.active_scene_id().and_then(|id| resolver.resolved_path(id))
    }

    /// Run the handler for one transition
    pub fn handle(
        &self,
        transition: ModeTransition,
        ctx: &mut TransitionContext<'_>,
    ) -> Result<TransitionReport, SessionError> {
        log::debug!("Handling {:?}", transition);
        match transition {
            ModeTransition::ExitingEditMode => self.exiting_edit_mode(ctx),
            ModeTransition::EnteredPlayMode => self.entered_play_mode(ctx),
            ModeTransition::EnteredEditMode => self.entered_edit_mode(ctx),
            ModeTransition::ExitingPlayMode => Ok(TransitionReport::default()),
        }
    }

    fn exiting_edit_mode(&self, ctx: &mut TransitionContext<'_>) -> Result<TransitionReport, SessionError> {
        let mut report = TransitionReport::default();
        let Some(core_path) = self.core_scene_path(ctx.resolver) else {
            return Ok(report);
        };

        let loaded = ctx.host.loaded_scenes();
        if !loaded.contains(&core_path) {
            if !SceneOperations::open(&mut *ctx.host, &mut *ctx.operator, &core_path, OpenMode::Additive) {
                log::warn!("Core scene {} could not be loaded", core_path);
                return Ok(report);
            }
            keys::set_unload_core_scene(&mut *ctx.session, true)?;
            ctx.session.flush()?;
            report.loaded.push(core_path.clone());
        }

        if ctx.host.loaded_scenes().first() != Some(&core_path) {
            if let Err(e) = ctx.host.move_scene_to_front(&core_path) {
                log::warn!("Could not move core scene to front: {}", e);
            }
        }

        match ctx.host.set_active_scene(&core_path) {
            Ok(()) => report.core_scene_activated = true,
            Err(e) => log::warn!("Could not activate core scene: {}", e),
        }

        log::info!("Core scene {} prepared for play mode", core_path);
        Ok(report)
    }

    fn entered_play_mode(&self, ctx: &mut TransitionContext<'_>) -> Result<TransitionReport, SessionError> {
        let mut report = TransitionReport::default();
        let working_set = keys::working_set(&*ctx.session);
        if working_set.is_empty() {
            return Ok(report);
        }

        let loaded = ctx.host.loaded_scenes();
        for path in &working_set {
            if loaded.contains(path) {
                continue;
            }
            if SceneOperations::open(&mut *ctx.host, &mut *ctx.operator, path, OpenMode::Additive) {
                report.loaded.push(path.clone());
            }
        }

        let core_path = self.core_scene_path(ctx.resolver);
        for path in ctx.host.loaded_scenes() {
            if core_path.as_ref() == Some(&path) || working_set.contains(&path) {
                continue;
            }
            if SceneOperations::close(&mut *ctx.host, &mut *ctx.operator, &path) {
                report.unloaded.push(path);
            }
        }

        keys::clear_working_set(&mut *ctx.session)?;
        ctx.session.flush()?;
        report.working_set_consumed = true;

        log::info!(
            "Play working set applied: {} loaded, {} unloaded",
            report.loaded.len(),
            report.unloaded.len()
        );
        Ok(report)
    }

    fn entered_edit_mode(&self, ctx: &mut TransitionContext<'_>) -> Result<TransitionReport, SessionError> {
        let mut report = TransitionReport::default();
        if !keys::unload_core_scene(&*ctx.session) {
            return Ok(report);
        }

        if let Some(core_path) = self.core_scene_path(ctx.resolver) {
            if SceneOperations::close(&mut *ctx.host, &mut *ctx.operator, &core_path) {
                report.unloaded.push(core_path);
            }
        }

        keys::set_unload_core_scene(&mut *ctx.session, false)?;
        ctx.session.flush()?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostMode, ScriptedOperator, SimulatedHost};
    use crate::identity::InMemoryAssetIndex;
    use crate::session::MemorySessionStore;

    fn index() -> InMemoryAssetIndex {
        let mut index = InMemoryAssetIndex::new();
        index.insert_scene("core", "Assets/Core.scene");
        index.insert_scene("menu", "Assets/Menu.scene");
        index.insert_scene("intro", "Assets/Intro.scene");
        index.insert_scene("hub", "Assets/Hub.scene");
        index
    }

    fn host() -> SimulatedHost {
        let mut host = SimulatedHost::new()
            .with_scene("Assets/Core.scene")
            .with_scene("Assets/Menu.scene")
            .with_scene("Assets/Intro.scene")
            .with_scene("Assets/Hub.scene");
        host.open_scene("Assets/Menu.scene", OpenMode::Replace).unwrap();
        host
    }

    fn enter_play(host: &mut SimulatedHost) {
        host.request_mode(HostMode::Play);
        host.complete_mode_change();
    }

    fn run(
        coordinator: &TransitionCoordinator,
        transition: ModeTransition,
        host: &mut SimulatedHost,
        session: &mut MemorySessionStore,
        index: &InMemoryAssetIndex,
    ) -> TransitionReport {
        let mut operator = ScriptedOperator::default();
        let mut ctx = TransitionContext { host, operator: &mut operator, session, resolver: index };
        coordinator.handle(transition, &mut ctx).unwrap()
    }

    #[test]
    fn test_exiting_edit_mode_loads_core_first_and_active() {
        let index = index();
        let mut host = host();
        let mut session = MemorySessionStore::new();
        let coordinator = TransitionCoordinator::new(CoreSceneConfig::enabled("core"));

        let report = run(&coordinator, ModeTransition::ExitingEditMode, &mut host, &mut session, &index);

        assert_eq!(report.loaded, vec!["Assets/Core.scene"]);
        assert!(report.core_scene_activated);
        assert_eq!(host.loaded_scenes(), vec!["Assets/Core.scene", "Assets/Menu.scene"]);
        assert_eq!(host.active_scene(), Some("Assets/Core.scene"));
        assert!(keys::unload_core_scene(&session));
    }

    #[test]
    fn test_already_loaded_core_does_not_set_flag() {
        let index = index();
        let mut host = host();
        host.open_scene("Assets/Core.scene", OpenMode::Additive).unwrap();
        let mut session = MemorySessionStore::new();
        let coordinator = TransitionCoordinator::new(CoreSceneConfig::enabled("core"));

        let report = run(&coordinator, ModeTransition::ExitingEditMode, &mut host, &mut session, &index);

        assert!(report.loaded.is_empty());
        assert_eq!(host.loaded_scenes()[0], "Assets/Core.scene");
        assert!(!keys::unload_core_scene(&session));
    }

    #[test]
    fn test_disabled_core_scene_is_ignored() {
        let index = index();
        let mut host = host();
        let mut session = MemorySessionStore::new();
        let coordinator = TransitionCoordinator::default();

        let report = run(&coordinator, ModeTransition::ExitingEditMode, &mut host, &mut session, &index);

        assert_eq!(report, TransitionReport::default());
        assert_eq!(host.loaded_scenes(), vec!["Assets/Menu.scene"]);
    }

    #[test]
    fn test_entered_play_mode_applies_working_set() {
        let index = index();
        let mut host = host();
        let mut session = MemorySessionStore::new();
        keys::set_working_set(&mut session, &["Assets/Intro.scene", "Assets/Hub.scene"]).unwrap();
        enter_play(&mut host);
        let coordinator = TransitionCoordinator::default();

        let report = run(&coordinator, ModeTransition::EnteredPlayMode, &mut host, &mut session, &index);

        assert_eq!(host.loaded_scenes(), vec!["Assets/Intro.scene", "Assets/Hub.scene"]);
        assert_eq!(report.unloaded, vec!["Assets/Menu.scene"]);
        assert!(report.working_set_consumed);
        assert!(keys::working_set(&session).is_empty());
    }

    #[test]
    fn test_working_set_keeps_core_scene() {
        let index = index();
        let mut host = host();
        host.open_scene("Assets/Core.scene", OpenMode::Additive).unwrap();
        let mut session = MemorySessionStore::new();
        keys::set_working_set(&mut session, &["Assets/Hub.scene"]).unwrap();
        enter_play(&mut host);
        let coordinator = TransitionCoordinator::new(CoreSceneConfig::enabled("core"));

        run(&coordinator, ModeTransition::EnteredPlayMode, &mut host, &mut session, &index);

        assert_eq!(host.loaded_scenes(), vec!["Assets/Core.scene", "Assets/Hub.scene"]);
    }

    #[test]
    fn test_empty_working_set_is_noop() {
        let index = index();
        let mut host = host();
        let mut session = MemorySessionStore::new();
        enter_play(&mut host);

        let report = run(
            &TransitionCoordinator::default(),
            ModeTransition::EnteredPlayMode,
            &mut host,
            &mut session,
            &index,
        );

        assert!(!report.working_set_consumed);
        assert_eq!(host.loaded_scenes(), vec!["Assets/Menu.scene"]);
    }

    #[test]
    fn test_entered_edit_mode_closes_core_and_resets_flag() {
        let index = index();
        let mut host = host();
        host.open_scene("Assets/Core.scene", OpenMode::Additive).unwrap();
        let mut session = MemorySessionStore::new();
        keys::set_unload_core_scene(&mut session, true).unwrap();
        let coordinator = TransitionCoordinator::new(CoreSceneConfig::enabled("core"));

        let report = run(&coordinator, ModeTransition::EnteredEditMode, &mut host, &mut session, &index);

        assert_eq!(report.unloaded, vec!["Assets/Core.scene"]);
        assert_eq!(host.loaded_scenes(), vec!["Assets/Menu.scene"]);
        assert!(!keys::unload_core_scene(&session));
    }

    #[test]
    fn test_exiting_play_mode_is_noop() {
        let index = index();
        let mut host = host();
        let mut session = MemorySessionStore::new();
        keys::set_unload_core_scene(&mut session, true).unwrap();

        let report = run(
            &TransitionCoordinator::new(CoreSceneConfig::enabled("core")),
            ModeTransition::ExitingPlayMode,
            &mut host,
            &mut session,
            &index,
        );

        assert_eq!(report, TransitionReport::default());
        assert!(keys::unload_core_scene(&session));
    }
}
