//! The workbench service
//!
//! [`SceneWorkbench`] owns the registry, the load-state tracker, the build
//! mirror and the transition coordinator. The host constructs it once and
//! hands it the asset index and the durable session store. Host and operator
//! are borrowed per call, never stored.

use thiserror::Error;

use crate::build::{BuildMirror, BuildSyncReport};
use crate::config::{Config, ConfigError};
use crate::core::config::WorkbenchConfig;
use crate::events::{EventQueue, HostEvent};
use crate::host::{HostMode, OpenMode, Operator, SceneHost};
use crate::identity::{display_name_from_path, AssetId, AssetKind, IdentityResolver};
use crate::operations::{OperationOutcome, SceneOperations};
use crate::registry::{
    GroupList, Registry, RegistryDocument, RegistryEntry, RegistryError, RegistryRefresh,
};
use crate::session::{keys, SessionError, SessionStore};
use crate::tracker::{LoadStateTracker, LoadSummary};
use crate::transition::{ModeTransition, TransitionContext, TransitionCoordinator, TransitionReport};

/// Workbench errors
#[derive(Debug, Error)]
pub enum WorkbenchError {
    /// Reading or writing a document failed
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The configuration did not validate
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A registry edit was rejected
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The session store failed
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// The identifier does not resolve to an asset
    #[error("Unknown asset: {0}")]
    UnknownAsset(AssetId),
}

/// Result of [`SceneWorkbench::refresh`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Reconciliation changes per registry kind
    pub registry: RegistryRefresh,
    /// Load flags after the refresh
    pub load: LoadSummary,
}

/// Scene management service owned by the host
pub struct SceneWorkbench {
    config: WorkbenchConfig,
    resolver: Box<dyn IdentityResolver>,
    session: Box<dyn SessionStore>,
    registry: Registry,
    tracker: LoadStateTracker,
    build_mirror: BuildMirror,
    coordinator: TransitionCoordinator,
}

impl SceneWorkbench {
    /// Create the workbench, restoring the registry document if one is configured
    pub fn new(
        config: WorkbenchConfig,
        resolver: Box<dyn IdentityResolver>,
        session: Box<dyn SessionStore>,
    ) -> Result<Self, WorkbenchError> {
        config.validate().map_err(WorkbenchError::InvalidConfig)?;

        let registry = match &config.registry_path {
            Some(path) => {
                let document = RegistryDocument::load_or_default(path)?;
                Registry::from_document(document, &config.default_group_name, resolver.as_ref())
            }
            None => Registry::new(&config.default_group_name),
        };

        log::info!(
            "Scene workbench ready: {} scene groups, {} bundle groups",
            registry.scenes.len(),
            registry.bundles.len()
        );

        Ok(Self {
            coordinator: TransitionCoordinator::new(config.core_scene.clone()),
            config,
            resolver,
            session,
            registry,
            tracker: LoadStateTracker::new(),
            build_mirror: BuildMirror::new(),
        })
    }

    /// Workbench configuration
    pub fn config(&self) -> &WorkbenchConfig {
        &self.config
    }

    /// The scene and bundle registries
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Build inclusion state from the last sync
    pub fn build_mirror(&self) -> &BuildMirror {
        &self.build_mirror
    }

    /// Load-state tracker
    pub fn tracker(&self) -> &LoadStateTracker {
        &self.tracker
    }

    /// Durable session store
    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    /// Asset index
    pub fn resolver(&self) -> &dyn IdentityResolver {
        self.resolver.as_ref()
    }

    /// Reconcile with the asset index, sort, recompute load flags and persist
    pub fn refresh(&mut self, host: &dyn SceneHost) -> Result<RefreshReport, WorkbenchError> {
        let registry = self.registry.refresh(self.resolver.as_ref());
        self.registry.sort(self.config.sort_policy);
        let load = self.update_loaded_scenes(host, None);
        self.persist_if_dirty()?;

        Ok(RefreshReport { registry, load })
    }

    /// Sort both registry kinds with the configured policy
    pub fn sort(&mut self) {
        self.registry.sort(self.config.sort_policy);
    }

    /// Recompute load flags; `unloading_slot` is treated as already gone
    pub fn update_loaded_scenes(&mut self, host: &dyn SceneHost, unloading_slot: Option<usize>) -> LoadSummary {
        self.tracker
            .update_loaded_scenes(&mut self.registry, self.resolver.as_ref(), host, unloading_slot)
    }

    /// Rebuild the build mirror from the host's build configuration
    pub fn sync_build_settings(&mut self, host: &dyn SceneHost) -> BuildSyncReport {
        self.build_mirror.sync(&host.build_scenes(), self.resolver.as_ref())
    }

    /// Apply a search query to entry and group visibility
    pub fn apply_filter(&mut self, query: &str) {
        self.registry.apply_filter(query);
    }

    /// Mutate the registry and persist the result
    ///
    /// The edit is all-or-nothing: if the closure fails, the registry is
    /// restored to its state before the call.
    ///
    /// ```rust,ignore
    /// let levels = workbench.edit_registry(|registry| registry.scenes.add_group("Levels"))?;
    /// ```
    pub fn edit_registry<R>(
        &mut self,
        edit: impl FnOnce(&mut Registry) -> Result<R, RegistryError>,
    ) -> Result<R, WorkbenchError> {
        let snapshot = self.registry.clone();
        let result = match edit(&mut self.registry) {
            Ok(result) => result,
            Err(e) => {
                log::debug!("Registry edit rejected, changes rolled back: {}", e);
                self.registry = snapshot;
                return Err(e.into());
            }
        };
        self.persist_if_dirty()?;
        Ok(result)
    }

    /// Register an asset in the default group of its kind
    ///
    /// Returns `false` if it was already registered.
    pub fn add_entry(&mut self, kind: AssetKind, id: &AssetId) -> Result<bool, WorkbenchError> {
        let resolver = self.resolver.as_ref();
        let added = match kind {
            AssetKind::Scene => register(&mut self.registry.scenes, resolver, id)?,
            AssetKind::Bundle => register(&mut self.registry.bundles, resolver, id)?,
        };
        self.persist_if_dirty()?;
        Ok(added)
    }

    /// Remove an entry from whichever group holds it
    pub fn remove_entry(&mut self, kind: AssetKind, id: &AssetId) -> Result<(), WorkbenchError> {
        let removed = match kind {
            AssetKind::Scene => self.registry.scenes.remove_entry(id).is_some(),
            AssetKind::Bundle => self.registry.bundles.remove_entry(id).is_some(),
        };
        if !removed {
            return Err(RegistryError::EntryNotFound(id.clone()).into());
        }
        self.persist_if_dirty()
    }

    /// Write the registry document if a path is configured
    ///
    /// Returns `false` when no path is configured.
    pub fn save_registry(&mut self) -> Result<bool, WorkbenchError> {
        let Some(path) = &self.config.registry_path else {
            return Ok(false);
        };

        self.registry.to_document().save_to_file(path)?;
        self.registry.clear_dirty();
        log::debug!("Registry saved to {}", path);
        Ok(true)
    }

    fn persist_if_dirty(&mut self) -> Result<(), WorkbenchError> {
        if self.registry.is_dirty() {
            self.save_registry()?;
        }
        Ok(())
    }

    /// Open a scene; `false` when nothing changed
    pub fn open_scene(
        &mut self,
        host: &mut dyn SceneHost,
        operator: &mut dyn Operator,
        path: &str,
        mode: OpenMode,
    ) -> bool {
        self.open_scene_with_outcome(host, operator, path, mode).succeeded()
    }

    /// Open a scene and report what happened
    pub fn open_scene_with_outcome(
        &mut self,
        host: &mut dyn SceneHost,
        operator: &mut dyn Operator,
        path: &str,
        mode: OpenMode,
    ) -> OperationOutcome {
        let outcome = SceneOperations::open_with_outcome(host, operator, path, mode);
        self.after_operation(host, &outcome);
        outcome
    }

    /// Ask the operator for an open mode, then open the scene
    pub fn open_scene_interactive(
        &mut self,
        host: &mut dyn SceneHost,
        operator: &mut dyn Operator,
        path: &str,
    ) -> bool {
        let outcome = SceneOperations::open_interactive(host, operator, path);
        self.after_operation(host, &outcome);
        outcome.succeeded()
    }

    /// Close a scene; `false` when nothing changed, including cancellation
    pub fn close_scene(&mut self, host: &mut dyn SceneHost, operator: &mut dyn Operator, path: &str) -> bool {
        self.close_scene_with_outcome(host, operator, path).succeeded()
    }

    /// Close a scene and report what happened
    pub fn close_scene_with_outcome(
        &mut self,
        host: &mut dyn SceneHost,
        operator: &mut dyn Operator,
        path: &str,
    ) -> OperationOutcome {
        let outcome = SceneOperations::close_with_outcome(host, operator, path);
        self.after_operation(host, &outcome);
        outcome
    }

    fn after_operation(&mut self, host: &dyn SceneHost, outcome: &OperationOutcome) {
        if outcome.succeeded() {
            self.update_loaded_scenes(host, None);
        }
    }

    /// Enter play mode with a single scene as the working set
    pub fn request_play_scene(&mut self, host: &mut dyn SceneHost, id: &AssetId) -> Result<(), WorkbenchError> {
        let path = self
            .resolver
            .resolved_path(id)
            .ok_or_else(|| WorkbenchError::UnknownAsset(id.clone()))?;
        self.request_play(host, &[path])
    }

    /// Enter play mode with every member of a bundle as the working set
    pub fn request_play_bundle(&mut self, host: &mut dyn SceneHost, id: &AssetId) -> Result<(), WorkbenchError> {
        if self.resolver.resolved_path(id).is_none() {
            return Err(WorkbenchError::UnknownAsset(id.clone()));
        }

        let paths: Vec<String> = self
            .resolver
            .bundle_members(id)
            .iter()
            .filter_map(|member| self.resolver.resolved_path(member))
            .collect();
        self.request_play(host, &paths)
    }

    fn request_play(&mut self, host: &mut dyn SceneHost, paths: &[String]) -> Result<(), WorkbenchError> {
        keys::set_working_set(self.session.as_mut(), paths)?;
        self.session.flush()?;

        log::info!("Requesting play mode with {} scene(s)", paths.len());
        host.request_mode(HostMode::Play);
        Ok(())
    }

    /// Run the coordinator for a host mode transition
    pub fn handle_transition(
        &mut self,
        transition: ModeTransition,
        host: &mut dyn SceneHost,
        operator: &mut dyn Operator,
    ) -> Result<TransitionReport, WorkbenchError> {
        self.update_loaded_scenes(host, None);

        let mut ctx = TransitionContext {
            host: &mut *host,
            operator,
            session: self.session.as_mut(),
            resolver: self.resolver.as_ref(),
        };
        let report = self.coordinator.handle(transition, &mut ctx)?;

        self.update_loaded_scenes(host, None);
        Ok(report)
    }

    /// Route one host event to the recomputation it requires
    pub fn handle_event(
        &mut self,
        event: HostEvent,
        host: &mut dyn SceneHost,
        operator: &mut dyn Operator,
    ) -> Result<(), WorkbenchError> {
        if event.refreshes_load_state() {
            let unloading_slot = match event {
                HostEvent::SceneUnloading { slot } => Some(slot),
                _ => None,
            };
            self.update_loaded_scenes(host, unloading_slot);
            return Ok(());
        }

        match event {
            HostEvent::ModeChanged(transition) => {
                self.handle_transition(transition, host, operator)?;
            }
            HostEvent::AssetsChanged => {
                self.refresh(host)?;
                self.sync_build_settings(host);
            }
            HostEvent::BuildSettingsChanged => {
                self.sync_build_settings(host);
            }
            _ => {}
        }
        Ok(())
    }

    /// Drain and handle every queued event, in order
    ///
    /// A failing event does not stop the rest of the queue; the first error
    /// is returned after everything has been handled.
    pub fn pump(
        &mut self,
        queue: &mut EventQueue,
        host: &mut dyn SceneHost,
        operator: &mut dyn Operator,
    ) -> Result<usize, WorkbenchError> {
        let events = queue.drain();
        let count = events.len();
        let mut first_error = None;

        for event in events {
            if let Err(e) = self.handle_event(event, host, operator) {
                log::error!("Event handling failed: {}", e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(count),
        }
    }
}

fn register<T: RegistryEntry>(
    list: &mut GroupList<T>,
    resolver: &dyn IdentityResolver,
    id: &AssetId,
) -> Result<bool, WorkbenchError> {
    let path = resolver
        .resolved_path(id)
        .filter(|_| resolver.discover(T::KIND).contains(id))
        .ok_or_else(|| WorkbenchError::UnknownAsset(id.clone()))?;

    Ok(list.add_entry(T::new(id.clone(), display_name_from_path(&path))))
}
