//! Scene workbench demo host
//!
//! Drives the workbench through a full edit → play → edit cycle against a
//! simulated editor. The workbench is dropped and rebuilt at every mode
//! switch, the way a real editor wipes memory at the reload boundary; only
//! the session file carries state across.
//!
//! Usage: `workbench_demo [config.toml|config.ron]`

use scene_workbench::foundation::logging;
use scene_workbench::prelude::*;
use scene_workbench::session::{keys, open_store};

const CORE: &str = "Assets/Scenes/Core.scene";
const MENU: &str = "Assets/Scenes/Menu.scene";
const INTRO: &str = "Assets/Scenes/Intro.scene";
const HUB: &str = "Assets/Scenes/Hub.scene";
const ARENA: &str = "Assets/Scenes/Arena.scene";

struct DemoApp {
    config: WorkbenchConfig,
    host: SimulatedHost,
    operator: ScriptedOperator,
    workbench: Option<SceneWorkbench>,
}

impl DemoApp {
    fn new(config: WorkbenchConfig) -> Self {
        let mut host = SimulatedHost::new();
        for path in [CORE, MENU, INTRO, HUB, ARENA] {
            host.add_scene(path);
        }
        host.set_build_scenes(vec![
            BuildSceneEntry::new(CORE, true),
            BuildSceneEntry::new(MENU, true),
            BuildSceneEntry::new(INTRO, true),
            BuildSceneEntry::new(HUB, false),
        ]);

        Self { config, host, operator: ScriptedOperator::default(), workbench: None }
    }

    fn project_index() -> InMemoryAssetIndex {
        let mut index = InMemoryAssetIndex::new();
        index.insert_scene("core", CORE);
        index.insert_scene("menu", MENU);
        index.insert_scene("intro", INTRO);
        index.insert_scene("hub", HUB);
        index.insert_scene("arena", ARENA);
        index.insert_bundle(
            "campaign",
            "Assets/Bundles/Campaign.bundle",
            vec![AssetId::new("intro"), AssetId::new("hub")],
        );
        index
    }

    /// Build a fresh workbench, as the host does after every reload
    fn reload(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.workbench = None;

        let session = open_store(self.config.session_path.as_deref())?;
        let mut workbench = SceneWorkbench::new(self.config.clone(), Box::new(Self::project_index()), session)?;
        let report = workbench.refresh(&self.host)?;
        log::info!(
            "Registry refreshed: {} scenes added, {} bundles added",
            report.registry.scenes.added.len(),
            report.registry.bundles.added.len()
        );

        self.workbench = Some(workbench);
        Ok(())
    }

    fn pump(&mut self) -> Result<usize, Box<dyn std::error::Error>> {
        let Some(workbench) = self.workbench.as_mut() else {
            return Ok(0);
        };
        let mut events = self.host.take_events();
        Ok(workbench.pump(&mut events, &mut self.host, &mut self.operator)?)
    }

    fn print_registry(&self) {
        let Some(workbench) = self.workbench.as_ref() else {
            return;
        };

        for group in workbench.registry().scenes.groups() {
            log::info!("[{}]", group.name);
            for entry in &group.entries {
                let shipping = if workbench.build_mirror().contains(&entry.id) { "build" } else { "-" };
                log::info!("  {:<8} loaded={:<5} {}", entry.display_name, entry.is_loaded, shipping);
            }
        }
        for group in workbench.registry().bundles.groups() {
            for bundle in &group.entries {
                log::info!("  bundle {} loaded={}", bundle.display_name, bundle.is_loaded);
            }
        }
    }

    fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.reload()?;
        self.pump()?;

        let host = &mut self.host;
        let operator = &mut self.operator;
        let Some(workbench) = self.workbench.as_mut() else {
            return Ok(());
        };

        workbench.open_scene(host, operator, MENU, OpenMode::Replace);
        workbench.open_scene(host, operator, ARENA, OpenMode::Additive);
        host.mark_modified(ARENA);
        if !workbench.close_scene(host, operator, ARENA) {
            log::warn!("Arena stayed open");
        }

        let levels = workbench.edit_registry(|registry| registry.scenes.add_group("Levels"))?;
        workbench.edit_registry(|registry| {
            registry.scenes.move_entry(&AssetId::new("intro"), 0, levels)?;
            registry.scenes.move_entry(&AssetId::new("hub"), 0, levels)
        })?;
        workbench.sort();
        self.print_registry();

        // Edit → play
        let Some(workbench) = self.workbench.as_mut() else {
            return Ok(());
        };
        workbench.request_play_bundle(&mut self.host, &AssetId::new("campaign"))?;
        log::info!("Working set: {:?}", keys::working_set(workbench.session()));
        self.pump()?;

        self.workbench = None;
        self.host.complete_mode_change();
        self.reload()?;
        self.pump()?;
        self.pump()?;
        log::info!("Play mode scenes: {:?}", self.host.loaded_scenes());
        self.print_registry();

        // Play → edit
        self.host.request_mode(HostMode::Edit);
        self.pump()?;
        self.workbench = None;
        self.host.complete_mode_change();
        self.reload()?;
        self.pump()?;
        self.pump()?;
        log::info!("Edit mode scenes: {:?}", self.host.loaded_scenes());
        self.print_registry();

        Ok(())
    }
}

fn load_config() -> Result<WorkbenchConfig, Box<dyn std::error::Error>> {
    let mut config = match std::env::args().nth(1) {
        Some(path) => WorkbenchConfig::load_from_file(&path)?,
        None => WorkbenchConfig::default().with_core_scene("core"),
    };

    if config.session_path.is_none() {
        let session = std::env::temp_dir().join("workbench_demo").join("session.ron");
        config.session_path = Some(session.to_string_lossy().into_owned());
    }
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    logging::init_with_filter(&config.log_level);

    log::info!("Starting scene workbench demo");
    let mut app = DemoApp::new(config);
    app.run()?;
    log::info!("Demo finished");
    Ok(())
}
