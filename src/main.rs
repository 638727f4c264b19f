//! Process entry point: boots the engine subsystems in the order Design
//! Notes §9 prescribes (`arena → logger → threads → material → input`,
//! omitting the OS/asset/profiler stages that are out of scope for this
//! crate) and then hands off to whatever project `scene.json`/`input.json`
//! describe. No window is opened and no Vulkan device is created; this is
//! the runnable shell around the library crate's reusable subsystems.

use std::env;

use anyhow::Context;

use forge_engine::config::{self, EngineConfig};
use forge_engine::input::InputSystem;
use forge_engine::logger::{self, SeverityMask};
use forge_engine::material::{MasterMaterialTable, MaterialInstanceTable, ShaderCache};
use forge_engine::memory::MemoryArena;
use forge_engine::scene::{self, ProjectRoot};
use forge_engine::threading::ThreadPool;

const DEFAULT_PROJECT: &str = "demo";
const MAX_MASTER_MATERIALS: usize = 256;
const MAX_MATERIAL_INSTANCES: usize = 4096;
const MATERIAL_DESCRIPTOR_CAPACITY: u32 = 4096;
const MAX_INPUT_ACTIONS: u32 = 256;

fn boot() -> anyhow::Result<()> {
    let argv0 = env::current_exe().context("resolving the executable path for project discovery")?;
    let project = ProjectRoot::discover(&argv0);

    let (config_status, config) = config::load(project.root());
    log::info!("engine.config load status: {:?}, using {:?}", config_status, config);

    let mut boot_arena = MemoryArena::create("boot", 64 * 1024 * 1024).context("reserving the boot arena")?;
    let _scope = boot_arena.scope();

    let pool = ThreadPool::new();
    logger::init(project.root().join("engine.log"), SeverityMask::ALL, Some(pool.clone()));
    log::info!("logger initialized, thread pool started");

    let shaders = ShaderCache::new().context("initializing the shader effect cache")?;
    let materials = MasterMaterialTable::new(shaders, MAX_MASTER_MATERIALS);
    let instances = MaterialInstanceTable::new(MAX_MATERIAL_INSTANCES, MATERIAL_DESCRIPTOR_CAPACITY);
    log::info!(
        "material system initialized ({} masters, {} instances in use)",
        materials.len(),
        instances.len()
    );

    let mut input = InputSystem::init_input_system(MAX_INPUT_ACTIONS);
    input.create_channel("gameplay");
    log::info!("input system initialized");

    let scene_path = project.scene_json(DEFAULT_PROJECT);
    match scene::load_scene_json(&scene_path) {
        Ok(scene_json) => {
            log::info!(
                "loaded scene '{}' ({} objects, {} lights)",
                scene_json.scene.scene_name,
                scene_json.scene.scene_objects.len(),
                scene_json.scene.lights.len()
            );
        }
        Err(err) => {
            log::warn!("no scene loaded from {}: {}", scene_path.display(), err);
        }
    }

    let (width, height) = window_size(&config);
    log::info!("boot sequence complete, configured window {}x{}", width, height);

    let _ = (materials, instances, pool, input);
    Ok(())
}

fn window_size(config: &EngineConfig) -> (u32, u32) {
    (config.window_size_x, config.window_size_y)
}

fn main() -> anyhow::Result<()> {
    boot().context("engine boot sequence failed")
}
