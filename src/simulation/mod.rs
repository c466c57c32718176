//! Scene - physics/render synchronization context
//!
//! `SceneCore` owns everything one interactive scene needs: the physics
//! world, the body/mesh registry, the walls and the pointer-gravity state.
//! Input, viewport and frame handling live in the submodules; the wasm
//! facade and the browser runtime only forward to this type.

use crate::domain::config::SceneConfig;
use crate::domain::object::{LoadedScene, RenderableObject};
use crate::domain::scene_graph::SceneGraph;
use crate::core::error::SceneResult;
use crate::gravity::{DecayArm, PointerGravity, TimerId};
use crate::registry::BodyMeshRegistry;
use crate::rigid_body::BodyHandle;
use crate::rigid_body_system::RigidBodySystem;
use crate::walls::WallManager;

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
#[path = "init/teardown.rs"]
mod teardown;
#[path = "input/input.rs"]
mod input;
#[path = "viewport/viewport.rs"]
mod viewport;
#[path = "step/step.rs"]
mod step;
mod facade;
mod js_scene;

pub use facade::{CameraBounds, Scene};
pub use init::LoadReport;
pub use perf_stats::StepStats;
pub use step::FrameOutcome;
pub use viewport::{OrthoBounds, ResizeOutcome};
pub use js_scene::JsSceneGraph;

use perf_timer::PerfTimer;

/// The static object pinned to the top-left corner.
pub(crate) struct Anchor {
    object: RenderableObject,
    body: Option<BodyHandle>,
}

impl Anchor {
    pub fn object(&self) -> &RenderableObject {
        &self.object
    }
}

/// One scene's application context
pub struct SceneCore {
    config: SceneConfig,
    world: Option<RigidBodySystem>,
    registry: BodyMeshRegistry,
    walls: WallManager,
    gravity: PointerGravity,
    anchor: Option<Anchor>,
    scene: Option<Box<dyn SceneGraph>>,

    // State
    viewport: (f32, f32),
    loaded: bool,
    torn_down: bool,
    frame: u64,
    rng_state: u32,

    // Perf metrics
    perf_enabled: bool,
    perf_stats: StepStats,
}

impl SceneCore {
    pub fn new(config: SceneConfig) -> Self {
        init::create_scene_core(config)
    }

    /// Parse and validate a JSON config, then build the context.
    pub fn from_config_json(json: &str) -> SceneResult<Self> {
        Ok(Self::new(SceneConfig::from_json(json)?))
    }

    /// Hand over the scene graph walls are drawn into.
    pub fn attach_scene_graph(&mut self, scene: Box<dyn SceneGraph>) {
        init::attach_scene_graph(self, scene)
    }

    /// One-time barrier: create the world and register every loaded object.
    pub fn on_assets_loaded(&mut self, assets: LoadedScene) -> SceneResult<LoadReport> {
        init::on_assets_loaded(self, assets)
    }

    /// Release walls, bodies and the armed decay timer.
    ///
    /// Returns the timer the host has to clear.
    pub fn teardown(&mut self) -> Option<TimerId> {
        teardown::teardown(self)
    }

    // === INPUT ===

    pub fn pointer_move(&mut self, client_x: f32, client_y: f32, now_ms: f64) -> Option<DecayArm> {
        input::pointer_move(self, client_x, client_y, now_ms)
    }

    /// Click: spin and throw every dynamic body, then drop pointer gravity.
    pub fn click(&mut self) -> usize {
        input::click(self)
    }

    /// A host timer fired. Only the armed id has an effect.
    pub fn fire_decay(&mut self, id: TimerId) -> bool {
        input::fire_decay(self, id)
    }

    /// Fire the armed decay timer if its deadline passed.
    pub fn poll_decay(&mut self, now_ms: f64) -> bool {
        input::poll_decay(self, now_ms)
    }

    // === VIEWPORT ===

    pub fn resize(&mut self, width: f32, height: f32) -> SceneResult<ResizeOutcome> {
        viewport::resize(self, width, height)
    }

    // === STEP ===

    /// Advance one rendered frame.
    pub fn frame(&mut self, now_ms: f64) -> SceneResult<FrameOutcome> {
        step::frame(self, now_ms)
    }

    // === SETTINGS ===

    pub fn set_follow_mouse(&mut self, enabled: bool) {
        settings::set_follow_mouse(self, enabled);
    }

    pub fn set_update_physics(&mut self, enabled: bool) {
        settings::set_update_physics(self, enabled);
    }

    /// Show or hide the wall visuals.
    pub fn set_debug(&mut self, enabled: bool) {
        settings::set_debug(self, enabled);
    }

    /// Enable or disable per-frame timing (adds overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled);
    }

    /// Last frame's stats (timings stay zero when perf is disabled)
    pub fn get_perf_stats(&self) -> StepStats {
        settings::get_perf_stats(self)
    }

    // === ACCESSORS ===

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn world(&self) -> Option<&RigidBodySystem> {
        self.world.as_ref()
    }

    pub fn registry(&self) -> &BodyMeshRegistry {
        &self.registry
    }

    pub fn walls(&self) -> &WallManager {
        &self.walls
    }

    pub fn gravity(&self) -> &PointerGravity {
        &self.gravity
    }

    pub fn anchor(&self) -> Option<&RenderableObject> {
        self.anchor.as_ref().map(Anchor::object)
    }

    pub fn anchor_body(&self) -> Option<BodyHandle> {
        self.anchor.as_ref().and_then(|a| a.body)
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Packed transforms, see [`BodyMeshRegistry::transforms`].
    pub fn transforms(&self) -> &[f32] {
        self.registry.transforms()
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
