use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::core::error::{SceneError, SceneResult};
use crate::domain::config::SceneConfig;
use crate::domain::object::LoadedScene;
use crate::gravity::TimerId;

use super::js_scene::JsSceneGraph;
use super::perf_stats::StepStats;
use super::step::FrameOutcome;
use super::viewport::OrthoBounds;
use super::SceneCore;

fn to_js(err: SceneError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Camera frustum handed to the JS orthographic camera.
#[wasm_bindgen]
#[derive(Clone, Copy)]
pub struct CameraBounds {
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
    near: f32,
    far: f32,
}

impl From<OrthoBounds> for CameraBounds {
    fn from(b: OrthoBounds) -> Self {
        Self {
            left: b.left,
            right: b.right,
            top: b.top,
            bottom: b.bottom,
            near: b.near,
            far: b.far,
        }
    }
}

#[wasm_bindgen]
impl CameraBounds {
    #[wasm_bindgen(getter)]
    pub fn left(&self) -> f32 { self.left }
    #[wasm_bindgen(getter)]
    pub fn right(&self) -> f32 { self.right }
    #[wasm_bindgen(getter)]
    pub fn top(&self) -> f32 { self.top }
    #[wasm_bindgen(getter)]
    pub fn bottom(&self) -> f32 { self.bottom }
    #[wasm_bindgen(getter)]
    pub fn near(&self) -> f32 { self.near }
    #[wasm_bindgen(getter)]
    pub fn far(&self) -> f32 { self.far }
}

/// JS handle to a scene. Clones share the same context, so the browser
/// runtime and page code can drive one scene together.
#[wasm_bindgen]
#[derive(Clone)]
pub struct Scene {
    core: Rc<RefCell<SceneCore>>,
    /// Viewport that arrived while the context was borrowed.
    pending_resize: Rc<Cell<Option<(f32, f32)>>>,
}

impl Scene {
    pub fn from_core(core: SceneCore) -> Self {
        Self {
            core: Rc::new(RefCell::new(core)),
            pending_resize: Rc::new(Cell::new(None)),
        }
    }

    /// Read-only access to the context from Rust code.
    pub fn inspect<T>(&self, f: impl FnOnce(&SceneCore) -> T) -> Option<T> {
        self.core.try_borrow().ok().map(|core| f(&core))
    }

    /// Run `f` on the context unless it is already borrowed further up
    /// the call stack (a JS callback re-entering the scene).
    fn with_core<T>(&self, f: impl FnOnce(&mut SceneCore) -> T) -> Option<T> {
        match self.core.try_borrow_mut() {
            Ok(mut core) => Some(f(&mut core)),
            Err(_) => {
                warn!("scene is busy; call dropped");
                None
            }
        }
    }

    /// Resize now, or queue the size for the next frame when the context is
    /// already borrowed (a resize event fired during a wall rebuild).
    pub fn try_resize(&self, width: f32, height: f32) -> SceneResult<OrthoBounds> {
        let Ok(mut core) = self.core.try_borrow_mut() else {
            self.pending_resize.set(Some((width, height)));
            warn!("{}; queued {width}x{height}", SceneError::ResizeRace);
            return Err(SceneError::ResizeRace);
        };
        core.resize(width, height).map(|outcome| outcome.camera)
    }

    /// Apply a resize queued by [`try_resize`](Scene::try_resize).
    pub(crate) fn apply_pending_resize(&self, core: &mut SceneCore) {
        if let Some((width, height)) = self.pending_resize.take() {
            if let Err(err) = core.resize(width, height) {
                warn!("queued resize failed: {err}");
            }
        }
    }
}

#[wasm_bindgen]
impl Scene {
    /// Create a scene. `config_json` may override any subset of the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<Scene, JsValue> {
        let config = match config_json {
            Some(json) => SceneConfig::from_json(&json).map_err(to_js)?,
            None => SceneConfig::default(),
        };
        Ok(Self::from_core(SceneCore::new(config)))
    }

    /// Hand over the renderer's scene graph for wall visuals.
    pub fn attach_scene_graph(&self, scene: JsSceneGraph) {
        self.with_core(|core| core.attach_scene_graph(Box::new(scene)));
    }

    /// Asset barrier. Returns the number of registered objects.
    pub fn load_assets(&self, json: String) -> Result<u32, JsValue> {
        let assets = LoadedScene::from_json(&json).map_err(to_js)?;
        let report = self
            .with_core(|core| core.on_assets_loaded(assets))
            .ok_or_else(|| JsValue::from_str("scene is busy"))?
            .map_err(to_js)?;
        Ok(report.registered as u32)
    }

    /// Rebuild walls for the new viewport and return the camera frustum.
    ///
    /// A resize that arrives while the scene is mid-rebuild is queued and
    /// applied on the next frame.
    pub fn resize(&self, width: f32, height: f32) -> Result<CameraBounds, JsValue> {
        self.try_resize(width, height)
            .map(CameraBounds::from)
            .map_err(to_js)
    }

    /// Pointer moved. Returns the id of the newly armed decay timer.
    pub fn pointer_move(&self, client_x: f32, client_y: f32, now_ms: f64) -> Option<u32> {
        self.with_core(|core| core.pointer_move(client_x, client_y, now_ms))
            .flatten()
            .map(|arm| arm.armed.id())
    }

    /// Click impulse. Returns the number of bodies hit.
    pub fn click(&self) -> u32 {
        self.with_core(|core| core.click() as u32).unwrap_or(0)
    }

    pub fn fire_decay(&self, timer_id: u32) -> bool {
        self.with_core(|core| core.fire_decay(TimerId(timer_id)))
            .unwrap_or(false)
    }

    /// Advance one frame. Returns `true` when the world was stepped.
    pub fn frame(&self, now_ms: f64) -> Result<bool, JsValue> {
        let Ok(mut core) = self.core.try_borrow_mut() else {
            return Ok(false);
        };
        self.apply_pending_resize(&mut core);
        let outcome = core.frame(now_ms).map_err(to_js)?;
        Ok(outcome == FrameOutcome::Stepped)
    }

    /// Dispose everything. Returns the decay timer the host must clear.
    pub fn teardown(&self) -> Option<u32> {
        self.with_core(|core| core.teardown())
            .flatten()
            .map(TimerId::id)
    }

    pub fn set_follow_mouse(&self, enabled: bool) {
        self.with_core(|core| core.set_follow_mouse(enabled));
    }

    pub fn set_update_physics(&self, enabled: bool) {
        self.with_core(|core| core.set_update_physics(enabled));
    }

    pub fn set_debug(&self, enabled: bool) {
        self.with_core(|core| core.set_debug(enabled));
    }

    /// Enable or disable per-frame timings (adds overhead when enabled)
    pub fn enable_perf_metrics(&self, enabled: bool) {
        self.with_core(|core| core.enable_perf_metrics(enabled));
    }

    pub fn get_perf_stats(&self) -> StepStats {
        self.with_core(|core| core.get_perf_stats()).unwrap_or_default()
    }

    #[wasm_bindgen(getter)]
    pub fn frame_count(&self) -> u64 {
        self.with_core(|core| core.frame_count()).unwrap_or(0)
    }

    /// Idle time before pointer gravity resets
    #[wasm_bindgen(getter)]
    pub fn decay_ms(&self) -> f64 {
        self.with_core(|core| core.config().decay_ms).unwrap_or(0.0)
    }

    #[wasm_bindgen(getter)]
    pub fn object_count(&self) -> u32 {
        self.with_core(|core| core.registry().len() as u32).unwrap_or(0)
    }

    #[wasm_bindgen(getter)]
    pub fn wall_count(&self) -> u32 {
        self.with_core(|core| core.walls().len() as u32).unwrap_or(0)
    }

    /// Name of the object at `idx` in transform order
    pub fn object_name(&self, idx: usize) -> Option<String> {
        self.with_core(|core| core.registry().pairs().get(idx).map(|p| p.object().name.clone()))
            .flatten()
    }

    /// Get pointer to the packed transform array (for JS rendering)
    pub fn transforms_ptr(&self) -> *const f32 {
        self.with_core(|core| core.registry().transforms_ptr())
            .unwrap_or(std::ptr::null())
    }

    /// Transform array length in floats
    pub fn transforms_len(&self) -> usize {
        self.with_core(|core| core.transforms().len()).unwrap_or(0)
    }

    /// `[x, y, z]` of the anchored object
    pub fn anchor_position(&self) -> Option<Vec<f32>> {
        self.with_core(|core| core.anchor().map(|a| a.position.to_array().to_vec()))
            .flatten()
    }
}
