//! Browser runtime (wasm32 only)
//!
//! Wires `window` events, decay timeouts and the animation-frame loop to a
//! [`Scene`]. Every callback holds a `Weak` to the runtime state, so dropping
//! the runtime releases the closures.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::{error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, MouseEvent, Window};

use crate::simulation::{JsSceneGraph, Scene};

type Listener = Closure<dyn FnMut(Event)>;

struct RuntimeState {
    scene: Scene,
    window: Window,
    draw: js_sys::Function,
    running: Cell<bool>,
    raf_handle: Cell<Option<i32>>,
    decay_handle: Cell<Option<i32>>,
    frame_cb: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    decay_cb: RefCell<Option<Closure<dyn FnMut(u32)>>>,
    listeners: RefCell<Vec<(&'static str, Listener)>>,
}

impl RuntimeState {
    fn now_ms(&self) -> f64 {
        self.window
            .performance()
            .map_or_else(js_sys::Date::now, |p| p.now())
    }

    fn viewport(&self) -> (f32, f32) {
        let width = self.window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = self.window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (width as f32, height as f32)
    }

    fn on_resize(&self) {
        let (width, height) = self.viewport();
        if let Err(err) = self.scene.resize(width, height) {
            warn!("resize: {err:?}");
        }
    }

    fn on_pointer_move(&self, event: &MouseEvent) {
        let now = self.now_ms();
        let Some(timer) = self
            .scene
            .pointer_move(event.client_x() as f32, event.client_y() as f32, now)
        else {
            return;
        };
        self.arm_decay(timer);
    }

    /// Replace the pending JS timeout with one for `timer`.
    fn arm_decay(&self, timer: u32) {
        self.clear_decay();
        let delay = self.scene.decay_ms() as i32;
        let cb = self.decay_cb.borrow();
        let Some(cb) = cb.as_ref() else {
            return;
        };
        match self.window.set_timeout_with_callback_and_timeout_and_arguments_1(
            cb.as_ref().unchecked_ref(),
            delay,
            &JsValue::from(timer),
        ) {
            Ok(handle) => self.decay_handle.set(Some(handle)),
            Err(err) => warn!("setTimeout failed: {err:?}"),
        }
    }

    fn clear_decay(&self) {
        if let Some(handle) = self.decay_handle.take() {
            self.window.clear_timeout_with_handle(handle);
        }
    }

    fn tick(&self, _ts: f64) {
        self.raf_handle.set(None);
        if !self.running.get() {
            return;
        }
        if let Err(err) = self.scene.frame(self.now_ms()) {
            warn!("frame skipped: {err:?}");
        }
        if let Err(err) = self.draw.call0(&JsValue::NULL) {
            error!("draw callback failed: {err:?}");
        }
        self.request_frame();
    }

    fn request_frame(&self) {
        let cb = self.frame_cb.borrow();
        let Some(cb) = cb.as_ref() else {
            return;
        };
        match self.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(handle) => self.raf_handle.set(Some(handle)),
            Err(err) => error!("requestAnimationFrame failed: {err:?}"),
        }
    }

    fn listen(&self, kind: &'static str, listener: Listener) -> Result<(), JsValue> {
        self.window
            .add_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())?;
        self.listeners.borrow_mut().push((kind, listener));
        Ok(())
    }

    /// Cancel the loop, the decay timeout and every listener.
    fn detach(&self) {
        self.running.set(false);
        if let Some(handle) = self.raf_handle.take() {
            if let Err(err) = self.window.cancel_animation_frame(handle) {
                warn!("cancelAnimationFrame failed: {err:?}");
            }
        }
        self.clear_decay();
        for (kind, listener) in self.listeners.borrow().iter() {
            if let Err(err) = self
                .window
                .remove_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())
            {
                warn!("removeEventListener({kind}) failed: {err:?}");
            }
        }
    }
}

impl Drop for RuntimeState {
    fn drop(&mut self) {
        if self.running.get() {
            self.detach();
        }
    }
}

/// Drives one scene in the page until [`stop`](SceneRuntime::stop).
#[wasm_bindgen]
pub struct SceneRuntime {
    state: Rc<RuntimeState>,
}

#[wasm_bindgen]
impl SceneRuntime {
    /// Attach `js_scene`, size the walls to the window, hook up input and
    /// start the frame loop. `draw` is called after every frame.
    pub fn start(scene: &Scene, js_scene: JsSceneGraph, draw: js_sys::Function) -> Result<SceneRuntime, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        scene.attach_scene_graph(js_scene);

        let state = Rc::new(RuntimeState {
            scene: scene.clone(),
            window,
            draw,
            running: Cell::new(true),
            raf_handle: Cell::new(None),
            decay_handle: Cell::new(None),
            frame_cb: RefCell::new(None),
            decay_cb: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        });
        let weak = Rc::downgrade(&state);

        *state.frame_cb.borrow_mut() = Some(Closure::new(with_state(&weak, |s, ts: f64| s.tick(ts))));
        *state.decay_cb.borrow_mut() = Some(Closure::new(with_state(&weak, |s, timer: u32| {
            s.decay_handle.set(None);
            s.scene.fire_decay(timer);
        })));

        state.listen("resize", Closure::new(with_state(&weak, |s, _: Event| s.on_resize())))?;
        state.listen(
            "mousemove",
            Closure::new(with_state(&weak, |s, event: Event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    s.on_pointer_move(event);
                }
            })),
        )?;
        state.listen(
            "click",
            Closure::new(with_state(&weak, |s, _: Event| {
                s.scene.click();
            })),
        )?;

        state.on_resize();
        state.request_frame();
        info!("scene runtime started");
        Ok(SceneRuntime { state })
    }

    /// Stop the loop, detach listeners and tear the scene down.
    pub fn stop(&self) {
        if !self.state.running.get() {
            return;
        }
        self.state.detach();
        self.state.scene.teardown();
        info!("scene runtime stopped");
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.state.running.get()
    }
}

/// Adapt a callback on the runtime state into one that survives the state
/// being dropped.
fn with_state<A: 'static>(
    weak: &Weak<RuntimeState>,
    f: impl Fn(&RuntimeState, A) + 'static,
) -> impl FnMut(A) + 'static {
    let weak = weak.clone();
    move |arg| {
        if let Some(state) = weak.upgrade() {
            f(&state, arg);
        }
    }
}
