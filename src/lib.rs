//! Tumble Engine - viewport-bounded rigid bodies for pointer-driven 3D scenes
//!
//! Keeps a small set of rigid bodies in lockstep with their renderables,
//! walls them in at the edges of the viewport, and steers gravity from the
//! pointer.
//!
//! Architecture:
//! - core/        - Errors and the RNG
//! - domain/      - Config, loaded objects, scene-graph seam
//! - systems/     - Physics world, registry, walls, gravity, impulses
//! - simulation/  - `SceneCore` context and the wasm facade
//! - runtime/     - Browser event and frame loop (wasm32 only)

pub mod core;
pub mod domain;
pub mod systems;
pub mod simulation;
#[cfg(target_arch = "wasm32")]
pub mod runtime;

pub use systems::gravity;
pub use systems::impulse;
pub use systems::registry;
pub use systems::rigid_body;
pub use systems::rigid_body_system;
pub use systems::walls;

use wasm_bindgen::prelude::*;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine: panic hook, tracing subscriber, banner.
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    // A second init keeps the first subscriber.
    #[cfg(target_arch = "wasm32")]
    tracing_wasm::try_set_as_global_default().ok();

    web_sys::console::log_1(&"🦀 Tumble WASM Engine initialized!".into());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use crate::core::error::{SceneError, SceneResult};
pub use domain::config::SceneConfig;
pub use simulation::{Scene, SceneCore};
#[cfg(target_arch = "wasm32")]
pub use runtime::SceneRuntime;
