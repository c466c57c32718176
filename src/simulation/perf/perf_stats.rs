use wasm_bindgen::prelude::*;

#[wasm_bindgen]
#[derive(Clone, Debug, Default)]
pub struct StepStats {
    pub(super) step_ms: f64,
    pub(super) sync_ms: f64,
    pub(super) body_count: u32,
    pub(super) wall_count: u32,
    pub(super) frame: u32,
}

impl StepStats {
    pub(crate) fn reset(&mut self) {
        *self = StepStats::default();
    }
}

#[wasm_bindgen]
impl StepStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    #[wasm_bindgen(getter)]
    pub fn sync_ms(&self) -> f64 { self.sync_ms }
    #[wasm_bindgen(getter)]
    pub fn body_count(&self) -> u32 { self.body_count }
    #[wasm_bindgen(getter)]
    pub fn wall_count(&self) -> u32 { self.wall_count }
    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u32 { self.frame }
}
