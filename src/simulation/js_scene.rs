use wasm_bindgen::prelude::*;

use crate::domain::scene_graph::{NodeId, SceneGraph, WallVisual};

#[wasm_bindgen]
extern "C" {
    /// Scene graph object supplied by the JS renderer.
    ///
    /// `addWall` receives `[sx, sy, sz, px, py, pz, qx, qy, qz, qw]`.
    pub type JsSceneGraph;

    #[wasm_bindgen(method, js_name = addWall)]
    fn add_wall(this: &JsSceneGraph, node: u32, transform: &[f32]);

    #[wasm_bindgen(method, js_name = removeWall)]
    fn remove_wall(this: &JsSceneGraph, node: u32);

    #[wasm_bindgen(method, js_name = disposeWall)]
    fn dispose_wall(this: &JsSceneGraph, node: u32);
}

impl SceneGraph for JsSceneGraph {
    fn add(&mut self, visual: &WallVisual) {
        let mut transform = [0.0f32; 10];
        transform[0..3].copy_from_slice(&visual.size.to_array());
        transform[3..6].copy_from_slice(&visual.position.to_array());
        transform[6..10].copy_from_slice(&visual.orientation.to_array());
        self.add_wall(visual.node, &transform);
    }

    fn remove(&mut self, node: NodeId) {
        self.remove_wall(node);
    }

    fn dispose(&mut self, node: NodeId) {
        self.dispose_wall(node);
    }
}
