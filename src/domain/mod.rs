//! Domain types: scene configuration, renderables and the scene graph seam

pub mod config;
pub mod object;
pub mod scene_graph;
