//! Seam to the external scene graph.
//!
//! The core never draws. It only adds and removes the wall visuals it owns;
//! the renderer reads registry transforms on its own.

use glam::{Quat, Vec3};

/// Identifier of a node the core created in the scene graph.
pub type NodeId = u32;

/// A wall mesh: a thin box of `size` placed at `position`/`orientation`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallVisual {
    pub node: NodeId,
    pub size: Vec3,
    pub position: Vec3,
    pub orientation: Quat,
}

pub trait SceneGraph {
    /// Attach a wall visual.
    fn add(&mut self, visual: &WallVisual);

    /// Detach a node; it may be attached again later.
    fn remove(&mut self, node: NodeId);

    /// Release the node's geometry and material. The id is never used again.
    fn dispose(&mut self, node: NodeId);
}

/// Borrowed scene graph, absent while the renderer is not up yet.
pub type SceneRef<'a> = Option<&'a mut (dyn SceneGraph + 'static)>;
