//! Wall Manager
//!
//! Walls are never mutated in place. Every viewport change disposes the old
//! visuals, drops the old wall bodies and builds a fresh set, so a rebuild
//! always starts from a clean slate and repeated calls cannot accumulate
//! stale walls. Only wall handles are touched; registered bodies keep theirs.

mod layout;

pub use layout::{clamp_extent, compute_layout, half_extents, WallPlacement, WallSide, MIN_VIEWPORT_EXTENT};

use tracing::debug;

use crate::core::error::{SceneError, SceneResult};
use crate::domain::config::SceneConfig;
use crate::domain::scene_graph::{NodeId, SceneGraph, SceneRef, WallVisual};
use crate::rigid_body::{BodyHandle, RigidBody};
use crate::rigid_body_system::RigidBodySystem;

/// One boundary wall: placement, its visual node and (once a world exists)
/// its static plane body.
#[derive(Clone, Debug)]
pub struct Wall {
    placement: WallPlacement,
    node: NodeId,
    attached: bool,
    body: Option<BodyHandle>,
}

impl Wall {
    pub fn placement(&self) -> &WallPlacement {
        &self.placement
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    fn visual(&self) -> WallVisual {
        WallVisual {
            node: self.node,
            size: self.placement.size,
            position: self.placement.position,
            orientation: self.placement.orientation,
        }
    }
}

pub struct WallManager {
    walls: Vec<Wall>,
    next_node: NodeId,
    /// Attach visuals to the scene (debug view)
    visible: bool,
    /// Nodes disposed while no scene graph was available.
    pending_dispose: Vec<NodeId>,
    viewport: (f32, f32),
}

impl WallManager {
    pub fn new(visible: bool) -> Self {
        Self {
            walls: Vec::new(),
            next_node: 1,
            visible,
            pending_dispose: Vec::new(),
            viewport: (0.0, 0.0),
        }
    }

    /// Rebuild every wall for a `width` × `height` viewport.
    ///
    /// Geometry is always computed. Without a scene graph, visuals stay
    /// pending until [`attach_pending`](Self::attach_pending); without a
    /// world, bodies wait for [`attach_bodies`](Self::attach_bodies).
    /// Returns the number of walls.
    pub fn rebuild(
        &mut self,
        width: f32,
        height: f32,
        config: &SceneConfig,
        mut scene: SceneRef<'_>,
        mut world: Option<&mut RigidBodySystem>,
    ) -> usize {
        // 1-2. dispose and clear
        for wall in std::mem::take(&mut self.walls) {
            match scene.as_deref_mut() {
                Some(scene) => {
                    if wall.attached {
                        scene.remove(wall.node);
                    }
                    scene.dispose(wall.node);
                }
                None => self.pending_dispose.push(wall.node),
            }
            if let (Some(world), Some(handle)) = (world.as_deref_mut(), wall.body) {
                world.remove_body(handle);
            }
        }

        // 3. placements
        self.viewport = (clamp_extent(width), clamp_extent(height));
        for placement in compute_layout(width, height, config) {
            let node = self.next_node;
            self.next_node = self.next_node.saturating_add(1);
            self.walls.push(Wall {
                placement,
                node,
                attached: false,
                body: None,
            });
        }

        // 4. fresh static bodies
        if let Some(world) = world {
            self.attach_bodies(world);
        }
        if let Some(scene) = scene {
            self.flush_visuals(scene);
        }

        debug!(
            width = self.viewport.0,
            height = self.viewport.1,
            walls = self.walls.len(),
            "rebuilt walls"
        );
        self.walls.len()
    }

    /// Create bodies for walls built before the physics world existed.
    pub fn attach_bodies(&mut self, world: &mut RigidBodySystem) -> usize {
        let mut added = 0;
        for wall in self.walls.iter_mut().filter(|w| w.body.is_none()) {
            let body = RigidBody::new_plane(wall.placement.position, wall.placement.orientation);
            wall.body = Some(world.add_body(body));
            added += 1;
        }
        added
    }

    /// Wall bodies require a world; reports the missing world instead of guessing.
    pub fn try_attach_bodies(&mut self, world: Option<&mut RigidBodySystem>) -> SceneResult<usize> {
        world
            .map(|world| self.attach_bodies(world))
            .ok_or(SceneError::UninitializedWorld)
    }

    /// Flush deferred disposals and attach visuals once a scene graph exists.
    pub fn attach_pending(&mut self, scene: &mut (dyn SceneGraph + 'static)) {
        self.flush_visuals(scene);
    }

    /// Take every visual out of a scene graph that is being replaced. The
    /// walls are re-added by the next [`attach_pending`](Self::attach_pending).
    pub fn detach_visuals(&mut self, scene: &mut (dyn SceneGraph + 'static)) {
        for node in self.pending_dispose.drain(..) {
            scene.dispose(node);
        }
        for wall in self.walls.iter_mut() {
            if wall.attached {
                scene.remove(wall.node);
                wall.attached = false;
            }
            scene.dispose(wall.node);
        }
    }

    /// Show or hide wall visuals.
    pub fn set_visible(&mut self, visible: bool, scene: SceneRef<'_>) {
        self.visible = visible;
        let Some(scene) = scene else {
            return;
        };
        if visible {
            self.flush_visuals(scene);
        } else {
            for wall in self.walls.iter_mut().filter(|w| w.attached) {
                scene.remove(wall.node);
                wall.attached = false;
            }
        }
    }

    /// Dispose every visual and body. The manager is empty afterwards.
    pub fn teardown(&mut self, mut scene: SceneRef<'_>, mut world: Option<&mut RigidBodySystem>) {
        for wall in std::mem::take(&mut self.walls) {
            if let Some(scene) = scene.as_deref_mut() {
                if wall.attached {
                    scene.remove(wall.node);
                }
                scene.dispose(wall.node);
            }
            if let (Some(world), Some(handle)) = (world.as_deref_mut(), wall.body) {
                world.remove_body(handle);
            }
        }
        if let Some(scene) = scene {
            for node in self.pending_dispose.drain(..) {
                scene.dispose(node);
            }
        }
        self.pending_dispose.clear();
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Handles of the walls that currently have bodies.
    pub fn wall_bodies(&self) -> Vec<BodyHandle> {
        self.walls.iter().filter_map(|w| w.body).collect()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Viewport (clamped) of the last rebuild.
    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    fn flush_visuals(&mut self, scene: &mut (dyn SceneGraph + 'static)) {
        for node in self.pending_dispose.drain(..) {
            scene.dispose(node);
        }
        if !self.visible {
            return;
        }
        for wall in self.walls.iter_mut().filter(|w| !w.attached) {
            scene.add(&wall.visual());
            wall.attached = true;
        }
    }
}
