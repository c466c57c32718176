//! Body–Mesh Registry
//!
//! Owns the pairing between simulated bodies and renderable objects. A pair
//! is created, updated and removed as one value, so the two sides cannot
//! drift apart the way parallel lists can.

use tracing::{debug, warn};

use crate::core::error::{SceneError, SceneResult};
use crate::domain::config::DegeneratePolicy;
use crate::domain::object::RenderableObject;
use crate::rigid_body::{BodyHandle, RigidBody};
use crate::rigid_body_system::RigidBodySystem;

/// Floats per pair in the transform buffer: position xyz + quaternion xyzw.
pub const TRANSFORM_STRIDE: usize = 7;

/// Stable identifier of a pair; never reused after removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairId(pub(crate) u32);

impl PairId {
    pub fn id(self) -> u32 {
        self.0
    }
}

/// A rigid body and the renderable that mirrors it.
#[derive(Clone, Debug)]
pub struct BodyMeshPair {
    id: PairId,
    body: BodyHandle,
    object: RenderableObject,
}

impl BodyMeshPair {
    pub fn id(&self) -> PairId {
        self.id
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn object(&self) -> &RenderableObject {
        &self.object
    }
}

pub struct BodyMeshRegistry {
    pairs: Vec<BodyMeshPair>,
    next_id: u32,
    restitution: f32,
    /// Packed transforms for the renderer, refreshed by `sync_all`.
    transforms: Vec<f32>,
}

impl BodyMeshRegistry {
    pub fn new(restitution: f32) -> Self {
        Self {
            pairs: Vec::new(),
            next_id: 1,
            restitution,
            transforms: Vec::new(),
        }
    }

    /// Create a box body matching `object`'s bounding box and pose.
    ///
    /// Fails with [`SceneError::DegenerateShape`] when the box has no volume.
    pub fn register(
        &mut self,
        world: &mut RigidBodySystem,
        object: RenderableObject,
        mass: f32,
    ) -> SceneResult<PairId> {
        if object.is_degenerate() {
            return Err(SceneError::degenerate_shape(object.name.clone(), object.size));
        }

        let mut body = RigidBody::new_box(object.position, object.orientation, object.half_extents(), mass);
        body.set_restitution(self.restitution);
        let handle = world.add_body(body);

        let id = PairId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        debug!(pair = id.0, body = handle.id(), name = %object.name, "registered body/mesh pair");
        self.pairs.push(BodyMeshPair { id, body: handle, object });
        self.write_transform(self.pairs.len() - 1);
        Ok(id)
    }

    /// [`register`](Self::register), applying `policy` to degenerate shapes.
    ///
    /// Returns `Ok(None)` when the object was skipped.
    pub fn register_with_policy(
        &mut self,
        world: &mut RigidBodySystem,
        mut object: RenderableObject,
        mass: f32,
        policy: DegeneratePolicy,
        min_extent: f32,
    ) -> SceneResult<Option<PairId>> {
        if !object.is_degenerate() {
            return self.register(world, object, mass).map(Some);
        }
        let err = SceneError::degenerate_shape(object.name.clone(), object.size);
        match policy {
            DegeneratePolicy::Skip => {
                warn!("{err}; skipping");
                Ok(None)
            }
            DegeneratePolicy::Substitute => {
                warn!("{err}; substituting minimum extent {min_extent}");
                let size = object.size;
                object.size = glam::Vec3::new(
                    clamp_extent(size.x, min_extent),
                    clamp_extent(size.y, min_extent),
                    clamp_extent(size.z, min_extent),
                );
                self.register(world, object, mass).map(Some)
            }
        }
    }

    /// Copy every body's pose into its renderable. Simulation → visuals only.
    pub fn sync_all(&mut self, world: &RigidBodySystem) {
        for idx in 0..self.pairs.len() {
            let pair = &mut self.pairs[idx];
            match world.body(pair.body) {
                Some(body) => {
                    pair.object.position = body.position;
                    pair.object.orientation = body.orientation;
                }
                None => {
                    debug!(pair = pair.id.0, "body missing from world; keeping last pose");
                }
            }
            self.write_transform(idx);
        }
    }

    /// Remove a pair and its body together.
    pub fn remove(&mut self, world: &mut RigidBodySystem, id: PairId) -> SceneResult<RenderableObject> {
        let idx = self
            .pairs
            .iter()
            .position(|p| p.id == id)
            .ok_or(SceneError::UnknownPair(id.0))?;
        let pair = self.pairs.remove(idx);
        world.remove_body(pair.body);
        self.rebuild_transforms();
        Ok(pair.object)
    }

    /// Remove every pair and its body.
    pub fn clear(&mut self, world: &mut RigidBodySystem) {
        for pair in self.pairs.drain(..) {
            world.remove_body(pair.body);
        }
        self.transforms.clear();
    }

    /// Drop pairs without touching a world (the world is being torn down).
    pub fn forget_all(&mut self) {
        self.pairs.clear();
        self.transforms.clear();
    }

    pub fn pairs(&self) -> &[BodyMeshPair] {
        &self.pairs
    }

    pub fn get(&self, id: PairId) -> Option<&BodyMeshPair> {
        self.pairs.iter().find(|p| p.id == id)
    }

    pub fn body_handles(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.pairs.iter().map(|p| p.body)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Packed `[px, py, pz, qx, qy, qz, qw]` per pair, in pair order.
    pub fn transforms(&self) -> &[f32] {
        &self.transforms
    }

    /// Get pointer to transform array (for JS rendering)
    pub fn transforms_ptr(&self) -> *const f32 {
        self.transforms.as_ptr()
    }

    fn write_transform(&mut self, idx: usize) {
        let needed = self.pairs.len() * TRANSFORM_STRIDE;
        if self.transforms.len() != needed {
            self.transforms.resize(needed, 0.0);
        }
        let object = &self.pairs[idx].object;
        let base = idx * TRANSFORM_STRIDE;
        self.transforms[base..base + 3].copy_from_slice(&object.position.to_array());
        self.transforms[base + 3..base + TRANSFORM_STRIDE].copy_from_slice(&object.orientation.to_array());
    }

    fn rebuild_transforms(&mut self) {
        self.transforms.clear();
        for idx in 0..self.pairs.len() {
            self.write_transform(idx);
        }
    }
}

fn clamp_extent(value: f32, min_extent: f32) -> f32 {
    if value.is_finite() { value.max(min_extent) } else { min_extent }
}
