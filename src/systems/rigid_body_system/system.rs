use std::num::NonZeroUsize;

use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::{
    CCDSolver, ColliderBuilder, ColliderSet, DefaultBroadPhase, ImpulseJointSet,
    IntegrationParameters, IslandManager, Isometry, MultibodyJointSet, NarrowPhase,
    PhysicsPipeline, Real, RigidBodyBuilder, RigidBodyHandle, RigidBodySet, Rotation, Vector,
};
use tracing::debug;

use crate::rigid_body::{clamp_damping, damping_coefficient, BodyHandle, RigidBody, Shape};

/// One registered body: our handle, the solver's handle and the
/// description it was built from.
struct BodySlot {
    handle: BodyHandle,
    inner: RigidBodyHandle,
    desc: RigidBody,
}

/// Manages all rigid bodies in the simulation
pub struct RigidBodySystem {
    slots: Vec<BodySlot>,
    next_id: u32,
    gravity: Vec3,

    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl RigidBodySystem {
    pub fn new(solver_iterations: u32) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.num_solver_iterations =
            NonZeroUsize::new(solver_iterations as usize).unwrap_or(NonZeroUsize::MIN);

        Self {
            slots: Vec::new(),
            next_id: 1,
            gravity: Vec3::ZERO,
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Add a body and return its handle.
    ///
    /// Zero-mass descriptions become fixed bodies. Dynamic bodies never
    /// sleep, so a gravity change reaches them on the next step.
    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        let pose = Isometry::from_parts(to_vector(body.position).into(), to_rotation(body.orientation));
        let builder = if body.is_static() {
            RigidBodyBuilder::fixed()
        } else {
            RigidBodyBuilder::dynamic()
                .linvel(to_vector(body.velocity))
                .angvel(to_vector(body.angular_velocity))
                .linear_damping(damping_coefficient(body.linear_damping))
                .angular_damping(damping_coefficient(body.angular_damping))
                .can_sleep(false)
                .ccd_enabled(true)
        };
        let inner = self.rigid_body_set.insert(builder.position(pose).build());

        let collider = match body.shape {
            Shape::Box { half_extents } => {
                let builder = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z);
                if body.is_static() { builder } else { builder.mass(body.mass) }
            }
            Shape::Plane => ColliderBuilder::halfspace(Vector::<Real>::z_axis()),
        }
        .restitution(body.restitution)
        .friction(body.friction)
        .build();
        self.collider_set
            .insert_with_parent(collider, inner, &mut self.rigid_body_set);

        let handle = BodyHandle(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.slots.push(BodySlot {
            handle,
            inner,
            desc: body,
        });
        handle
    }

    /// Remove a body by handle. Returns `false` for unknown handles.
    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        let Some(idx) = self.index_of(handle) else {
            return false;
        };
        let slot = self.slots.swap_remove(idx);
        self.rigid_body_set.remove(
            slot.inner,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        true
    }

    /// Remove every body. Handles are not recycled.
    pub fn clear(&mut self) {
        let handles: Vec<BodyHandle> = self.slots.iter().map(|s| s.handle).collect();
        for handle in handles {
            self.remove_body(handle);
        }
    }

    /// Snapshot of a body's current state.
    pub fn body(&self, handle: BodyHandle) -> Option<RigidBody> {
        let slot = self.slot(handle)?;
        let live = self.rigid_body_set.get(slot.inner)?;
        Some(RigidBody {
            position: from_vector(live.translation()),
            orientation: from_rotation(live.rotation()),
            velocity: from_vector(live.linvel()),
            angular_velocity: from_vector(live.angvel()),
            ..slot.desc.clone()
        })
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.index_of(handle).is_some()
    }

    pub fn body_count(&self) -> usize {
        self.slots.len()
    }

    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    pub fn solver_iterations(&self) -> u32 {
        self.integration_parameters.num_solver_iterations.get() as u32
    }

    /// Set linear velocity. Returns `false` for unknown handles.
    pub fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec3) -> bool {
        self.with_inner(handle, |body| body.set_linvel(to_vector(velocity), true))
    }

    pub fn set_angular_velocity(&mut self, handle: BodyHandle, angular_velocity: Vec3) -> bool {
        self.with_inner(handle, |body| body.set_angvel(to_vector(angular_velocity), true))
    }

    /// Set angular damping as a per-second loss fraction in [0, 1].
    pub fn set_angular_damping(&mut self, handle: BodyHandle, damping: f32) -> bool {
        let damping = clamp_damping(damping);
        let Some(idx) = self.index_of(handle) else {
            return false;
        };
        self.slots[idx].desc.angular_damping = damping;
        self.with_inner(handle, |body| body.set_angular_damping(damping_coefficient(damping)))
    }

    /// Teleport a body. Works for fixed bodies too.
    pub fn set_position(&mut self, handle: BodyHandle, position: Vec3) -> bool {
        self.with_inner(handle, |body| body.set_translation(to_vector(position), true))
    }

    pub fn set_pose(&mut self, handle: BodyHandle, position: Vec3, orientation: Quat) -> bool {
        self.with_inner(handle, |body| {
            body.set_translation(to_vector(position), true);
            body.set_rotation(to_rotation(orientation), true);
        })
    }

    /// Advance the world by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        if !(dt > 0.0) {
            debug!(dt, "ignoring non-positive time step");
            return;
        }
        self.integration_parameters.dt = dt;

        let gravity = to_vector(self.gravity);
        self.physics_pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    fn with_inner(&mut self, handle: BodyHandle, f: impl FnOnce(&mut rapier3d::prelude::RigidBody)) -> bool {
        let Some(inner) = self.slot(handle).map(|s| s.inner) else {
            return false;
        };
        match self.rigid_body_set.get_mut(inner) {
            Some(body) => {
                f(body);
                true
            }
            None => false,
        }
    }

    fn slot(&self, handle: BodyHandle) -> Option<&BodySlot> {
        self.slots.iter().find(|s| s.handle == handle)
    }

    fn index_of(&self, handle: BodyHandle) -> Option<usize> {
        self.slots.iter().position(|s| s.handle == handle)
    }
}

fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn to_rotation(q: Quat) -> Rotation<Real> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

fn from_rotation(r: &Rotation<Real>) -> Quat {
    let c = r.coords;
    Quat::from_xyzw(c.x, c.y, c.z, c.w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn floor_world() -> RigidBodySystem {
        let mut world = RigidBodySystem::new(10);
        world.add_body(RigidBody::new_plane(Vec3::ZERO, Quat::from_rotation_x(-FRAC_PI_2)));
        world
    }

    #[test]
    fn handles_are_not_reused_after_removal() {
        let mut world = RigidBodySystem::new(10);
        let a = world.add_body(RigidBody::new_box(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE, 1.0));
        assert!(world.remove_body(a));
        let b = world.add_body(RigidBody::new_box(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE, 1.0));
        assert_ne!(a, b);
        assert!(world.body(a).is_none());
        assert!(!world.remove_body(a));
        assert!(!world.set_velocity(a, Vec3::X));
    }

    #[test]
    fn removal_keeps_other_handles_valid() {
        let mut world = RigidBodySystem::new(10);
        let a = world.add_body(RigidBody::new_box(Vec3::X, Quat::IDENTITY, Vec3::ONE, 1.0));
        let b = world.add_body(RigidBody::new_box(Vec3::Y, Quat::IDENTITY, Vec3::ONE, 1.0));
        let c = world.add_body(RigidBody::new_box(Vec3::Z, Quat::IDENTITY, Vec3::ONE, 1.0));
        world.remove_body(a);
        assert_eq!(world.body(b).map(|b| b.position), Some(Vec3::Y));
        assert_eq!(world.body(c).map(|b| b.position), Some(Vec3::Z));
        assert_eq!(world.body_count(), 2);
    }

    #[test]
    fn clear_empties_world() {
        let mut world = floor_world();
        world.add_body(RigidBody::new_box(Vec3::Y, Quat::IDENTITY, Vec3::ONE, 1.0));
        world.clear();
        assert_eq!(world.body_count(), 0);
        world.step(1.0 / 60.0);
    }

    #[test]
    fn solver_iterations_are_at_least_one() {
        assert_eq!(RigidBodySystem::new(0).solver_iterations(), 1);
        assert_eq!(RigidBodySystem::new(10).solver_iterations(), 10);
    }

    #[test]
    fn snapshot_round_trips_pose() {
        let mut world = RigidBodySystem::new(10);
        let spin = Quat::from_rotation_y(0.7);
        let cube = world.add_body(RigidBody::new_box(Vec3::new(1.0, 2.0, 3.0), spin, Vec3::ONE, 5.0));
        let body = world.body(cube).unwrap();
        assert_relative_eq!(body.position.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(body.position.z, 3.0, epsilon = 1e-6);
        assert!(body.orientation.dot(spin).abs() > 0.9999);
        assert_eq!(body.mass, 5.0);
    }

    #[test]
    fn box_comes_to_rest_on_floor() {
        let mut world = floor_world();
        world.set_gravity(Vec3::new(0.0, -100.0, 0.0));
        let cube = world.add_body(RigidBody::new_box(
            Vec3::new(0.0, 5.0, 0.0),
            Quat::IDENTITY,
            Vec3::splat(0.5),
            100.0,
        ));
        for _ in 0..600 {
            world.step(1.0 / 60.0);
        }
        let body = world.body(cube).unwrap();
        assert!(body.position.y > 0.4 && body.position.y < 0.6, "y = {}", body.position.y);
    }

    #[test]
    fn tilted_box_topples_onto_a_face() {
        let mut world = floor_world();
        world.set_gravity(Vec3::new(0.0, -100.0, 0.0));
        let cube = world.add_body(RigidBody::new_box(
            Vec3::new(0.0, 2.0, 0.0),
            Quat::from_rotation_z(0.3),
            Vec3::splat(0.5),
            100.0,
        ));

        let mut max_spin: f32 = 0.0;
        for _ in 0..1200 {
            world.step(1.0 / 60.0);
            max_spin = max_spin.max(world.body(cube).unwrap().angular_velocity.length());
        }

        let body = world.body(cube).unwrap();
        assert!(max_spin > 0.1, "edge contact never produced spin");
        // Some local axis points straight up once it lies flat.
        let up = [Vec3::X, Vec3::Y, Vec3::Z]
            .iter()
            .map(|axis| (body.orientation * *axis).y.abs())
            .fold(0.0_f32, f32::max);
        assert!(up > 0.99, "still tilted, up = {up}");
        assert!(body.position.y > 0.4 && body.position.y < 0.6, "y = {}", body.position.y);
    }

    #[test]
    fn static_box_ignores_gravity() {
        let mut world = RigidBodySystem::new(10);
        world.set_gravity(Vec3::new(0.0, -100.0, 0.0));
        let anchor = world.add_body(RigidBody::new_box(Vec3::Y, Quat::IDENTITY, Vec3::ONE, 0.0));
        for _ in 0..30 {
            world.step(1.0 / 60.0);
        }
        assert_eq!(world.body(anchor).unwrap().position, Vec3::Y);
        assert!(world.set_position(anchor, Vec3::X));
        assert_eq!(world.body(anchor).unwrap().position, Vec3::X);
    }

    #[test]
    fn zero_gravity_leaves_bodies_in_place() {
        let mut world = floor_world();
        let cube = world.add_body(RigidBody::new_box(
            Vec3::new(0.0, 5.0, 0.0),
            Quat::IDENTITY,
            Vec3::splat(0.5),
            100.0,
        ));
        for _ in 0..60 {
            world.step(1.0 / 60.0);
        }
        let body = world.body(cube).unwrap();
        assert_relative_eq!(body.position.y, 5.0, epsilon = 1e-5);
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn angular_damping_decays_spin() {
        let mut world = RigidBodySystem::new(10);
        let cube = world.add_body(RigidBody::new_box(Vec3::ZERO, Quat::IDENTITY, Vec3::splat(0.5), 1.0));
        world.set_angular_damping(cube, 0.5);
        world.set_angular_velocity(cube, Vec3::new(0.0, 30.0, 0.0));
        for _ in 0..60 {
            world.step(1.0 / 60.0);
        }
        let body = world.body(cube).unwrap();
        // One second at 0.5 loss roughly halves the spin.
        assert!(body.angular_velocity.y > 13.0 && body.angular_velocity.y < 17.0, "w = {}", body.angular_velocity.y);
        assert_eq!(body.angular_damping, 0.5);
    }

    #[test]
    fn non_positive_dt_is_ignored() {
        let mut world = floor_world();
        world.set_gravity(Vec3::new(0.0, -10.0, 0.0));
        let cube = world.add_body(RigidBody::new_box(Vec3::Y * 5.0, Quat::IDENTITY, Vec3::ONE, 1.0));
        world.step(0.0);
        world.step(f32::NAN);
        assert_eq!(world.body(cube).unwrap().velocity, Vec3::ZERO);
    }
}
