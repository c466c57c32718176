//! RigidBodySystem - the physics world behind the scene
//!
//! A thin layer over rapier3d. Boxes become cuboid colliders, walls become
//! halfspaces on fixed bodies. The rest of the crate only steps it,
//! adds/removes bodies, sets velocities and reads transforms back through
//! its own [`BodyHandle`](crate::rigid_body::BodyHandle)s.
//!
//! `time_step` drives the solver's `dt` and `solver_iterations` its
//! iteration count. Damping is given as a per-second loss fraction and
//! converted to rapier's coefficient on the way in.

mod system;

pub use system::RigidBodySystem;
