//! RigidBody - A solid body that moves as a unit
//!
//! Bodies are boxes (the bounding box of a renderable) or infinite planes
//! (walls). A body with zero mass is static: gravity, impulses and contacts
//! never move it. The same struct describes a body before it is added and
//! snapshots it afterwards.

mod body;

pub use body::{BodyHandle, RigidBody, Shape};
pub(crate) use body::{clamp_damping, damping_coefficient};
