pub mod gravity;
pub mod impulse;
pub mod registry;
pub mod rigid_body;
pub mod rigid_body_system;
pub mod walls;
