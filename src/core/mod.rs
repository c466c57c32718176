//! Core utilities shared by every system

pub mod error;
pub mod random;
