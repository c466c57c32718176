//! Error types for scene operations.
//!
//! Every variant is recoverable at the scene level: callers log and keep the
//! render loop alive.

use glam::Vec3;
use thiserror::Error;

/// Result type alias for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors raised by the registry, wall manager and step driver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    /// Renderable has a zero-volume bounding box.
    #[error("degenerate shape `{name}`: bounding size {size} has zero volume")]
    DegenerateShape { name: String, size: Vec3 },

    /// Step or wall-body update before the physics world exists.
    #[error("physics world is not initialized yet")]
    UninitializedWorld,

    /// Viewport changed while a wall rebuild was still holding the scene.
    #[error("resize arrived during a wall rebuild")]
    ResizeRace,

    /// Assets were delivered a second time for the same scene.
    #[error("scene assets already loaded")]
    AlreadyLoaded,

    /// Scene was torn down; no further mutation is accepted.
    #[error("scene has been torn down")]
    TornDown,

    /// No pair with this id is registered.
    #[error("unknown body/mesh pair {0}")]
    UnknownPair(u32),

    /// Invalid or unparseable configuration.
    #[error("invalid config: {0}")]
    Config(String),
}

impl SceneError {
    /// Create a degenerate shape error.
    #[must_use]
    pub fn degenerate_shape(name: impl Into<String>, size: Vec3) -> Self {
        Self::DegenerateShape { name: name.into(), size }
    }

    /// Create a config error.
    #[must_use]
    pub fn config(details: impl Into<String>) -> Self {
        Self::Config(details.into())
    }
}
