//! Animation error types

use thiserror::Error;

use crate::dimension::Dimension;

/// Errors surfaced at the engine's call boundary
///
/// The engine itself never fails once a request has been accepted; these
/// only come out of strict entry points (`try_animate`) and name parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Duration was negative, NaN or infinite
    #[error("invalid duration {duration} for the {dimension} dimension")]
    InvalidDuration { dimension: Dimension, duration: f64 },

    /// Name did not match any dimension
    #[error("unknown dimension: {0}")]
    UnknownDimension(String),

    /// Name did not match any easing preset
    #[error("unknown easing preset: {0}")]
    UnknownEasing(String),
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
