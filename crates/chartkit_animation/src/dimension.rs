//! Animatable dimensions
//!
//! The set is closed: a chart animates its horizontal reveal, its vertical
//! growth, and an optional magnitude (bar height, bubble radius, slice angle).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;

/// An independently animated attribute of a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Primary (horizontal) axis
    X,
    /// Secondary (vertical) axis
    Y,
    /// Per-entry magnitude
    Magnitude,
}

impl Dimension {
    /// Every dimension, in declaration order
    pub const ALL: [Dimension; 3] = [Dimension::X, Dimension::Y, Dimension::Magnitude];

    /// Lowercase name used in config files and logs
    pub fn name(self) -> &'static str {
        match self {
            Dimension::X => "x",
            Dimension::Y => "y",
            Dimension::Magnitude => "magnitude",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dimension {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" | "horizontal" => Ok(Dimension::X),
            "y" | "vertical" => Ok(Dimension::Y),
            "magnitude" => Ok(Dimension::Magnitude),
            _ => Err(AnimationError::UnknownDimension(s.to_string())),
        }
    }
}
