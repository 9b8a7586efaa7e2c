//! chartkit.toml handling
//!
//! ```toml
//! [animation]
//! x_duration = 1.0
//! y_duration = 1.5
//! easing_x = "ease-out-cubic"
//! easing_y = "ease-in-out-quad"
//!
//! [render]
//! frame_rate = 60
//! bars = 12
//! ```

use anyhow::{Context, Result};
use chartkit_animation::EasingOption;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "chartkit.toml";

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChartkitConfig {
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Timeline settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Seconds for the horizontal sweep
    pub x_duration: f64,
    /// Seconds for the vertical grow
    pub y_duration: f64,
    pub easing_x: EasingOption,
    pub easing_y: EasingOption,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            x_duration: 1.0,
            y_duration: 1.5,
            easing_x: EasingOption::EaseOutCubic,
            easing_y: EasingOption::EaseInOutQuad,
        }
    }
}

impl AnimationConfig {
    /// Reject durations the animator would silently clamp
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [("x_duration", self.x_duration), ("y_duration", self.y_duration)] {
            if !value.is_finite() || value < 0.0 {
                anyhow::bail!("{} must be a non-negative number of seconds, got {}", key, value);
            }
        }
        Ok(())
    }
}

/// Terminal view settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    pub frame_rate: u32,
    pub bars: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            bars: 12,
        }
    }
}

impl ChartkitConfig {
    /// Load from `path`, or from `chartkit.toml` in the working directory
    ///
    /// An explicit path must exist; the implicit file is optional and falls
    /// back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file {} does not exist", path.display());
                }
                Self::load_file(path)
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load_file(path)
                } else {
                    tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: ChartkitConfig = toml::from_str(content)?;
        config.animation.validate()?;
        if config.render.frame_rate == 0 {
            anyhow::bail!("frame_rate must be at least 1");
        }
        Ok(config)
    }
}
