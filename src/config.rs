//! Runtime configuration for the UI core
//!
//! Loaded from a JSON file by the CLI, or built from defaults. Every field is
//! optional in the file.

use crate::animation;
use crate::logger::VerbosityLevel;
use crate::{Result, UiError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Slowest animation speed accepted, other than 0 (no waiting)
pub const MIN_ANIMATION_SPEED: f64 = 0.01;

fn default_speed() -> f64 {
    1.0
}

fn default_auto_confirm_pause_ms() -> u64 {
    3000
}

fn default_reveal_pacing_ms() -> u64 {
    400
}

fn default_zoom_steps() -> Vec<f64> {
    vec![0.5, 0.625, 0.75, 0.875, 1.0, 1.25, 1.5]
}

fn default_zoom_index() -> usize {
    4
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub verbosity: VerbosityLevel,

    /// Animation speed factor: 2.0 halves every wait, 0 disables waiting
    #[serde(default = "default_speed")]
    pub animation_speed: f64,

    /// Pause before an automatic turn confirmation fires
    #[serde(default = "default_auto_confirm_pause_ms")]
    pub auto_confirm_pause_ms: u64,

    /// Delay between postcards revealed one by one in the guide
    #[serde(default = "default_reveal_pacing_ms")]
    pub reveal_pacing_ms: u64,

    /// Allowed zoom factors, ascending
    #[serde(default = "default_zoom_steps")]
    pub zoom_steps: Vec<f64>,

    /// Zoom step used when the player has no stored preference
    #[serde(default = "default_zoom_index")]
    pub default_zoom_index: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            verbosity: VerbosityLevel::default(),
            animation_speed: default_speed(),
            auto_confirm_pause_ms: default_auto_confirm_pause_ms(),
            reveal_pacing_ms: default_reveal_pacing_ms(),
            zoom_steps: default_zoom_steps(),
            default_zoom_index: default_zoom_index(),
        }
    }
}

impl UiConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: UiConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall or break playback
    pub fn validate(&self) -> Result<()> {
        let speed = self.animation_speed;
        if !speed.is_finite() || speed < 0.0 || (speed > 0.0 && speed < MIN_ANIMATION_SPEED) {
            return Err(UiError::InvalidArgs(format!(
                "animation_speed must be 0 or a finite value of at least {MIN_ANIMATION_SPEED}, got {speed}"
            )));
        }
        if self.zoom_steps.is_empty() {
            return Err(UiError::InvalidArgs("zoom_steps must not be empty".into()));
        }
        Ok(())
    }

    pub fn auto_confirm_pause(&self) -> Duration {
        Duration::from_millis(self.auto_confirm_pause_ms)
    }

    pub fn reveal_pacing(&self) -> Duration {
        animation::scaled(Duration::from_millis(self.reveal_pacing_ms), self.animation_speed)
    }

    /// Wall-clock wait for an animation of the given canonical length
    pub fn pace(&self, duration: Duration) -> Duration {
        animation::scaled(duration, self.animation_speed)
    }
}
