//! Animation requests handed to the host
//!
//! The host owns the actual slide/flip/fade primitives. Durations here are
//! the canonical pacing the log stream is synchronised against.

use crate::core::{NodeId, PlayerId};
use serde::Serialize;
use std::time::Duration;

/// Standard move/flip/fade
pub const STANDARD: Duration = Duration::from_millis(800);
/// One card sliding into a supply row
pub const SUPPLY_REFILL: Duration = Duration::from_millis(500);
/// Row discard before the server refills it
pub const DISCARD: Duration = Duration::from_millis(500);
/// Score popup
pub const SCORE: Duration = Duration::from_millis(1000);
/// Star scoring display
pub const STAR_SCORE: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Standard,
    Refill,
    Score,
    StarScore,
}

impl Pace {
    pub fn duration(&self) -> Duration {
        match self {
            Pace::Standard => STANDARD,
            Pace::Refill => SUPPLY_REFILL,
            Pace::Score => SCORE,
            Pace::StarScore => STAR_SCORE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Animation {
    /// Node slides from where it was drawn to its new parent
    Slide { node: NodeId, to: NodeId, pace: Pace },
    Flip { node: NodeId, face_up: bool },
    /// Fade then destroy; the dom id outlives the node
    Fade { dom_id: String },
    Spin { node: NodeId },
    ScorePopup { player: PlayerId, delta: i64, pace: Pace },
}

impl Animation {
    /// Canonical duration of this animation
    pub fn duration(&self) -> Duration {
        match self {
            Animation::Slide { pace, .. } | Animation::ScorePopup { pace, .. } => pace.duration(),
            Animation::Flip { .. } | Animation::Spin { .. } => STANDARD,
            Animation::Fade { .. } => DISCARD,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Animation::Slide { .. } => "slide",
            Animation::Flip { .. } => "flip",
            Animation::Fade { .. } => "fade",
            Animation::Spin { .. } => "spin",
            Animation::ScorePopup { .. } => "score",
        }
    }
}

/// Scale a duration by the configured animation speed
///
/// A speed of 2.0 plays twice as fast; 0, less or NaN disables waiting.
/// A speed too small to represent saturates at `Duration::MAX`.
pub fn scaled(duration: Duration, speed: f64) -> Duration {
    if speed.is_nan() || speed <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(duration.as_secs_f64() / speed).unwrap_or(Duration::MAX)
}
