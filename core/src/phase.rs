//! Pacing phase classifier.
//!
//! Phases are never stored as independent state; they are always
//! recomputed from elapsed real time. The bands form a half-open chain
//! over `[0, ∞)`: each is inclusive at its lower bound, exclusive at its
//! upper.
//!
//! These labels drive narrative beats and the unlock trigger, and need
//! not line up with the schedule's spawn-density windows: `overwhelm`
//! starts in the middle of the heavy burst window.

use crate::{config::PhaseBounds, types::RealSeconds};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PacingPhase {
    Tutorial,
    Ramp,
    Overwhelm,
    #[serde(rename = "harper-unlock-transition")]
    UnlockTransition,
    Mastery,
    Winddown,
}

impl PacingPhase {
    pub const ALL: [PacingPhase; 6] = [
        PacingPhase::Tutorial,
        PacingPhase::Ramp,
        PacingPhase::Overwhelm,
        PacingPhase::UnlockTransition,
        PacingPhase::Mastery,
        PacingPhase::Winddown,
    ];

    /// Total over `[0, ∞)`. Negative or NaN input is treated as 0.
    pub fn classify(elapsed: RealSeconds, bounds: &PhaseBounds) -> Self {
        let t = if elapsed.is_nan() { 0.0 } else { elapsed };
        if t < bounds.ramp {
            Self::Tutorial
        } else if t < bounds.overwhelm {
            Self::Ramp
        } else if t < bounds.unlock_transition {
            Self::Overwhelm
        } else if t < bounds.mastery {
            Self::UnlockTransition
        } else if t < bounds.winddown {
            Self::Mastery
        } else {
            Self::Winddown
        }
    }

    /// Inclusive lower bound of this phase's band.
    pub fn start_seconds(&self, bounds: &PhaseBounds) -> RealSeconds {
        match self {
            Self::Tutorial         => 0.0,
            Self::Ramp             => bounds.ramp,
            Self::Overwhelm        => bounds.overwhelm,
            Self::UnlockTransition => bounds.unlock_transition,
            Self::Mastery          => bounds.mastery,
            Self::Winddown         => bounds.winddown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Tutorial         => "tutorial",
            Self::Ramp             => "ramp",
            Self::Overwhelm        => "overwhelm",
            Self::UnlockTransition => "harper-unlock-transition",
            Self::Mastery          => "mastery",
            Self::Winddown         => "winddown",
        }
    }

    /// True once the capability unlock is due.
    pub fn is_unlock_or_later(&self) -> bool {
        *self >= Self::UnlockTransition
    }
}

impl std::fmt::Display for PacingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for PacingPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown pacing phase '{s}'"))
    }
}

/// Classify against the designed boundaries.
pub fn classify(elapsed: RealSeconds) -> PacingPhase {
    PacingPhase::classify(elapsed, &PhaseBounds::default())
}
