use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::{Error, Result};

/// Exponent of the shadow and highlight curves. Below one, so each curve is
/// steep at the end it favours.
pub const WEIGHTED_EXPONENT: f64 = 1.0 / 1.35;

/// How a normalized ramp position maps to a target tone (CIE L*).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneSchedule {
    #[default]
    Linear,
    /// Smoothstep: slow at both ends, steep in the middle.
    Ease,
    /// `t^p`, spreads the dark end of the ramp.
    Shadow,
    /// `1 - (1 - t)^p`, spreads the light end of the ramp.
    Highlight,
}

impl ToneSchedule {
    pub const ALL: [ToneSchedule; 4] = [
        ToneSchedule::Linear,
        ToneSchedule::Ease,
        ToneSchedule::Shadow,
        ToneSchedule::Highlight,
    ];

    /// Target tone in `[0, 100]` for a position `t` in `[0, 1]`. Strictly
    /// increasing, with `tone(0) == 0` and `tone(1) == 100`.
    pub fn tone(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        let curve = match self {
            ToneSchedule::Linear => t,
            ToneSchedule::Ease => t * t * (3.0 - 2.0 * t),
            ToneSchedule::Shadow => t.powf(WEIGHTED_EXPONENT),
            ToneSchedule::Highlight => 1.0 - (1.0 - t).powf(WEIGHTED_EXPONENT),
        };

        100.0 * curve
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ToneSchedule::Linear => "linear",
            ToneSchedule::Ease => "ease",
            ToneSchedule::Shadow => "shadow",
            ToneSchedule::Highlight => "highlight",
        }
    }
}

impl fmt::Display for ToneSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ToneSchedule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim().to_ascii_lowercase();

        ToneSchedule::ALL
            .into_iter()
            .find(|schedule| schedule.as_str() == tag)
            .ok_or_else(|| Error::InvalidSchedule(s.to_string()))
    }
}
