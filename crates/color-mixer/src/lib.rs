//! Colour ramp engine.
//!
//! Produces ordered colour ramps between two endpoints in a caller-selected
//! colour model, and derives a full set of named theme colours by sampling
//! several of those ramps.
//!
//! ```
//! use color_mixer::mix_hex;
//!
//! let ramp = mix_hex("#ff0000", "#0000ff", 5, "oklab", None).unwrap();
//! assert_eq!(ramp.len(), 5);
//! assert_eq!(ramp[0], "#ff0000");
//! ```

use thiserror::Error;

pub mod cache;
pub mod cam16;
pub mod color;
pub mod derive;
pub mod hct;
pub mod interpolate;
pub mod kubelka;
pub mod ramp;
pub mod tone;

pub use cache::CachedRampQuery;
pub use color::{Color, Space};
pub use derive::{derive_theme, NamedColorSet};
pub use interpolate::{interpolate, Algorithm, MAX_STEPS, MIN_STEPS};
pub use ramp::{Ramp, RampQuery, RampRequest, RampService};
pub use tone::ToneSchedule;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid color `{0}`: expected 6 hex digits with an optional leading `#`")]
    InvalidColor(String),
    #[error("Unknown algorithm `{0}`")]
    InvalidAlgorithm(String),
    #[error("Unknown tone schedule `{0}`")]
    InvalidSchedule(String),
    #[error(
        "Step count {0} is outside the supported range {min}..={max}",
        min = MIN_STEPS,
        max = MAX_STEPS
    )]
    InvalidSteps(usize),
}

/// String-level entry point: parses both endpoints and the tags, clamps the
/// step count and returns the ramp as `#rrggbb` strings.
pub fn mix_hex(
    start: &str,
    end: &str,
    steps: i64,
    algorithm: &str,
    schedule: Option<&str>,
) -> Result<Vec<String>> {
    let request = RampRequest::parse(start, end, steps, algorithm, schedule)?;
    let ramp = RampQuery.query(&request)?;

    Ok(ramp.to_hex())
}
