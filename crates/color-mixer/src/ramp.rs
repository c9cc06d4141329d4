use std::slice;

use serde::Serialize;

use crate::interpolate::{interpolate, Algorithm, MAX_STEPS, MIN_STEPS};
use crate::tone::ToneSchedule;
use crate::{Color, Result};

/// An ordered run of colours from one endpoint to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ramp(Vec<Color>);

impl Ramp {
    pub fn colors(&self) -> &[Color] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<Color> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<Color> {
        self.0.last().copied()
    }

    /// The entry at `round(t * (len - 1))`, with `t` clamped to `[0, 1]`.
    pub fn sample(&self, t: f64) -> Option<Color> {
        let last = self.0.len().checked_sub(1)?;
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let index = (t * last as f64).round() as usize;

        self.0.get(index.min(last)).copied()
    }

    pub fn to_hex(&self) -> Vec<String> {
        self.0.iter().map(|color| color.to_hex()).collect()
    }

    pub fn iter(&self) -> slice::Iter<'_, Color> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Color> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Ramp {
    type Item = &'a Color;
    type IntoIter = slice::Iter<'a, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Clamps a caller-supplied step count into the supported range.
pub fn clamp_steps(steps: i64) -> usize {
    steps.clamp(MIN_STEPS as i64, MAX_STEPS as i64) as usize
}

/// A normalised ramp query. Two requests that would produce the same ramp
/// compare equal, so a request doubles as a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RampRequest {
    start: Color,
    end: Color,
    steps: usize,
    algorithm: Algorithm,
    schedule: Option<ToneSchedule>,
}

impl RampRequest {
    /// Out-of-range step counts are clamped to the nearest bound.
    pub fn new(start: Color, end: Color, steps: i64, algorithm: Algorithm) -> Self {
        RampRequest {
            start,
            end,
            steps: clamp_steps(steps),
            algorithm,
            schedule: None,
        }
    }

    /// Only the tone-scheduled algorithm reads a schedule; for every other
    /// algorithm it is dropped.
    pub fn with_schedule(mut self, schedule: Option<ToneSchedule>) -> Self {
        self.schedule = if self.algorithm.uses_schedule() {
            schedule
        } else {
            None
        };
        self
    }

    /// Builds a request from untrusted strings.
    pub fn parse(
        start: &str,
        end: &str,
        steps: i64,
        algorithm: &str,
        schedule: Option<&str>,
    ) -> Result<Self> {
        let start = Color::from_hex(start)?;
        let end = Color::from_hex(end)?;
        let algorithm = algorithm.parse::<Algorithm>()?;
        let schedule = schedule.map(str::parse::<ToneSchedule>).transpose()?;

        Ok(RampRequest::new(start, end, steps, algorithm).with_schedule(schedule))
    }

    pub fn start(&self) -> Color {
        self.start
    }

    pub fn end(&self) -> Color {
        self.end
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn schedule(&self) -> Option<ToneSchedule> {
        self.schedule
    }
}

/// Anything that can answer ramp queries. Implementations must be safe to
/// call from several threads at once.
pub trait RampService: Sync {
    fn query(&self, request: &RampRequest) -> Result<Ramp>;
}

/// The stateless ramp query service.
#[derive(Debug, Clone, Copy, Default)]
pub struct RampQuery;

impl RampService for RampQuery {
    fn query(&self, request: &RampRequest) -> Result<Ramp> {
        interpolate(
            request.start,
            request.end,
            request.steps,
            request.algorithm,
            request.schedule,
        )
        .map(Ramp)
    }
}
