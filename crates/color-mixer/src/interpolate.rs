//! Interpolation strategies, one per [`Algorithm`].

use std::fmt;
use std::str::FromStr;

use palette::LinSrgb;
use serde::Serialize;

use crate::color::{linear_from_array, rgb_array, wrap_degrees, Color, Space};
use crate::hct::Hct;
use crate::kubelka;
use crate::tone::ToneSchedule;
use crate::{Error, Result};

pub const MIN_STEPS: usize = 2;
pub const MAX_STEPS: usize = 512;

/// Colour model and interpolation strategy used to build a ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum Algorithm {
    /// Gamma-encoded sRGB, component-wise.
    Srgb,
    /// Linear-light sRGB, component-wise.
    Linear,
    Oklab,
    Okhsv,
    Okhsl,
    /// HCT, cylindrical mix with hue/tone preserving gamut mapping.
    Hct,
    /// Single-seed tonal ramp driven by a [`ToneSchedule`].
    HctTone,
    Cam16Ucs,
    Cam16Jmh,
    /// Kubelka–Munk subtractive pigment mixing.
    KubelkaMunk,
}

impl Algorithm {
    pub const ALL: [Algorithm; 10] = [
        Algorithm::Srgb,
        Algorithm::Linear,
        Algorithm::Oklab,
        Algorithm::Okhsv,
        Algorithm::Okhsl,
        Algorithm::Hct,
        Algorithm::HctTone,
        Algorithm::Cam16Ucs,
        Algorithm::Cam16Jmh,
        Algorithm::KubelkaMunk,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Srgb => "srgb",
            Algorithm::Linear => "linear",
            Algorithm::Oklab => "oklab",
            Algorithm::Okhsv => "okhsv",
            Algorithm::Okhsl => "okhsl",
            Algorithm::Hct => "hct",
            Algorithm::HctTone => "hct_tone",
            Algorithm::Cam16Ucs => "cam16ucs",
            Algorithm::Cam16Jmh => "cam16jmh",
            Algorithm::KubelkaMunk => "km_sub",
        }
    }

    /// Working space of the algorithm, if it interpolates inside one.
    pub fn space(self) -> Option<Space> {
        match self {
            Algorithm::Srgb => Some(Space::Srgb),
            Algorithm::Linear => Some(Space::LinearSrgb),
            Algorithm::Oklab => Some(Space::Oklab),
            Algorithm::Okhsv => Some(Space::Okhsv),
            Algorithm::Okhsl => Some(Space::Okhsl),
            Algorithm::Hct | Algorithm::HctTone => Some(Space::Hct),
            Algorithm::Cam16Ucs => Some(Space::Cam16Ucs),
            Algorithm::Cam16Jmh => Some(Space::Cam16Jmh),
            Algorithm::KubelkaMunk => None,
        }
    }

    pub fn uses_schedule(self) -> bool {
        self == Algorithm::HctTone
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Algorithm> for &'static str {
    fn from(algorithm: Algorithm) -> Self {
        algorithm.as_str()
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim().to_ascii_lowercase();

        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str() == tag)
            .ok_or_else(|| Error::InvalidAlgorithm(s.to_string()))
    }
}

/// Builds a ramp of `steps` colours from `start` to `end`.
///
/// `steps` must already be within [`MIN_STEPS`]`..=`[`MAX_STEPS`]; anything
/// else is a caller bug and fails with [`Error::InvalidSteps`]. The first and
/// last entries are always exactly `start` and `end`.
pub fn interpolate(
    start: Color,
    end: Color,
    steps: usize,
    algorithm: Algorithm,
    schedule: Option<ToneSchedule>,
) -> Result<Vec<Color>> {
    if !(MIN_STEPS..=MAX_STEPS).contains(&steps) {
        return Err(Error::InvalidSteps(steps));
    }

    if start == end {
        return Ok(vec![start; steps]);
    }

    if steps == 2 {
        return Ok(vec![start, end]);
    }

    let mut colors = match algorithm {
        Algorithm::Srgb => rectangular(start, end, steps, Space::Srgb),
        Algorithm::Linear => rectangular(start, end, steps, Space::LinearSrgb),
        Algorithm::Oklab => rectangular(start, end, steps, Space::Oklab),
        Algorithm::Cam16Ucs => rectangular(start, end, steps, Space::Cam16Ucs),
        Algorithm::Okhsv => cylindrical(start, end, steps, Space::Okhsv, |coords| {
            Color::from_space(Space::Okhsv, coords)
        }),
        Algorithm::Okhsl => cylindrical(start, end, steps, Space::Okhsl, |coords| {
            Color::from_space(Space::Okhsl, coords)
        }),
        Algorithm::Cam16Jmh => cylindrical(start, end, steps, Space::Cam16Jmh, |coords| {
            Color::from_space(Space::Cam16Jmh, coords)
        }),
        Algorithm::Hct => cylindrical(start, end, steps, Space::Hct, |[hue, chroma, tone]| {
            let rgb = Hct::new(hue, chroma, tone).to_linear_in_gamut();
            Color::from_linear(linear_from_array(rgb))
        }),
        Algorithm::HctTone => tonal(start, end, steps, schedule.unwrap_or_default()),
        Algorithm::KubelkaMunk => pigment(start, end, steps),
    };

    colors[0] = start;
    colors[steps - 1] = end;

    Ok(colors)
}

/// Evenly spaced positions `i / (steps - 1)`, both ends included.
fn positions(steps: usize) -> impl Iterator<Item = f64> {
    let last = (steps - 1) as f64;
    (0..steps).map(move |i| i as f64 / last)
}

fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + t * (end - start)
}

/// Interpolates hue along the shorter arc. The signed difference is taken in
/// `(-180, 180]`, so exactly opposite hues travel towards increasing angle.
pub fn lerp_hue(start: f64, end: f64, t: f64) -> f64 {
    let mut delta = (end - start).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }

    wrap_degrees(start + t * delta)
}

fn rectangular(start: Color, end: Color, steps: usize, space: Space) -> Vec<Color> {
    let a = start.in_space(space);
    let b = end.in_space(space);

    positions(steps)
        .map(|t| {
            let coords = [lerp(a[0], b[0], t), lerp(a[1], b[1], t), lerp(a[2], b[2], t)];
            Color::from_space(space, coords)
        })
        .collect()
}

fn cylindrical<F>(start: Color, end: Color, steps: usize, space: Space, finish: F) -> Vec<Color>
where
    F: Fn([f64; 3]) -> Color,
{
    let mut a = start.in_space(space);
    let mut b = end.in_space(space);

    let hue = space.hue_index();
    if let (Some(hue), Some(chroma)) = (hue, space.chroma_index()) {
        adopt_powerless_hue(&mut a, &mut b, hue, chroma, space.achromatic_threshold());
    }

    positions(steps)
        .map(|t| {
            finish(std::array::from_fn(|i| {
                if Some(i) == hue {
                    lerp_hue(a[i], b[i], t)
                } else {
                    lerp(a[i], b[i], t)
                }
            }))
        })
        .collect()
}

/// A (nearly) neutral endpoint has no meaningful hue; it borrows the other
/// endpoint's so the ramp does not sweep through unrelated hues.
fn adopt_powerless_hue(
    a: &mut [f64; 3],
    b: &mut [f64; 3],
    hue: usize,
    chroma: usize,
    threshold: f64,
) {
    let a_neutral = a[chroma] < threshold;
    let b_neutral = b[chroma] < threshold;

    match (a_neutral, b_neutral) {
        (true, false) => a[hue] = b[hue],
        (false, true) => b[hue] = a[hue],
        _ => {}
    }
}

/// Holds the hue and chroma of `start` and sweeps tone along `schedule`,
/// towards white when `end` is lighter than `start`, towards black otherwise.
fn tonal(start: Color, end: Color, steps: usize, schedule: ToneSchedule) -> Vec<Color> {
    let seed = Hct::from_linear(rgb_array(start.to_linear()));
    let target = Hct::from_linear(rgb_array(end.to_linear()));
    let ascending = target.tone > seed.tone;

    // The curve is laid over the tones between the two endpoints, so the
    // ramp never passes back through the seed's tone.
    let low = seed.tone.min(target.tone);
    let span = (seed.tone - target.tone).abs();

    positions(steps)
        .map(|t| {
            let position = if ascending { t } else { 1.0 - t };
            let tone = low + span * schedule.tone(position) / 100.0;
            let rgb = Hct::new(seed.hue, seed.chroma, tone).to_linear_in_gamut();
            Color::from_linear(linear_from_array(rgb))
        })
        .collect()
}

fn pigment(start: Color, end: Color, steps: usize) -> Vec<Color> {
    let a = rgb_array(start.to_linear());
    let b = rgb_array(end.to_linear());

    positions(steps)
        .map(|t| {
            let [red, green, blue] = kubelka::mix(a, b, t);
            Color::from_linear(LinSrgb::new(red, green, blue))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> Color {
        Color::from_hex(s).unwrap()
    }

    fn hexes(colors: &[Color]) -> Vec<String> {
        colors.iter().map(|c| c.to_hex()).collect()
    }

    #[test]
    fn parses_every_tag_back() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.as_str().parse::<Algorithm>().unwrap(), algorithm);
        }
        assert_eq!("  OKLab ".parse::<Algorithm>().unwrap(), Algorithm::Oklab);
    }

    #[test]
    fn unknown_tag_is_an_error() {
        assert_eq!(
            "not_an_algo".parse::<Algorithm>(),
            Err(Error::InvalidAlgorithm("not_an_algo".to_string()))
        );
    }

    #[test]
    fn steps_outside_contract_fail_fast() {
        let (a, b) = (hex("#ff0000"), hex("#0000ff"));
        assert_eq!(
            interpolate(a, b, 1, Algorithm::Srgb, None),
            Err(Error::InvalidSteps(1))
        );
        assert_eq!(
            interpolate(a, b, 513, Algorithm::Srgb, None),
            Err(Error::InvalidSteps(513))
        );
    }

    #[test]
    fn two_steps_return_the_endpoints() {
        let (a, b) = (hex("#123456"), hex("#fedcba"));
        for algorithm in Algorithm::ALL {
            assert_eq!(interpolate(a, b, 2, algorithm, None).unwrap(), vec![a, b]);
        }
    }

    #[test]
    fn identical_endpoints_give_constant_ramp() {
        let a = hex("#3b82f6");
        for algorithm in Algorithm::ALL {
            let ramp = interpolate(a, a, 7, algorithm, None).unwrap();
            assert_eq!(ramp, vec![a; 7], "{algorithm}");
        }
    }

    #[test]
    fn srgb_midpoint_is_channel_average() {
        let ramp = interpolate(hex("#ff0000"), hex("#0000ff"), 3, Algorithm::Srgb, None).unwrap();
        assert_eq!(hexes(&ramp), vec!["#ff0000", "#800080", "#0000ff"]);
    }

    #[test]
    fn linear_midpoint_is_brighter_than_gamma_midpoint() {
        let ramp = interpolate(hex("#000000"), hex("#ffffff"), 3, Algorithm::Linear, None).unwrap();
        // 0.5 linear encodes to 0.7354 gamma.
        assert_eq!(ramp[1].to_hex(), "#bcbcbc");
    }

    #[test]
    fn hue_takes_the_short_way_round() {
        assert!((lerp_hue(350.0, 10.0, 0.5) - 0.0).abs() < 1e-9);
        assert!((lerp_hue(10.0, 350.0, 0.5) - 0.0).abs() < 1e-9);
        assert!((lerp_hue(350.0, 10.0, 0.25) - 355.0).abs() < 1e-9);
        assert!((lerp_hue(0.0, 180.0, 0.5) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn cylindrical_ramp_crosses_red_not_cyan() {
        // Magenta-ish red (hue ~350) to orange-ish red (hue ~10) in HCT.
        let start = hex("#e0115f");
        let end = hex("#e04d11");
        let [h0, ..] = start.in_space(Space::Hct);
        let [h1, ..] = end.in_space(Space::Hct);
        assert!(h0 > 300.0 || h1 < 60.0);

        for algorithm in [Algorithm::Hct, Algorithm::Okhsl, Algorithm::Cam16Jmh] {
            let ramp = interpolate(start, end, 5, algorithm, None).unwrap();
            let (r, g, _) = ramp[2].components();
            assert!(r > 150 && g < 100, "{algorithm}: {}", ramp[2]);
        }
    }

    #[test]
    fn grey_endpoint_borrows_hue() {
        let mut a = [200.0, 0.0, 50.0];
        let mut b = [30.0, 40.0, 60.0];
        adopt_powerless_hue(&mut a, &mut b, 0, 1, 1e-4);
        assert_eq!(a[0], 30.0);
        assert_eq!(b[0], 30.0);
    }

    #[test]
    fn pigment_differs_from_linear_light() {
        let (a, b) = (hex("#ff0000"), hex("#0000ff"));
        let pigment = interpolate(a, b, 3, Algorithm::KubelkaMunk, None).unwrap();
        let linear = interpolate(a, b, 3, Algorithm::Linear, None).unwrap();

        let (pr, _, pb) = pigment[1].components();
        let (lr, _, lb) = linear[1].components();
        assert!(u16::from(pr) + 60 < u16::from(lr), "{} vs {}", pigment[1], linear[1]);
        assert!(u16::from(pb) + 60 < u16::from(lb), "{} vs {}", pigment[1], linear[1]);
    }

    #[test]
    fn tonal_ramp_darkens_towards_black() {
        let seed = hex("#3b82f6");
        let schedule = Some(ToneSchedule::Ease);
        let ramp = interpolate(seed, Color::BLACK, 9, Algorithm::HctTone, schedule).unwrap();

        assert_eq!(ramp[0], seed);
        assert_eq!(ramp[8], Color::BLACK);

        let tones: Vec<f64> = ramp.iter().map(|c| c.in_space(Space::Hct)[2]).collect();
        for pair in tones.windows(2) {
            assert!(pair[0] > pair[1], "{tones:?}");
        }
    }

    #[test]
    fn tonal_ramp_stays_between_endpoint_tones() {
        let pairs = [
            ("#1e3a8a", Color::BLACK),
            ("#1e3a8a", Color::WHITE),
            ("#bfdbfe", Color::BLACK),
        ];
        for (seed, end) in pairs {
            let seed = hex(seed);
            let ramp = interpolate(seed, end, 7, Algorithm::HctTone, None).unwrap();

            let tones: Vec<f64> = ramp.iter().map(|c| c.in_space(Space::Hct)[2]).collect();
            let ascending = tones[6] > tones[0];
            for pair in tones.windows(2) {
                assert_eq!(pair[1] > pair[0], ascending, "{seed}: {tones:?}");
            }
        }
    }

    #[test]
    fn tonal_ramp_keeps_seed_hue() {
        let seed = hex("#3b82f6");
        let seed_hue = seed.in_space(Space::Hct)[0];
        let ramp = interpolate(seed, Color::WHITE, 11, Algorithm::HctTone, None).unwrap();

        // Skip the near-black and near-white ends where 8-bit rounding
        // dominates hue.
        for color in &ramp[2..7] {
            let hue = color.in_space(Space::Hct)[0];
            assert!((hue - seed_hue).abs() < 3.0, "{color}: {hue} vs {seed_hue}");
        }
    }

    #[test]
    fn tonal_ramp_follows_schedule_tones() {
        let seed = hex("#808000");
        let seed_tone = seed.in_space(Space::Hct)[2];
        let schedule = Some(ToneSchedule::Linear);
        let ramp = interpolate(seed, Color::WHITE, 5, Algorithm::HctTone, schedule).unwrap();

        // Halfway between the seed's tone and white.
        let expected = seed_tone + (100.0 - seed_tone) * 0.5;
        let tone = ramp[2].in_space(Space::Hct)[2];
        assert!((tone - expected).abs() < 0.5, "tone = {tone}, expected {expected}");
    }
}
