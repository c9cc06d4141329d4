//! HCT: CAM16 hue and chroma paired with CIE L* as tone.
//!
//! Tone is fully determined by luminance, so holding it fixed while changing
//! hue or chroma keeps contrast against other colours stable. Converting back
//! to RGB needs an iterative solve because CAM16 lightness and L* differ.

use palette::convert::FromColorUnclamped;
use palette::white_point::D65;
use palette::{Lab, LinSrgb, Xyz};
use tracing::debug;

use crate::cam16::{self, Cam16};

/// Largest chroma reduction search depth. Each round halves the bracket.
pub const GAMUT_REDUCTION_ROUNDS: usize = 24;

/// Linear channels within this distance of `[0, 1]` count as displayable.
pub const GAMUT_EPSILON: f64 = 1e-7;

const SOLVER_ROUNDS: usize = 50;
/// On relative luminance in `0..=1`.
const SOLVER_TOLERANCE: f64 = 1e-12;
const BISECTION_ROUNDS: usize = 80;

/// Relative luminance (`0..=100`) for an L* value.
pub fn y_from_lstar(lstar: f64) -> f64 {
    Xyz::<D65, f64>::from_color_unclamped(Lab::<D65, f64>::new(lstar, 0.0, 0.0)).y * 100.0
}

/// L* for a relative luminance in `0..=100`.
pub fn lstar_from_y(y: f64) -> f64 {
    Lab::<D65, f64>::from_color_unclamped(Xyz::<D65, f64>::new(0.0, y / 100.0, 0.0)).l
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hct {
    /// Degrees, `[0, 360)`.
    pub hue: f64,
    pub chroma: f64,
    /// CIE L*, `0..=100`.
    pub tone: f64,
}

impl Hct {
    pub fn new(hue: f64, chroma: f64, tone: f64) -> Self {
        Hct { hue, chroma, tone }
    }

    pub fn from_linear(rgb: [f64; 3]) -> Self {
        let [red, green, blue] = rgb;
        let xyz = Xyz::<D65, f64>::from_color_unclamped(LinSrgb::new(red, green, blue));
        let cam = Cam16::from_xyz(xyz);
        Hct {
            hue: cam.hue,
            chroma: cam.chroma,
            tone: Lab::<D65, f64>::from_color_unclamped(xyz).l,
        }
    }

    /// Linear-light sRGB with exactly this hue, chroma and tone. May lie
    /// outside the display gamut.
    pub fn to_linear(&self) -> [f64; 3] {
        solve(self.hue, self.chroma, self.tone)
    }

    /// Like [`Hct::to_linear`], but if the colour is not displayable the
    /// chroma is reduced, with hue and tone held fixed, until it is.
    pub fn to_linear_in_gamut(&self) -> [f64; 3] {
        let requested = solve(self.hue, self.chroma, self.tone);
        if in_gamut(requested) {
            return requested;
        }

        let mut low = 0.0;
        let mut high = self.chroma;
        let mut best = solve(self.hue, 0.0, self.tone);

        for _ in 0..GAMUT_REDUCTION_ROUNDS {
            let mid = 0.5 * (low + high);
            let candidate = solve(self.hue, mid, self.tone);
            if in_gamut(candidate) {
                low = mid;
                best = candidate;
            } else {
                high = mid;
            }
        }

        debug!(
            hue = self.hue,
            tone = self.tone,
            requested = self.chroma,
            reduced = low,
            "reduced chroma to fit the sRGB gamut"
        );

        best
    }

    /// Whether the exact colour is displayable without chroma reduction.
    pub fn is_in_gamut(&self) -> bool {
        in_gamut(self.to_linear())
    }
}

pub fn in_gamut(rgb: [f64; 3]) -> bool {
    rgb.iter()
        .all(|c| c.is_finite() && *c >= -GAMUT_EPSILON && *c <= 1.0 + GAMUT_EPSILON)
}

/// Finds the CAM16 lightness whose luminance matches `tone` at the given hue
/// and chroma, and returns the corresponding linear RGB.
fn solve(hue: f64, chroma: f64, tone: f64) -> [f64; 3] {
    if tone <= 0.0 {
        return [0.0; 3];
    }
    if tone >= 100.0 {
        return [1.0; 3];
    }

    let y = y_from_lstar(tone) / 100.0;
    if chroma < 1e-4 {
        return [y; 3];
    }

    // Luminance grows roughly with J², which drives the update below.
    let mut j = (100.0 * y).sqrt() * 11.0;
    for _ in 0..SOLVER_ROUNDS {
        let xyz = cam16::xyz_from_jch(j, chroma, hue);
        let fnj = xyz.y;

        if (fnj - y).abs() < SOLVER_TOLERANCE {
            return cam16::linear_from_xyz(xyz);
        }
        if fnj <= 0.0 {
            break;
        }

        j -= (fnj - y) * j / (2.0 * fnj);
        if !j.is_finite() || j <= 0.0 {
            break;
        }
    }

    solve_by_bisection(hue, chroma, y)
}

fn solve_by_bisection(hue: f64, chroma: f64, y: f64) -> [f64; 3] {
    let luminance_at = |j: f64| cam16::xyz_from_jch(j, chroma, hue).y;

    let mut low = 0.0;
    let mut high = 100.0;
    for _ in 0..16 {
        if luminance_at(high) >= y {
            break;
        }
        high *= 2.0;
    }

    for _ in 0..BISECTION_ROUNDS {
        let mid = 0.5 * (low + high);
        if luminance_at(mid) < y {
            low = mid;
        } else {
            high = mid;
        }
    }

    cam16::linear_from_xyz(cam16::xyz_from_jch(0.5 * (low + high), chroma, hue))
}
