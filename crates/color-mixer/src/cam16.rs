//! CAM16 colour appearance model under one fixed set of viewing conditions.
//!
//! The model itself comes from `palette::cam16`. This module pins the
//! viewing conditions and flattens the correlates the ramp spaces need into
//! one value. The same conditions are used by the HCT space, so ramps
//! computed in any appearance space are reproducible across runs and
//! machines.

use std::f64::consts::PI;

use once_cell::sync::Lazy;
use palette::cam16::{
    self as appearance, BakedParameters, Cam16Jch, Cam16Jmh, Cam16UcsJab, Cam16UcsJmh,
    Discounting, Parameters, StaticWp, Surround,
};
use palette::convert::FromColorUnclamped;
use palette::white_point::D65;
use palette::{LinSrgb, Xyz};

use crate::color::wrap_degrees;
use crate::hct::y_from_lstar;

/// Luminance of the display white in cd/m².
pub const WHITE_LUMINANCE: f64 = 200.0;
/// L* of the assumed mid-grey background.
pub const BACKGROUND_LSTAR: f64 = 50.0;
pub const SURROUND: Surround<f64> = Surround::Average;
/// Adaptation degree follows the adapting luminance.
pub const DISCOUNTING: Discounting<f64> = Discounting::Auto;

pub type ViewingConditions = BakedParameters<StaticWp<D65>, f64>;

pub static VIEWING_CONDITIONS: Lazy<ViewingConditions> = Lazy::new(|| {
    // Relative luminance of the background, `0..=1`.
    let background = y_from_lstar(BACKGROUND_LSTAR) / 100.0;

    let mut parameters: Parameters<StaticWp<D65>, f64> =
        Parameters::default_static_wp(WHITE_LUMINANCE / PI * background);
    parameters.background_luminance = background;
    parameters.surround = SURROUND;
    parameters.discounting = DISCOUNTING;
    parameters.bake()
});

/// Appearance correlates of a colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cam16 {
    /// Hue angle in degrees, `[0, 360)`.
    pub hue: f64,
    pub chroma: f64,
    /// Lightness.
    pub j: f64,
    /// Colourfulness.
    pub m: f64,
    pub jstar: f64,
    pub astar: f64,
    pub bstar: f64,
}

impl Cam16 {
    pub fn from_linear([red, green, blue]: [f64; 3]) -> Self {
        Self::from_xyz(Xyz::from_color_unclamped(LinSrgb::new(red, green, blue)))
    }

    pub fn from_xyz(xyz: Xyz<D65, f64>) -> Self {
        Self::from_model(appearance::Cam16::from_xyz(xyz, *VIEWING_CONDITIONS))
    }

    /// Builds the full set of correlates from lightness, chroma and hue.
    pub fn from_jch(j: f64, chroma: f64, hue: f64) -> Self {
        Self::from_model(Cam16Jch::new(j, chroma, wrap_degrees(hue)).into_full(*VIEWING_CONDITIONS))
    }

    pub fn from_jmh(j: f64, m: f64, hue: f64) -> Self {
        Self::from_model(Cam16Jmh::new(j, m, wrap_degrees(hue)).into_full(*VIEWING_CONDITIONS))
    }

    pub fn from_ucs(jstar: f64, astar: f64, bstar: f64) -> Self {
        let ucs = Cam16UcsJmh::from_color_unclamped(Cam16UcsJab::new(jstar, astar, bstar));
        let jmh = Cam16Jmh::from_color_unclamped(ucs);

        Self::from_model(jmh.into_full(*VIEWING_CONDITIONS))
    }

    fn from_model(cam: appearance::Cam16<f64>) -> Self {
        let ucs = Cam16UcsJab::from_color_unclamped(Cam16UcsJmh::from_color_unclamped(
            Cam16Jmh::from_full(cam),
        ));

        Cam16 {
            hue: wrap_degrees(cam.hue.into_positive_degrees()),
            chroma: cam.chroma,
            j: cam.lightness,
            m: cam.colorfulness,
            jstar: ucs.lightness,
            astar: ucs.a,
            bstar: ucs.b,
        }
    }

    pub fn to_xyz(&self) -> Xyz<D65, f64> {
        xyz_from_jch(self.j, self.chroma, self.hue)
    }

    /// Linear-light sRGB, unclamped.
    pub fn to_linear(&self) -> [f64; 3] {
        linear_from_xyz(self.to_xyz())
    }
}

/// Inverse model: XYZ (Y in `0..=1`) of the colour with the given correlates.
pub fn xyz_from_jch(j: f64, chroma: f64, hue: f64) -> Xyz<D65, f64> {
    Cam16Jch::new(j, chroma, hue).into_xyz(*VIEWING_CONDITIONS)
}

/// Unclamped linear-light sRGB in `0..=1`.
pub fn linear_from_xyz(xyz: Xyz<D65, f64>) -> [f64; 3] {
    let rgb = LinSrgb::<f64>::from_color_unclamped(xyz);
    [rgb.red, rgb.green, rgb.blue]
}
