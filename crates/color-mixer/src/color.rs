//! Display colours and conversions between the supported colour spaces.
//!
//! Every conversion pivots through linear-light sRGB. Coordinates are plain
//! `[f64; 3]` triples whose meaning depends on the [`Space`] they are tagged
//! with.

use std::fmt;
use std::str::FromStr;

use palette::convert::FromColorUnclamped;
use palette::{LinSrgb, Okhsl, Okhsv, Oklab, Srgb};
use serde::{Serialize, Serializer};

use crate::cam16::Cam16;
use crate::hct::Hct;
use crate::{Error, Result};

/// An opaque, 8-bit-per-channel, gamma-encoded sRGB colour.
///
/// This is the wire/display form. Every value is a valid `#rrggbb` triple;
/// out-of-gamut intermediates are clipped per channel before they become a
/// `Color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Color { red, green, blue }
    }

    /// Parses `rrggbb` or `#rrggbb`, case-insensitive, surrounding whitespace ignored.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(hex.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| Error::InvalidColor(hex.to_string()))
        };

        Ok(Color::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }

    pub fn components(self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }

    /// Gamma-encoded channels in `[0, 1]`.
    pub fn to_srgb(self) -> Srgb<f64> {
        Srgb::new(
            f64::from(self.red) / 255.0,
            f64::from(self.green) / 255.0,
            f64::from(self.blue) / 255.0,
        )
    }

    /// Clips each channel to `[0, 1]` and quantizes with round-half-to-even.
    pub fn from_srgb(srgb: Srgb<f64>) -> Self {
        Color::new(
            quantize(srgb.red),
            quantize(srgb.green),
            quantize(srgb.blue),
        )
    }

    pub fn to_linear(self) -> LinSrgb<f64> {
        self.to_srgb().into_linear()
    }

    /// Encodes a linear-light colour, clipping out-of-gamut channels first.
    pub fn from_linear(linear: LinSrgb<f64>) -> Self {
        let clipped = LinSrgb::new(
            clip_unit(linear.red),
            clip_unit(linear.green),
            clip_unit(linear.blue),
        );

        Color::from_srgb(Srgb::from_linear(clipped))
    }

    /// Coordinates of this colour in `space`.
    pub fn in_space(self, space: Space) -> [f64; 3] {
        match space {
            Space::Srgb => {
                let srgb = self.to_srgb();
                [srgb.red, srgb.green, srgb.blue]
            }
            _ => space.linear_to_coords(self.to_linear()),
        }
    }

    /// Display colour for a point in `space`, clipped to the sRGB gamut.
    pub fn from_space(space: Space, coords: [f64; 3]) -> Self {
        match space {
            // Skip the linear detour so exact midpoints such as 127.5 keep
            // their tie.
            Space::Srgb => Color::from_srgb(Srgb::new(coords[0], coords[1], coords[2])),
            _ => Color::from_linear(space.coords_to_linear(coords)),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Color::from_hex(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

fn clip_unit(channel: f64) -> f64 {
    if channel.is_nan() {
        0.0
    } else {
        channel.clamp(0.0, 1.0)
    }
}

fn quantize(channel: f64) -> u8 {
    (clip_unit(channel) * 255.0).round_ties_even() as u8
}

/// The colour spaces a ramp can be computed in.
///
/// Coordinate layout per space:
///
/// | space        | coords                          |
/// |--------------|---------------------------------|
/// | `Srgb`       | gamma-encoded r, g, b in 0..1   |
/// | `LinearSrgb` | linear-light r, g, b in 0..1    |
/// | `Oklab`      | L, a, b                         |
/// | `Okhsv`      | hue°, saturation, value         |
/// | `Okhsl`      | hue°, saturation, lightness     |
/// | `Hct`        | hue°, chroma, tone (L*)         |
/// | `Cam16Ucs`   | J′, a′, b′                      |
/// | `Cam16Jmh`   | J, M, hue°                      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Space {
    Srgb,
    LinearSrgb,
    Oklab,
    Okhsv,
    Okhsl,
    Hct,
    Cam16Ucs,
    Cam16Jmh,
}

impl Space {
    /// Index of the hue angle for cylindrical spaces.
    pub fn hue_index(self) -> Option<usize> {
        match self {
            Space::Okhsv | Space::Okhsl | Space::Hct => Some(0),
            Space::Cam16Jmh => Some(2),
            Space::Srgb | Space::LinearSrgb | Space::Oklab | Space::Cam16Ucs => None,
        }
    }

    /// Index of the component that measures distance from the neutral axis.
    pub fn chroma_index(self) -> Option<usize> {
        match self {
            Space::Okhsv | Space::Okhsl | Space::Hct | Space::Cam16Jmh => Some(1),
            Space::Srgb | Space::LinearSrgb | Space::Oklab | Space::Cam16Ucs => None,
        }
    }

    /// Below this chroma the hue of a colour carries no information.
    pub fn achromatic_threshold(self) -> f64 {
        match self {
            Space::Okhsv | Space::Okhsl => 1e-4,
            // sRGB greys keep a residual chroma of up to ~2.9 here.
            Space::Hct | Space::Cam16Jmh => 3.0,
            Space::Srgb | Space::LinearSrgb | Space::Oklab | Space::Cam16Ucs => 0.0,
        }
    }

    /// Unclamped conversion from linear-light sRGB.
    pub fn linear_to_coords(self, linear: LinSrgb<f64>) -> [f64; 3] {
        match self {
            Space::Srgb => {
                let srgb: Srgb<f64> = Srgb::from_linear(linear);
                [srgb.red, srgb.green, srgb.blue]
            }
            Space::LinearSrgb => [linear.red, linear.green, linear.blue],
            Space::Oklab => {
                let lab: Oklab<f64> = Oklab::from_color_unclamped(linear);
                [lab.l, lab.a, lab.b]
            }
            Space::Okhsv => {
                let lab: Oklab<f64> = Oklab::from_color_unclamped(linear);
                let hsv = Okhsv::from_color_unclamped(lab);
                [hsv.hue.into_positive_degrees(), hsv.saturation, hsv.value]
            }
            Space::Okhsl => {
                let lab: Oklab<f64> = Oklab::from_color_unclamped(linear);
                let hsl = Okhsl::from_color_unclamped(lab);
                [hsl.hue.into_positive_degrees(), hsl.saturation, hsl.lightness]
            }
            Space::Hct => {
                let hct = Hct::from_linear(rgb_array(linear));
                [hct.hue, hct.chroma, hct.tone]
            }
            Space::Cam16Ucs => {
                let cam = Cam16::from_linear(rgb_array(linear));
                [cam.jstar, cam.astar, cam.bstar]
            }
            Space::Cam16Jmh => {
                let cam = Cam16::from_linear(rgb_array(linear));
                [cam.j, cam.m, cam.hue]
            }
        }
    }

    /// Unclamped conversion to linear-light sRGB. The result may lie outside
    /// the display gamut.
    pub fn coords_to_linear(self, [c0, c1, c2]: [f64; 3]) -> LinSrgb<f64> {
        match self {
            Space::Srgb => Srgb::new(c0, c1, c2).into_linear(),
            Space::LinearSrgb => LinSrgb::new(c0, c1, c2),
            Space::Oklab => LinSrgb::from_color_unclamped(Oklab::new(c0, c1, c2)),
            Space::Okhsv => {
                let lab: Oklab<f64> = Oklab::from_color_unclamped(Okhsv::new(c0, c1, c2));
                LinSrgb::from_color_unclamped(lab)
            }
            Space::Okhsl => {
                let lab: Oklab<f64> = Oklab::from_color_unclamped(Okhsl::new(c0, c1, c2));
                LinSrgb::from_color_unclamped(lab)
            }
            Space::Hct => linear_from_array(Hct::new(c0, c1, c2).to_linear()),
            Space::Cam16Ucs => linear_from_array(Cam16::from_ucs(c0, c1, c2).to_linear()),
            Space::Cam16Jmh => linear_from_array(Cam16::from_jmh(c0, c1, c2).to_linear()),
        }
    }
}

/// Converts coordinates between two spaces through linear-light sRGB.
pub fn convert(coords: [f64; 3], from: Space, to: Space) -> [f64; 3] {
    if from == to {
        return coords;
    }

    to.linear_to_coords(from.coords_to_linear(coords))
}

pub(crate) fn rgb_array(linear: LinSrgb<f64>) -> [f64; 3] {
    [linear.red, linear.green, linear.blue]
}

pub(crate) fn linear_from_array([red, green, blue]: [f64; 3]) -> LinSrgb<f64> {
    LinSrgb::new(red, green, blue)
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
