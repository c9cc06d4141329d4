//! Subtractive, paint-like mixing with the two-constant Kubelka–Munk model.
//!
//! Each linear-light channel is treated as the reflectance of an opaque
//! pigment layer. Pigments mix by averaging their absorption/scattering
//! ratio `K/S`, not their reflectance, which darkens and dulls midpoints the
//! way real paint does.

/// Lowest reflectance any channel is lifted to before mixing. A perfect
/// absorber has infinite `K/S` and would swallow every mix it touches.
pub const REFLECTANCE_FLOOR: f64 = 0.02;

/// `K/S` for a reflectance in `(0, 1]`.
pub fn absorption_ratio(reflectance: f64) -> f64 {
    let complement = 1.0 - reflectance;
    complement * complement / (2.0 * reflectance)
}

/// Inverse of [`absorption_ratio`].
pub fn reflectance(ratio: f64) -> f64 {
    1.0 + ratio - (ratio * ratio + 2.0 * ratio).sqrt()
}

fn lift(channel: f64) -> f64 {
    REFLECTANCE_FLOOR + (1.0 - REFLECTANCE_FLOOR) * channel.clamp(0.0, 1.0)
}

fn lower(lifted: f64) -> f64 {
    ((lifted - REFLECTANCE_FLOOR) / (1.0 - REFLECTANCE_FLOOR)).clamp(0.0, 1.0)
}

/// Mixes two linear-light colours; `t = 0` yields `a`, `t = 1` yields `b`.
pub fn mix(a: [f64; 3], b: [f64; 3], t: f64) -> [f64; 3] {
    let mut out = [0.0; 3];

    for (channel, (a, b)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
        let ratio_a = absorption_ratio(lift(*a));
        let ratio_b = absorption_ratio(lift(*b));
        let mixed = ratio_a + (ratio_b - ratio_a) * t;

        *channel = lower(reflectance(mixed));
    }

    out
}
