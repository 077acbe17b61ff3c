//! Stateless vector and color helpers shared by particles and emitters.
//!
//! All angles taken by these helpers are in **degrees**; particles convert
//! to radians once, when they are activated.

use crate::error::ConfigError;
use glam::Vec2;
use rand::{Rng, RngCore};

/// Multiply degrees by this to get radians.
pub const DEG_TO_RADS: f32 = std::f32::consts::PI / 180.0;

/// Rotate `p` in place about the origin by `angle` degrees.
///
/// A zero angle leaves the point untouched (no trig is evaluated).
#[inline]
pub fn rotate_point(angle: f32, p: &mut Vec2) {
    if angle == 0.0 {
        return;
    }
    let (s, c) = (angle * DEG_TO_RADS).sin_cos();
    let x = p.x * c - p.y * s;
    let y = p.x * s + p.y * c;
    p.x = x;
    p.y = y;
}

/// Scale `point` to unit length.
///
/// The caller guarantees a non-zero length.
#[inline]
pub fn normalize(point: &mut Vec2) {
    let one_over_len = 1.0 / length(*point);
    point.x *= one_over_len;
    point.y *= one_over_len;
}

/// Multiply both components of `point` by `value`.
#[inline]
pub fn scale_by(point: &mut Vec2, value: f32) {
    point.x *= value;
    point.y *= value;
}

/// Euclidean length of `point`.
#[inline]
pub fn length(point: Vec2) -> f32 {
    (point.x * point.x + point.y * point.y).sqrt()
}

/// Pack three 0-255 channels into `0xRRGGBB`. No clamping is performed.
#[inline]
pub fn combine_rgb_components(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Parse `#AARRGGBB`, `#RRGGBB`, `0xAARRGGBB`, `0xRRGGBB`, `AARRGGBB` or `RRGGBB`.
///
/// Returns `[r, g, b]`, or `[r, g, b, a]` when an alpha byte was present.
///
/// # Example
///
/// ```
/// use spritefx::utils::hex_to_rgb;
///
/// assert_eq!(hex_to_rgb("#A1B2C3").unwrap(), vec![0xA1, 0xB2, 0xC3]);
/// assert_eq!(hex_to_rgb("0x80FF0000").unwrap(), vec![0xFF, 0x00, 0x00, 0x80]);
/// ```
pub fn hex_to_rgb(color: &str) -> Result<Vec<u8>, ConfigError> {
    let invalid = || ConfigError::InvalidColor {
        value: color.to_string(),
    };

    let digits = color
        .strip_prefix('#')
        .or_else(|| color.strip_prefix("0x"))
        .unwrap_or(color);
    if !digits.is_ascii() {
        return Err(invalid());
    }

    let (alpha, rgb) = match digits.len() {
        8 => (Some(&digits[..2]), &digits[2..]),
        6 => (None, digits),
        _ => return Err(invalid()),
    };

    let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    let mut out = Vec::with_capacity(4);
    out.push(byte(&rgb[0..2])?);
    out.push(byte(&rgb[2..4])?);
    out.push(byte(&rgb[4..6])?);
    if let Some(a) = alpha {
        out.push(byte(a)?);
    }
    Ok(out)
}

/// Uniform value in `[min, max)`, or exactly `min` when the range is degenerate.
///
/// The degenerate case never draws from `rng`, which keeps seeded runs
/// reproducible when a range is collapsed.
#[inline]
pub fn random_between(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    if min == max {
        min
    } else {
        rng.gen::<f32>() * (max - min) + min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_rotate_point_quarter_turn() {
        let mut p = Vec2::new(1.0, 0.0);
        rotate_point(90.0, &mut p);
        assert!(approx(p.x, 0.0));
        assert!(approx(p.y, 1.0));
    }

    #[test]
    fn test_rotate_point_zero_is_noop() {
        let mut p = Vec2::new(3.0, -2.0);
        rotate_point(0.0, &mut p);
        assert_eq!(p, Vec2::new(3.0, -2.0));
    }

    #[test]
    fn test_normalize_and_scale() {
        let mut p = Vec2::new(3.0, 4.0);
        assert!(approx(length(p), 5.0));
        normalize(&mut p);
        assert!(approx(length(p), 1.0));
        scale_by(&mut p, 10.0);
        assert!(approx(p.x, 6.0));
        assert!(approx(p.y, 8.0));
    }

    #[test]
    fn test_hex_round_trip() {
        for (text, value) in [("#000000", 0x000000), ("#FFFFFF", 0xFFFFFF), ("#A1B2C3", 0xA1B2C3)] {
            let rgb = hex_to_rgb(text).unwrap();
            assert_eq!(rgb.len(), 3);
            assert_eq!(combine_rgb_components(rgb[0], rgb[1], rgb[2]), value);
        }
    }

    #[test]
    fn test_hex_prefixes() {
        assert_eq!(hex_to_rgb("a1b2c3").unwrap(), vec![0xA1, 0xB2, 0xC3]);
        assert_eq!(hex_to_rgb("0xa1b2c3").unwrap(), vec![0xA1, 0xB2, 0xC3]);
        assert_eq!(hex_to_rgb("#7Fa1b2c3").unwrap(), vec![0xA1, 0xB2, 0xC3, 0x7F]);
        assert_eq!(hex_to_rgb("7Fa1b2c3").unwrap()[3], 0x7F);
    }

    #[test]
    fn test_hex_rejects_garbage() {
        assert!(hex_to_rgb("#12345").is_err());
        assert!(hex_to_rgb("#GG0000").is_err());
        assert!(hex_to_rgb("").is_err());
        assert!(hex_to_rgb("#ééé").is_err());
    }

    #[test]
    fn test_random_between_degenerate() {
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        assert_eq!(random_between(&mut rng, 2.5, 2.5), 2.5);
        let v = random_between(&mut rng, 0.0, 10.0);
        assert!((0.0..10.0).contains(&v));
    }
}
