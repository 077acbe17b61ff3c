//! Visual tokens handed to the host renderer.
//!
//! Particles carry a [`BlendMode`] chosen by the emitter configuration. The
//! renderer decides what each mode means; this crate only resolves names.
//!
//! ```
//! use spritefx::visuals::{get_blend_mode, BlendMode};
//!
//! assert_eq!(get_blend_mode(Some("add")), BlendMode::Add);
//! assert_eq!(get_blend_mode(Some("color dodge")), BlendMode::ColorDodge);
//! assert_eq!(get_blend_mode(Some("nope")), BlendMode::Normal);
//! assert_eq!(get_blend_mode(None), BlendMode::Normal);
//! ```

use serde::{Deserialize, Serialize};

/// Blend mode for particle rendering.
///
/// Discriminants are stable and are what [`crate::ParticleInstance`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum BlendMode {
    /// Standard alpha blending (default).
    #[default]
    Normal = 0,
    /// Additive blending. Overlapping particles glow.
    Add = 1,
    /// Multiplicative blending. Darkens what is behind.
    Multiply = 2,
    /// Inverse multiply of inverses. Lightens what is behind.
    Screen = 3,
    /// Multiply or screen depending on the destination.
    Overlay = 4,
    /// Keeps the darker of source and destination.
    Darken = 5,
    /// Keeps the lighter of source and destination.
    Lighten = 6,
    /// Brightens the destination to reflect the source.
    ColorDodge = 7,
    /// Darkens the destination to reflect the source.
    ColorBurn = 8,
    /// Multiply or screen depending on the source.
    HardLight = 9,
    /// Softer variant of hard light.
    SoftLight = 10,
    /// Absolute difference.
    Difference = 11,
    /// Lower-contrast difference.
    Exclusion = 12,
    /// Source hue, destination saturation and luminosity.
    Hue = 13,
    /// Source saturation.
    Saturation = 14,
    /// Source hue and saturation.
    Color = 15,
    /// Source luminosity.
    Luminosity = 16,
}

impl BlendMode {
    /// Look up a mode by its canonical upper-snake name (`"COLOR_DODGE"`).
    pub fn from_canonical(name: &str) -> Option<Self> {
        Some(match name {
            "NORMAL" => BlendMode::Normal,
            "ADD" => BlendMode::Add,
            "MULTIPLY" => BlendMode::Multiply,
            "SCREEN" => BlendMode::Screen,
            "OVERLAY" => BlendMode::Overlay,
            "DARKEN" => BlendMode::Darken,
            "LIGHTEN" => BlendMode::Lighten,
            "COLOR_DODGE" => BlendMode::ColorDodge,
            "COLOR_BURN" => BlendMode::ColorBurn,
            "HARD_LIGHT" => BlendMode::HardLight,
            "SOFT_LIGHT" => BlendMode::SoftLight,
            "DIFFERENCE" => BlendMode::Difference,
            "EXCLUSION" => BlendMode::Exclusion,
            "HUE" => BlendMode::Hue,
            "SATURATION" => BlendMode::Saturation,
            "COLOR" => BlendMode::Color,
            "LUMINOSITY" => BlendMode::Luminosity,
            _ => return None,
        })
    }
}

/// Resolve a symbolic blend-mode name, falling back to [`BlendMode::Normal`].
///
/// Matching is case-insensitive and treats spaces as underscores, so
/// `"soft light"`, `"Soft_Light"` and `"SOFT_LIGHT"` are the same mode.
pub fn get_blend_mode(name: Option<&str>) -> BlendMode {
    let Some(name) = name.filter(|n| !n.is_empty()) else {
        return BlendMode::Normal;
    };
    let canonical = name.to_uppercase().replace(' ', "_");
    BlendMode::from_canonical(&canonical).unwrap_or_else(|| {
        log::debug!("Unknown blend mode {name:?}, using normal");
        BlendMode::Normal
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_mode_lookup() {
        assert_eq!(get_blend_mode(Some("multiply")), BlendMode::Multiply);
        assert_eq!(get_blend_mode(Some("Hard Light")), BlendMode::HardLight);
        assert_eq!(get_blend_mode(Some("")), BlendMode::Normal);
    }

    #[test]
    fn test_blend_mode_discriminants() {
        assert_eq!(BlendMode::Normal as u32, 0);
        assert_eq!(BlendMode::Luminosity as u32, 16);
    }
}
