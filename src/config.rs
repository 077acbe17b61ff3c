//! Emitter configuration.
//!
//! An [`EmitterConfig`] describes one effect: the ranges particles are drawn
//! from, the spawn shape and the emission schedule. It is usually loaded from
//! the JSON that particle editors export:
//!
//! ```
//! use spritefx::EmitterConfig;
//!
//! let config = EmitterConfig::from_json(r##"{
//!     "alpha": { "start": 1, "end": 0 },
//!     "speed": { "start": 200, "end": 50 },
//!     "scale": { "start": 1, "end": 0.3, "minimumScaleMultiplier": 0.5 },
//!     "color": { "start": "#fb1010", "end": "#f5b830" },
//!     "startRotation": { "min": 265, "max": 275 },
//!     "lifetime": { "min": 0.1, "max": 0.75 },
//!     "frequency": 0.001,
//!     "maxParticles": 1000,
//!     "pos": { "x": 0, "y": 0 },
//!     "spawnType": "circle",
//!     "spawnCircle": { "x": 0, "y": 0, "r": 10 }
//! }"##).unwrap();
//!
//! assert_eq!(config.max_particles, Some(1000));
//! ```
//!
//! or built in code:
//!
//! ```
//! use spritefx::EmitterConfig;
//!
//! let config = EmitterConfig::new()
//!     .with_lifetime(0.5, 1.0)
//!     .with_speed(100.0, 0.0)
//!     .with_spawn_burst(12, 30.0, 0.0)
//!     .with_frequency(0.5);
//! ```
//!
//! Missing sections fall back to neutral values when the emitter is
//! initialized (alpha 1, speed 0, scale 1, no tint change). A missing
//! `lifetime` is reported and leaves the emitter unable to show particles.

use crate::ease::{Ease, EaseSegment};
use crate::error::ConfigError;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// A value at particle birth and at particle death.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartEnd<T> {
    pub start: T,
    pub end: T,
}

impl<T> StartEnd<T> {
    pub fn new(start: T, end: T) -> Self {
        Self { start, end }
    }
}

/// Inclusive range a per-particle value is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MinMax {
    pub min: f32,
    pub max: f32,
}

impl MinMax {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A degenerate range: always exactly `value`.
    pub fn exact(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }
}

/// Scale over a particle's life, with per-particle variance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleConfig {
    pub start: f32,
    pub end: f32,
    /// Each particle's start and end scale are multiplied by one random
    /// value in `[minimumScaleMultiplier, 1]`. Absent or 0 means 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_scale_multiplier: Option<f32>,
}

/// 2D point in config space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Self {
        Vec2::new(p.x, p.y)
    }
}

impl From<Vec2> for Point {
    fn from(v: Vec2) -> Self {
        Point { x: v.x, y: v.y }
    }
}

/// Spawn rectangle, relative to the emitter position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectConfig {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Spawn circle or ring, relative to the emitter position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CircleConfig {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    /// Inner radius for rings.
    #[serde(rename = "minR", default, skip_serializing_if = "Option::is_none")]
    pub min_r: Option<f32>,
}

/// Full description of one particle effect.
///
/// Field names follow the JSON schema in camelCase. Every section is
/// optional in JSON; see the module docs for the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmitterConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<StartEnd<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<StartEnd<f32>>,
    /// Constant acceleration. When nonzero the speed stays at `speed.start`
    /// and is changed only by the acceleration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceleration: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleConfig>,
    /// Hex colors, e.g. `"#ff8800"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<StartEnd<String>>,
    /// Degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_rotation: Option<MinMax>,
    /// Degrees per second.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_speed: Option<MinMax>,
    /// Seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<MinMax>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<String>,
    /// Custom ease curve segments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ease: Option<Vec<EaseSegment>>,
    /// Code-supplied ease. Takes precedence over [`EmitterConfig::ease`].
    #[serde(skip)]
    pub custom_ease: Option<Ease>,
    /// Opaque data for particle variants (`path`, `fps`, `animationSpeed`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_data: Option<Value>,
    /// `point`, `rect`, `circle`, `ring` or `burst`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawn_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawn_rect: Option<RectConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawn_circle: Option<CircleConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub particles_per_wave: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub particle_spacing: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle_start: Option<f32>,
    /// Seconds between spawns.
    pub frequency: f32,
    /// Seconds the emitter runs before switching itself off. Absent, 0 or
    /// negative means forever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emitter_lifetime: Option<f32>,
    /// Absent or non-positive means 1000.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_particles: Option<i64>,
    pub add_at_back: bool,
    /// Spawn position relative to the owner.
    pub pos: Point,
}

impl EmitterConfig {
    /// An empty config. Needs at least a lifetime and a frequency to emit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serialize to pretty JSON. A code-supplied ease is not included.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_alpha(mut self, start: f32, end: f32) -> Self {
        self.alpha = Some(StartEnd::new(start, end));
        self
    }

    pub fn with_speed(mut self, start: f32, end: f32) -> Self {
        self.speed = Some(StartEnd::new(start, end));
        self
    }

    pub fn with_acceleration(mut self, x: f32, y: f32) -> Self {
        self.acceleration = Some(Point { x, y });
        self
    }

    pub fn with_scale(mut self, start: f32, end: f32, minimum_multiplier: f32) -> Self {
        self.scale = Some(ScaleConfig {
            start,
            end,
            minimum_scale_multiplier: Some(minimum_multiplier),
        });
        self
    }

    pub fn with_color(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.color = Some(StartEnd::new(start.into(), end.into()));
        self
    }

    /// Start rotation range in degrees.
    pub fn with_start_rotation(mut self, min: f32, max: f32) -> Self {
        self.start_rotation = Some(MinMax::new(min, max));
        self
    }

    /// Rotation speed range in degrees per second.
    pub fn with_rotation_speed(mut self, min: f32, max: f32) -> Self {
        self.rotation_speed = Some(MinMax::new(min, max));
        self
    }

    /// Particle lifetime range in seconds.
    pub fn with_lifetime(mut self, min: f32, max: f32) -> Self {
        self.lifetime = Some(MinMax::new(min, max));
        self
    }

    pub fn with_blend_mode(mut self, name: impl Into<String>) -> Self {
        self.blend_mode = Some(name.into());
        self
    }

    pub fn with_ease_segments(mut self, segments: Vec<EaseSegment>) -> Self {
        self.ease = Some(segments);
        self
    }

    pub fn with_custom_ease(mut self, ease: Ease) -> Self {
        self.custom_ease = Some(ease);
        self
    }

    pub fn with_extra_data(mut self, data: Value) -> Self {
        self.extra_data = Some(data);
        self
    }

    pub fn with_spawn_point(mut self) -> Self {
        self.spawn_type = Some("point".into());
        self
    }

    pub fn with_spawn_rect(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.spawn_type = Some("rect".into());
        self.spawn_rect = Some(RectConfig { x, y, w, h });
        self
    }

    pub fn with_spawn_circle(mut self, x: f32, y: f32, r: f32) -> Self {
        self.spawn_type = Some("circle".into());
        self.spawn_circle = Some(CircleConfig {
            x,
            y,
            r,
            min_r: None,
        });
        self
    }

    pub fn with_spawn_ring(mut self, x: f32, y: f32, r: f32, min_r: f32) -> Self {
        self.spawn_type = Some("ring".into());
        self.spawn_circle = Some(CircleConfig {
            x,
            y,
            r,
            min_r: Some(min_r),
        });
        self
    }

    /// Burst waves: `per_wave` particles fanned out `spacing` degrees apart
    /// starting at `angle_start`. A spacing of 0 randomizes each angle.
    pub fn with_spawn_burst(mut self, per_wave: u32, spacing: f32, angle_start: f32) -> Self {
        self.spawn_type = Some("burst".into());
        self.particles_per_wave = Some(per_wave);
        self.particle_spacing = Some(spacing);
        self.angle_start = Some(angle_start);
        self
    }

    pub fn with_frequency(mut self, seconds: f32) -> Self {
        self.frequency = seconds;
        self
    }

    pub fn with_emitter_lifetime(mut self, seconds: f32) -> Self {
        self.emitter_lifetime = Some(seconds);
        self
    }

    pub fn with_max_particles(mut self, max: i64) -> Self {
        self.max_particles = Some(max);
        self
    }

    pub fn with_add_at_back(mut self, at_back: bool) -> Self {
        self.add_at_back = at_back;
        self
    }

    pub fn with_pos(mut self, x: f32, y: f32) -> Self {
        self.pos = Point { x, y };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_editor_json() {
        let config = EmitterConfig::from_json(
            r##"{
                "alpha": { "start": 0.8, "end": 0.1 },
                "scale": { "start": 1, "end": 0.3 },
                "color": { "start": "#ffffff", "end": "#000000" },
                "startRotation": { "min": 0, "max": 360 },
                "lifetime": { "min": 0.2, "max": 0.8 },
                "blendMode": "add",
                "ease": [{ "s": 0, "cp": 0.3, "e": 1 }],
                "extraData": { "path": "sin(x)" },
                "spawnType": "ring",
                "spawnCircle": { "x": 0, "y": 0, "r": 40, "minR": 20 },
                "frequency": 0.008,
                "emitterLifetime": 0.31,
                "maxParticles": 500,
                "addAtBack": true,
                "pos": { "x": 3, "y": 4 }
            }"##,
        )
        .unwrap();

        assert_eq!(config.alpha, Some(StartEnd::new(0.8, 0.1)));
        assert_eq!(config.scale.unwrap().minimum_scale_multiplier, None);
        assert_eq!(config.lifetime, Some(MinMax::new(0.2, 0.8)));
        assert_eq!(config.blend_mode.as_deref(), Some("add"));
        assert_eq!(config.ease.as_ref().unwrap().len(), 1);
        assert_eq!(config.extra_data, Some(json!({ "path": "sin(x)" })));
        assert_eq!(config.spawn_circle.unwrap().min_r, Some(20.0));
        assert_eq!(config.emitter_lifetime, Some(0.31));
        assert!(config.add_at_back);
        assert_eq!(Vec2::from(config.pos), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_missing_sections_default() {
        let config = EmitterConfig::from_json("{}").unwrap();
        assert!(config.lifetime.is_none());
        assert_eq!(config.frequency, 0.0);
        assert_eq!(config.pos, Point::default());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = EmitterConfig::from_json(r#"{ "frequency": "often" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_builder_survives_json() {
        let config = EmitterConfig::new()
            .with_lifetime(1.0, 2.0)
            .with_spawn_burst(4, 90.0, 45.0)
            .with_frequency(0.25)
            .with_custom_ease(Ease::simple(|t| t));

        let json = config.to_json().unwrap();
        assert!(json.contains("\"particlesPerWave\": 4"));
        let back = EmitterConfig::from_json(&json).unwrap();
        assert_eq!(back.spawn_type.as_deref(), Some("burst"));
        assert_eq!(back.lifetime, config.lifetime);
        assert!(back.custom_ease.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = EmitterConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
