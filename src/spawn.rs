//! Spawn shapes: where a new particle appears and which way it faces.
//!
//! # Shapes
//!
//! | Shape | Position | Rotation |
//! |-------|----------|----------|
//! | [`SpawnShape::Point`] | emission point | start rotation range |
//! | [`SpawnShape::Rect`] | random point in a rectangle | start rotation range |
//! | [`SpawnShape::Circle`] | random point in a disc | start rotation range |
//! | [`SpawnShape::Ring`] | random point in an annulus | range + angle around the ring |
//! | [`SpawnShape::Burst`] | emission point | fanned out by wave index |
//!
//! Offsets are rotated by the emitter's rotation before being added to the
//! emission point. All angles are in degrees.

use crate::config::{EmitterConfig, MinMax};
use crate::error::ConfigError;
use crate::utils::{random_between, rotate_point};
use glam::Vec2;
use rand::{Rng, RngCore};

/// Particle placement strategy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SpawnShape {
    /// Spawn exactly at the emission point.
    #[default]
    Point,

    /// Spawn anywhere in an axis-aligned rectangle (before emitter rotation).
    Rect {
        /// Top-left corner, relative to the emission point.
        origin: Vec2,
        /// Width and height.
        size: Vec2,
    },

    /// Spawn anywhere in a disc.
    Circle {
        /// Center, relative to the emission point.
        center: Vec2,
        /// Disc radius.
        radius: f32,
    },

    /// Spawn in an annulus, facing along the spawn angle.
    Ring {
        /// Center, relative to the emission point.
        center: Vec2,
        /// Outer radius.
        radius: f32,
        /// Inner radius. Equal to `radius` for a thin ring.
        min_radius: f32,
    },

    /// Spawn waves of particles at the emission point, fanned out.
    Burst {
        /// Particles per spawn event.
        particles_per_wave: usize,
        /// Degrees between consecutive particles. 0 = random directions.
        particle_spacing: f32,
        /// Direction of the first particle in a wave.
        angle_start: f32,
    },
}

impl SpawnShape {
    /// Build the shape named by `config.spawn_type`.
    ///
    /// An absent type is a point. Errors describe a shape that cannot be
    /// built; callers fall back to [`SpawnShape::Point`].
    pub fn from_config(config: &EmitterConfig) -> Result<Self, ConfigError> {
        match config.spawn_type.as_deref() {
            None | Some("point") => Ok(SpawnShape::Point),
            Some("rect") | Some("rectangle") => {
                let rect = config.spawn_rect.ok_or(ConfigError::MissingSpawnRect)?;
                Ok(SpawnShape::Rect {
                    origin: Vec2::new(rect.x, rect.y),
                    size: Vec2::new(rect.w, rect.h),
                })
            }
            Some("circle") => {
                let circle = config
                    .spawn_circle
                    .ok_or(ConfigError::MissingSpawnCircle("circle"))?;
                Ok(SpawnShape::Circle {
                    center: Vec2::new(circle.x, circle.y),
                    radius: circle.r,
                })
            }
            Some("ring") => {
                let circle = config
                    .spawn_circle
                    .ok_or(ConfigError::MissingSpawnCircle("ring"))?;
                Ok(SpawnShape::Ring {
                    center: Vec2::new(circle.x, circle.y),
                    radius: circle.r,
                    min_radius: circle.min_r.unwrap_or(0.0),
                })
            }
            Some("burst") => Ok(SpawnShape::Burst {
                particles_per_wave: config.particles_per_wave.unwrap_or(1).max(1) as usize,
                particle_spacing: config.particle_spacing.unwrap_or(0.0),
                angle_start: config.angle_start.unwrap_or(0.0),
            }),
            Some(other) => Err(ConfigError::UnknownSpawnType(other.to_string())),
        }
    }

    /// Config name of this shape.
    pub fn name(&self) -> &'static str {
        match self {
            SpawnShape::Point => "point",
            SpawnShape::Rect { .. } => "rect",
            SpawnShape::Circle { .. } => "circle",
            SpawnShape::Ring { .. } => "ring",
            SpawnShape::Burst { .. } => "burst",
        }
    }

    /// Particles created per spawn event.
    #[inline]
    pub fn wave_size(&self) -> usize {
        match self {
            SpawnShape::Burst {
                particles_per_wave, ..
            } => *particles_per_wave,
            _ => 1,
        }
    }

    /// Pick a rotation and position for one particle.
    pub fn place(&self, ctx: &mut SpawnContext<'_>) -> Placement {
        match *self {
            SpawnShape::Point => Placement {
                rotation: ctx.start_rotation(),
                position: ctx.origin,
            },
            SpawnShape::Rect { origin, size } => {
                let rotation = ctx.start_rotation();
                let mut offset = Vec2::new(
                    ctx.random() * size.x + origin.x,
                    ctx.random() * size.y + origin.y,
                );
                rotate_point(ctx.emitter_rotation, &mut offset);
                Placement {
                    rotation,
                    position: ctx.origin + offset,
                }
            }
            SpawnShape::Circle { center, radius } => {
                let rotation = ctx.start_rotation();
                let mut offset = Vec2::new(ctx.random() * radius, 0.0);
                rotate_point(ctx.random() * 360.0, &mut offset);
                offset += center;
                rotate_point(ctx.emitter_rotation, &mut offset);
                Placement {
                    rotation,
                    position: ctx.origin + offset,
                }
            }
            SpawnShape::Ring {
                center,
                radius,
                min_radius,
            } => {
                let mut rotation = ctx.start_rotation();
                let mut offset = Vec2::new(ctx.random_between(min_radius, radius), 0.0);
                let angle = ctx.random() * 360.0;
                rotation += angle;
                rotate_point(angle, &mut offset);
                offset += center;
                rotate_point(ctx.emitter_rotation, &mut offset);
                Placement {
                    rotation,
                    position: ctx.origin + offset,
                }
            }
            SpawnShape::Burst {
                particle_spacing,
                angle_start,
                ..
            } => {
                let rotation = if particle_spacing == 0.0 {
                    ctx.random() * 360.0
                } else {
                    angle_start + particle_spacing * ctx.wave_index as f32 + ctx.emitter_rotation
                };
                Placement {
                    rotation,
                    position: ctx.origin,
                }
            }
        }
    }
}

/// Where and which way one particle starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Degrees.
    pub rotation: f32,
    pub position: Vec2,
}

/// Inputs for placing one particle of a wave.
pub struct SpawnContext<'a> {
    /// Emission point for this spawn event.
    pub origin: Vec2,
    /// Emitter rotation in degrees.
    pub emitter_rotation: f32,
    /// Start rotation range in degrees.
    pub start_rotation: MinMax,
    /// Index of the particle within its wave.
    pub wave_index: usize,
    rng: &'a mut dyn RngCore,
}

impl<'a> SpawnContext<'a> {
    pub fn new(
        rng: &'a mut dyn RngCore,
        origin: Vec2,
        emitter_rotation: f32,
        start_rotation: MinMax,
        wave_index: usize,
    ) -> Self {
        Self {
            origin,
            emitter_rotation,
            start_rotation,
            wave_index,
            rng,
        }
    }

    /// Random f32 in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`, exactly `min` without a draw when equal.
    #[inline]
    pub fn random_between(&mut self, min: f32, max: f32) -> f32 {
        random_between(&mut *self.rng, min, max)
    }

    /// A start rotation offset by the emitter's rotation.
    #[inline]
    pub fn start_rotation(&mut self) -> f32 {
        let MinMax { min, max } = self.start_rotation;
        self.random_between(min, max) + self.emitter_rotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_from_config_fallbacks() {
        let config = EmitterConfig::new();
        assert_eq!(SpawnShape::from_config(&config).unwrap(), SpawnShape::Point);

        let mut config = EmitterConfig::new();
        config.spawn_type = Some("rect".into());
        assert!(matches!(
            SpawnShape::from_config(&config),
            Err(ConfigError::MissingSpawnRect)
        ));

        config.spawn_type = Some("spiral".into());
        assert!(matches!(
            SpawnShape::from_config(&config),
            Err(ConfigError::UnknownSpawnType(name)) if name == "spiral"
        ));

        let config = EmitterConfig::new().with_spawn_ring(1.0, 2.0, 30.0, 10.0);
        assert_eq!(
            SpawnShape::from_config(&config).unwrap(),
            SpawnShape::Ring {
                center: Vec2::new(1.0, 2.0),
                radius: 30.0,
                min_radius: 10.0
            }
        );
    }

    #[test]
    fn test_point_uses_fixed_rotation_without_drawing() {
        let mut rng = StepRng::new(u64::MAX / 2, 0);
        let mut ctx = SpawnContext::new(&mut rng, Vec2::new(5.0, 6.0), 10.0, MinMax::exact(30.0), 0);
        let placement = SpawnShape::Point.place(&mut ctx);
        assert_eq!(placement.rotation, 40.0);
        assert_eq!(placement.position, Vec2::new(5.0, 6.0));
    }

    #[test]
    fn test_rect_stays_inside() {
        let mut rng = SmallRng::seed_from_u64(7);
        let shape = SpawnShape::Rect {
            origin: Vec2::new(-10.0, -5.0),
            size: Vec2::new(20.0, 10.0),
        };
        for _ in 0..100 {
            let mut ctx = SpawnContext::new(&mut rng, Vec2::ZERO, 0.0, MinMax::default(), 0);
            let p = shape.place(&mut ctx).position;
            assert!((-10.0..10.0).contains(&p.x));
            assert!((-5.0..5.0).contains(&p.y));
        }
    }

    #[test]
    fn test_rect_offset_follows_emitter_rotation() {
        let mut rng = StepRng::new(0, 0);
        let shape = SpawnShape::Rect {
            origin: Vec2::new(10.0, 0.0),
            size: Vec2::ZERO,
        };
        let mut ctx = SpawnContext::new(&mut rng, Vec2::new(1.0, 1.0), 90.0, MinMax::default(), 0);
        let placement = shape.place(&mut ctx);
        assert!(approx(placement.position, Vec2::new(1.0, 11.0)));
        assert_eq!(placement.rotation, 90.0);
    }

    #[test]
    fn test_circle_stays_inside() {
        let mut rng = SmallRng::seed_from_u64(11);
        let shape = SpawnShape::Circle {
            center: Vec2::new(100.0, 0.0),
            radius: 25.0,
        };
        for _ in 0..100 {
            let mut ctx = SpawnContext::new(&mut rng, Vec2::ZERO, 0.0, MinMax::default(), 0);
            let p = shape.place(&mut ctx).position;
            assert!(p.distance(Vec2::new(100.0, 0.0)) <= 25.0 + 1e-3);
        }
    }

    #[test]
    fn test_ring_radius_bounds() {
        let mut rng = SmallRng::seed_from_u64(3);
        let shape = SpawnShape::Ring {
            center: Vec2::ZERO,
            radius: 50.0,
            min_radius: 40.0,
        };
        for _ in 0..100 {
            let mut ctx = SpawnContext::new(&mut rng, Vec2::ZERO, 0.0, MinMax::default(), 0);
            let placement = shape.place(&mut ctx);
            let r = placement.position.length();
            assert!((40.0 - 1e-3..=50.0 + 1e-3).contains(&r));
            let facing = placement.rotation.to_radians();
            let expected = Vec2::new(facing.cos(), facing.sin()) * r;
            assert!(approx(placement.position, expected));
        }
    }

    #[test]
    fn test_thin_ring_is_exact_radius() {
        let mut rng = SmallRng::seed_from_u64(5);
        let shape = SpawnShape::Ring {
            center: Vec2::ZERO,
            radius: 30.0,
            min_radius: 30.0,
        };
        let mut ctx = SpawnContext::new(&mut rng, Vec2::ZERO, 0.0, MinMax::default(), 0);
        let r = shape.place(&mut ctx).position.length();
        assert!((r - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_burst_fans_out() {
        let mut rng = StepRng::new(0, 0);
        let shape = SpawnShape::Burst {
            particles_per_wave: 4,
            particle_spacing: 90.0,
            angle_start: 15.0,
        };
        assert_eq!(shape.wave_size(), 4);
        let rotations: Vec<f32> = (0..4)
            .map(|i| {
                let mut ctx = SpawnContext::new(&mut rng, Vec2::ZERO, 5.0, MinMax::default(), i);
                shape.place(&mut ctx).rotation
            })
            .collect();
        assert_eq!(rotations, vec![20.0, 110.0, 200.0, 290.0]);
    }
}
