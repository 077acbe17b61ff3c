//! # spritefx - pooled 2D sprite particle emitters
//!
//! spritefx runs the simulation side of sprite particle effects (sparks,
//! smoke, confetti, trails) and leaves drawing to the host renderer.
//!
//! ## Quick Start
//!
//! ```
//! use spritefx::prelude::*;
//!
//! let config = EmitterConfig::new()
//!     .with_alpha(1.0, 0.0)
//!     .with_speed(200.0, 50.0)
//!     .with_scale(1.0, 0.2, 0.5)
//!     .with_color("#ffdd55", "#ff3300")
//!     .with_start_rotation(250.0, 290.0)
//!     .with_lifetime(0.4, 0.9)
//!     .with_spawn_circle(0.0, 0.0, 8.0)
//!     .with_frequency(0.01)
//!     .with_max_particles(300);
//!
//! let mut emitter = Emitter::new(DisplayList::new());
//! emitter.init(vec![TextureHandle::new(1).into()], &config);
//!
//! let mut instances = Vec::new();
//! for _ in 0..60 {
//!     emitter.update(1.0 / 60.0);
//!     instances.clear();
//!     emitter.write_instances(&mut instances);
//!     // upload `instances` and draw
//! }
//! assert!(!instances.is_empty());
//! ```
//!
//! ## Core Concepts
//!
//! ### Particles
//!
//! A particle interpolates alpha, scale, speed and tint from start to end
//! values over its lifetime. Three variants ship with the crate:
//!
//! | Kind | Behaviour |
//! |------|-----------|
//! | [`ParticleKind::Basic`] | straight-line movement |
//! | [`ParticleKind::Path`] | follows `y = f(x)` from `extraData.path` |
//! | [`ParticleKind::Animated`] | plays a frame sequence |
//!
//! Custom variants implement [`ParticleBehavior`] and are installed with
//! [`Emitter::set_particle_factory`].
//!
//! ### Emitters
//!
//! An [`Emitter`] draws each new particle's values from the ranges in its
//! [`EmitterConfig`], places it with a [`SpawnShape`] and keeps expired
//! particles in a pool for reuse.
//!
//! ### Rendering
//!
//! The emitter tells a [`ParticleContainer`] which particles to show, and
//! the renderer reads their visual fields or packed [`ParticleInstance`]s.
//! Textures are opaque [`TextureHandle`]s.

pub mod config;
pub mod ease;
mod emitter;
pub mod error;
pub mod expression;
pub mod particles;
pub mod render;
mod spawn;
pub mod textures;
pub mod utils;
pub mod visuals;

pub use bytemuck;
pub use config::{CircleConfig, EmitterConfig, MinMax, Point, RectConfig, ScaleConfig, StartEnd};
pub use ease::{generate_ease, Ease, EaseSegment};
pub use emitter::{Emitter, ParticleFactory, DEFAULT_MAX_PARTICLES};
pub use error::{ConfigError, PathError};
pub use expression::PathExpr;
pub use glam::Vec2;
pub use particles::{
    AnimatedParticle, BasicParticle, Particle, ParticleBehavior, ParticleKind, ParticleState,
    PathParticle, SharedExtraData,
};
pub use render::{DisplayList, ParticleContainer, ParticleId, ParticleInstance};
pub use spawn::{Placement, SpawnContext, SpawnShape};
pub use textures::{ParticleArt, TextureHandle};
pub use visuals::{get_blend_mode, BlendMode};

/// Convenient re-exports for common usage.
///
/// ```
/// use spritefx::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::EmitterConfig;
    pub use crate::ease::{Ease, EaseSegment};
    pub use crate::emitter::Emitter;
    pub use crate::particles::{Particle, ParticleBehavior, ParticleKind};
    pub use crate::render::{DisplayList, ParticleContainer, ParticleId, ParticleInstance};
    pub use crate::spawn::SpawnShape;
    pub use crate::textures::{ParticleArt, TextureHandle};
    pub use crate::visuals::BlendMode;
    pub use crate::Vec2;
}
