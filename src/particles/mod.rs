//! Particles: one visual effect instance each.
//!
//! Every particle variant wraps a [`Particle`], which holds the display
//! fields the renderer reads and the interpolation state the emitter fills
//! in before activation. Variants implement [`ParticleBehavior`] and override
//! only the steps they change.
//!
//! # Lifecycle
//!
//! ```text
//!  Uninitialized ──init──▶ Active ──update (age >= max_life)──▶ Expired
//!        ▲                                                          │
//!        └──────────────────── emitter pool ◀───────────────────────┘
//! ```
//!
//! # Variants
//!
//! | Type | Position update | Art |
//! |------|-----------------|-----|
//! | [`BasicParticle`] | straight line, speed/acceleration | one texture |
//! | [`PathParticle`] | `y = f(x)` along the spawn heading | one texture |
//! | [`AnimatedParticle`] | straight line | frame sequence |

mod animated;
mod basic;
mod path;

pub use animated::{AnimatedParticle, AnimationSettings, AnimationSpeed};
pub use basic::BasicParticle;
pub use path::PathParticle;

use crate::ease::Ease;
use crate::expression::PathExpr;
use crate::textures::{ParticleArt, TextureHandle};
use crate::utils::{combine_rgb_components, normalize, rotate_point, scale_by, DEG_TO_RADS};
use crate::visuals::BlendMode;
use glam::Vec2;
use std::cell::Cell;
use std::rc::Rc;

/// Acceleration vector shared between an emitter and the particles it spawned.
///
/// Particles only read it; changing it through the emitter affects every
/// live particle at once.
pub type SharedVec2 = Rc<Cell<Vec2>>;

/// Where a particle is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParticleState {
    /// Freshly allocated or sitting in the pool.
    #[default]
    Uninitialized,
    /// Spawned and being updated.
    Active,
    /// Lifetime used up; waiting to be reclaimed.
    Expired,
}

/// Shared state for one particle: display fields plus interpolation state.
///
/// The emitter writes the `start_*`/`end_*` fields, `rotation` (degrees) and
/// `rotation_speed` (degrees/second) before calling [`Particle::init`];
/// activation converts both angles to radians.
#[derive(Debug, Clone)]
pub struct Particle {
    /// World position.
    pub position: Vec2,
    /// Rotation. Degrees before `init`, radians after.
    pub rotation: f32,
    /// Uniform scale.
    pub scale: f32,
    /// Opacity.
    pub alpha: f32,
    /// Tint as `0xRRGGBB`.
    pub tint: u32,
    /// Blend mode for the renderer.
    pub blend_mode: BlendMode,
    /// Whether the renderer should draw this particle.
    pub visible: bool,
    /// Texture currently shown.
    pub texture: Option<TextureHandle>,

    /// Seconds since activation.
    pub age: f32,
    /// Lifetime in seconds.
    pub max_life: f32,
    /// Velocity in units/second. Direction is fixed at activation.
    pub velocity: Vec2,
    /// Alpha at birth.
    pub start_alpha: f32,
    /// Alpha at death.
    pub end_alpha: f32,
    /// Speed at birth.
    pub start_speed: f32,
    /// Speed at death.
    pub end_speed: f32,
    /// Scale at birth.
    pub start_scale: f32,
    /// Scale at death.
    pub end_scale: f32,
    /// Tint at birth.
    pub start_color: Option<[u8; 3]>,
    /// Tint at death. `None` keeps the start tint.
    pub end_color: Option<[u8; 3]>,
    /// Spin. Degrees/second before `init`, radians/second after.
    pub rotation_speed: f32,
    /// Constant acceleration, shared with the emitter.
    pub acceleration: Option<SharedVec2>,
    /// Progress remapping.
    pub ease: Option<Ease>,
    /// Variant-specific settings from the emitter config.
    pub extra_data: Option<Rc<serde_json::Value>>,

    pub(crate) attached: bool,
    state: ParticleState,
    heading: Vec2,
    start_rgb: [f32; 3],
    end_rgb: [f32; 3],
    do_alpha: bool,
    do_scale: bool,
    do_speed: bool,
    do_color: bool,
    do_normal_movement: bool,
    one_over_life: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self::new()
    }
}

impl Particle {
    /// An inactive particle with neutral values.
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: 1.0,
            alpha: 1.0,
            tint: 0xFFFFFF,
            blend_mode: BlendMode::Normal,
            visible: false,
            texture: None,
            age: 0.0,
            max_life: 0.0,
            velocity: Vec2::ZERO,
            start_alpha: 0.0,
            end_alpha: 0.0,
            start_speed: 0.0,
            end_speed: 0.0,
            start_scale: 0.0,
            end_scale: 0.0,
            start_color: None,
            end_color: None,
            rotation_speed: 0.0,
            acceleration: None,
            ease: None,
            extra_data: None,
            attached: false,
            state: ParticleState::Uninitialized,
            heading: Vec2::X,
            start_rgb: [255.0; 3],
            end_rgb: [255.0; 3],
            do_alpha: false,
            do_scale: false,
            do_speed: false,
            do_color: false,
            do_normal_movement: false,
            one_over_life: 0.0,
        }
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> ParticleState {
        self.state
    }

    /// Whether the particle is being updated.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == ParticleState::Active
    }

    /// Whether the particle moves by its own velocity each update.
    #[inline]
    pub fn normal_movement(&self) -> bool {
        self.do_normal_movement
    }

    /// Let a variant take over position updates (`false`) or hand them back.
    #[inline]
    pub fn set_normal_movement(&mut self, enabled: bool) {
        self.do_normal_movement = enabled;
    }

    /// Activate with the current spawn parameters.
    ///
    /// Must run exactly once per activation: it converts `rotation` and
    /// `rotation_speed` from degrees to radians in place.
    pub fn init(&mut self) {
        self.age = 0.0;

        self.heading = Vec2::X;
        rotate_point(self.rotation, &mut self.heading);
        self.velocity = Vec2::new(self.start_speed, 0.0);
        rotate_point(self.rotation, &mut self.velocity);

        self.rotation *= DEG_TO_RADS;
        self.rotation_speed *= DEG_TO_RADS;

        self.alpha = self.start_alpha;
        self.scale = self.start_scale;

        self.start_rgb = self.start_color.map_or([255.0; 3], channels);
        if let Some(end) = self.end_color {
            self.end_rgb = channels(end);
        }

        self.do_alpha = self.start_alpha != self.end_alpha;
        self.do_speed = self.start_speed != self.end_speed;
        self.do_scale = self.start_scale != self.end_scale;
        self.do_color = self.end_color.is_some();
        self.do_normal_movement =
            self.do_speed || self.start_speed != 0.0 || self.acceleration.is_some();

        self.one_over_life = 1.0 / self.max_life;
        self.tint = tint_of(self.start_rgb);
        self.visible = true;
        self.state = ParticleState::Active;
    }

    /// Advance by `delta` seconds.
    ///
    /// Returns the (eased) progress, or `None` on the call that uses up the
    /// lifetime. An expired particle must not be updated again until it is
    /// re-initialized.
    pub fn update(&mut self, delta: f32) -> Option<f32> {
        debug_assert!(self.is_active(), "update on a {:?} particle", self.state);

        self.age += delta;
        if self.age >= self.max_life {
            self.kill();
            return None;
        }

        let mut lerp = self.age * self.one_over_life;
        if let Some(ease) = &self.ease {
            lerp = ease.apply(lerp);
        }

        if self.do_alpha {
            self.alpha = (self.end_alpha - self.start_alpha) * lerp + self.start_alpha;
        }
        if self.do_scale {
            self.scale = (self.end_scale - self.start_scale) * lerp + self.start_scale;
        }

        if self.do_normal_movement {
            if self.do_speed {
                let speed = self.speed_at(lerp);
                if self.velocity.length_squared() > 0.0 {
                    normalize(&mut self.velocity);
                } else {
                    self.velocity = self.heading;
                }
                scale_by(&mut self.velocity, speed);
            } else if let Some(acceleration) = &self.acceleration {
                self.velocity += acceleration.get() * delta;
            }
            self.position += self.velocity * delta;
        }

        if self.do_color {
            let [sr, sg, sb] = self.start_rgb;
            let [er, eg, eb] = self.end_rgb;
            self.tint = tint_of([
                (er - sr) * lerp + sr,
                (eg - sg) * lerp + sg,
                (eb - sb) * lerp + sb,
            ]);
        }

        if self.rotation_speed != 0.0 {
            self.rotation += self.rotation_speed * delta;
        } else if self.acceleration.is_some() {
            self.rotation = self.velocity.y.atan2(self.velocity.x);
        }

        Some(lerp)
    }

    /// Speed blended between start and end at `lerp`.
    #[inline]
    pub fn speed_at(&self, lerp: f32) -> f32 {
        (self.end_speed - self.start_speed) * lerp + self.start_speed
    }

    /// Mark the lifetime as used up. The owning emitter reclaims the particle.
    pub fn kill(&mut self) {
        self.state = ParticleState::Expired;
    }

    /// Return to the pooled state. Called by the emitter on recycle.
    pub(crate) fn reset_for_pool(&mut self) {
        self.state = ParticleState::Uninitialized;
    }

    /// Drop everything this particle references.
    pub fn destroy(&mut self) {
        debug_assert!(!self.is_active(), "destroying an active particle");
        self.velocity = Vec2::ZERO;
        self.start_color = None;
        self.end_color = None;
        self.acceleration = None;
        self.ease = None;
        self.extra_data = None;
        self.texture = None;
        self.visible = false;
        self.state = ParticleState::Uninitialized;
    }
}

fn channels(rgb: [u8; 3]) -> [f32; 3] {
    rgb.map(f32::from)
}

fn tint_of([r, g, b]: [f32; 3]) -> u32 {
    combine_rgb_components(r as u8, g as u8, b as u8)
}

/// Emitter-owned scratch data shared by every particle it spawns.
///
/// Variants cache values derived from `extra_data` here so that the work is
/// done once per configuration rather than once per particle. The emitter
/// resets it whenever it is re-initialized.
#[derive(Debug, Default)]
pub struct SharedExtraData {
    pub(crate) path: PathCache,
    pub(crate) animation: Option<AnimationSettings>,
}

impl SharedExtraData {
    /// Fresh, empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Compiled path expression cache.
#[derive(Debug, Clone, Default)]
pub(crate) enum PathCache {
    #[default]
    Unresolved,
    Ready(Rc<PathExpr>),
    Failed,
}

/// The lifecycle contract every particle variant satisfies.
///
/// Defaults forward to the wrapped [`Particle`]; variants override the
/// steps they change and call the base behaviour through
/// [`ParticleBehavior::particle_mut`].
pub trait ParticleBehavior {
    /// Shared state.
    fn particle(&self) -> &Particle;

    /// Shared state, mutably.
    fn particle_mut(&mut self) -> &mut Particle;

    /// Activate after the emitter wrote the spawn parameters.
    fn init(&mut self, _shared: &mut SharedExtraData) {
        self.particle_mut().init();
    }

    /// Advance by `delta` seconds; `None` on expiry.
    fn update(&mut self, delta: f32) -> Option<f32> {
        self.particle_mut().update(delta)
    }

    /// Show `art`.
    fn apply_art(&mut self, art: &ParticleArt) {
        self.particle_mut().texture = art.first();
    }

    /// Permanently release references. Never called on an active particle.
    fn destroy(&mut self) {
        self.particle_mut().destroy();
    }
}

/// Built-in particle variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParticleKind {
    /// [`BasicParticle`].
    #[default]
    Basic,
    /// [`PathParticle`].
    Path,
    /// [`AnimatedParticle`].
    Animated,
}

impl ParticleKind {
    /// Allocate a fresh particle of this kind.
    pub fn create(self) -> Box<dyn ParticleBehavior> {
        match self {
            ParticleKind::Basic => Box::new(BasicParticle::new()),
            ParticleKind::Path => Box::new(PathParticle::new()),
            ParticleKind::Animated => Box::new(AnimatedParticle::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawned(max_life: f32) -> Particle {
        let mut p = Particle::new();
        p.max_life = max_life;
        p.start_alpha = 1.0;
        p.end_alpha = 0.0;
        p.start_scale = 1.0;
        p.end_scale = 1.0;
        p
    }

    #[test]
    fn test_init_converts_angles_once() {
        let mut p = spawned(1.0);
        p.rotation = 90.0;
        p.rotation_speed = 180.0;
        p.start_speed = 10.0;
        p.end_speed = 10.0;
        p.init();

        assert!((p.rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert!((p.rotation_speed - std::f32::consts::PI).abs() < 1e-5);
        assert!(p.velocity.x.abs() < 1e-4);
        assert!((p.velocity.y - 10.0).abs() < 1e-4);
        assert!(p.normal_movement());
        assert!(p.visible);
        assert_eq!(p.state(), ParticleState::Active);
    }

    #[test]
    fn test_update_interpolates_and_expires() {
        let mut p = spawned(2.0);
        p.init();

        let lerp = p.update(0.5).unwrap();
        assert!((lerp - 0.25).abs() < 1e-6);
        assert!((p.alpha - 0.75).abs() < 1e-6);

        assert!(p.update(1.0).is_some());
        assert_eq!(p.update(0.5), None);
        assert_eq!(p.state(), ParticleState::Expired);
    }

    #[test]
    fn test_no_start_color_is_white() {
        let mut p = spawned(1.0);
        p.init();
        assert_eq!(p.tint, 0xFFFFFF);
    }

    #[test]
    fn test_color_interpolation() {
        let mut p = spawned(1.0);
        p.start_color = Some([0, 0, 0]);
        p.end_color = Some([200, 100, 50]);
        p.init();
        assert_eq!(p.tint, 0x000000);
        p.update(0.5);
        assert_eq!(p.tint, combine_rgb_components(100, 50, 25));
    }

    #[test]
    fn test_speed_interpolation_from_zero_uses_heading() {
        let mut p = spawned(1.0);
        p.rotation = 180.0;
        p.start_speed = 0.0;
        p.end_speed = 10.0;
        p.init();
        p.update(0.5);
        assert!(p.velocity.x < -4.9 && p.velocity.x > -5.1);
        assert!(p.position.x < 0.0);
        assert!(p.position.is_finite());
    }

    #[test]
    fn test_acceleration_integrates_and_faces_velocity() {
        let mut p = spawned(10.0);
        p.acceleration = Some(Rc::new(Cell::new(Vec2::new(0.0, 10.0))));
        p.init();
        assert!(p.normal_movement());

        p.update(1.0);
        assert_eq!(p.velocity, Vec2::new(0.0, 10.0));
        assert_eq!(p.position, Vec2::new(0.0, 10.0));
        assert!((p.rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_ease_is_applied() {
        let mut p = spawned(1.0);
        p.ease = Some(Ease::simple(|t| t * t));
        p.init();
        let lerp = p.update(0.5).unwrap();
        assert!((lerp - 0.25).abs() < 1e-6);
        assert!((p.alpha - 0.75).abs() < 1e-6);
    }
}
