//! Flipbook particles.
//!
//! Settings come from `extraData`:
//!
//! | Key | Default | Meaning |
//! |-----|---------|---------|
//! | `fps` | 60 | base frame rate |
//! | `animationSpeed` | 1 | multiplier on `fps`, or `"matchLife"` |
//!
//! With `"matchLife"` the sequence plays exactly once over the particle's
//! lifetime and holds the last frame; otherwise it loops.

use super::{Particle, ParticleBehavior, SharedExtraData};
use crate::textures::{ParticleArt, TextureHandle};
use serde_json::Value;

/// Default frame rate when `extraData.fps` is absent.
pub const DEFAULT_FPS: f32 = 60.0;

/// How fast frames advance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationSpeed {
    /// Multiplier on the base frame rate. Loops.
    Relative(f32),
    /// Stretch one pass over the whole lifetime. Does not loop.
    MatchLife,
}

/// Parsed animation settings, cached per emitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSettings {
    pub fps: f32,
    pub speed: AnimationSpeed,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            speed: AnimationSpeed::Relative(1.0),
        }
    }
}

impl AnimationSettings {
    /// Read settings from a particle's extra data.
    ///
    /// Zero or non-numeric values fall back to the defaults.
    pub fn from_extra_data(data: Option<&Value>) -> Self {
        let Some(data) = data else {
            return Self::default();
        };
        let fps = data
            .get("fps")
            .and_then(Value::as_f64)
            .map(|v| v as f32)
            .filter(|&v| v > 0.0)
            .unwrap_or(DEFAULT_FPS);
        let speed = match data.get("animationSpeed") {
            Some(Value::String(s)) if s == "matchLife" => AnimationSpeed::MatchLife,
            Some(v) => match v.as_f64().map(|v| v as f32) {
                Some(v) if v != 0.0 => AnimationSpeed::Relative(v),
                _ => AnimationSpeed::Relative(1.0),
            },
            None => AnimationSpeed::Relative(1.0),
        };
        Self { fps, speed }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnimatedParticle {
    core: Particle,
    frames: Vec<TextureHandle>,
    /// Frames per second of particle time.
    frame_rate: f32,
    looping: bool,
    elapsed: f32,
    current_frame: usize,
}

impl AnimatedParticle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame sequence being played.
    pub fn frames(&self) -> &[TextureHandle] {
        &self.frames
    }

    /// Index of the frame currently shown.
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Frames per second, after `animationSpeed` is applied.
    pub fn frame_rate(&self) -> f32 {
        self.frame_rate
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    fn goto_frame(&mut self, frame: usize) {
        self.current_frame = frame;
        self.core.texture = self.frames.get(frame).copied();
    }

    fn advance(&mut self, delta: f32) {
        let len = self.frames.len();
        if len == 0 {
            return;
        }
        self.elapsed += delta;
        let frame = (self.elapsed * self.frame_rate).max(0.0) as usize;
        let frame = if self.looping {
            frame % len
        } else {
            frame.min(len - 1)
        };
        if frame != self.current_frame {
            self.goto_frame(frame);
        }
    }
}

impl ParticleBehavior for AnimatedParticle {
    fn particle(&self) -> &Particle {
        &self.core
    }

    fn particle_mut(&mut self) -> &mut Particle {
        &mut self.core
    }

    fn init(&mut self, shared: &mut SharedExtraData) {
        self.core.init();

        let settings = *shared.animation.get_or_insert_with(|| {
            AnimationSettings::from_extra_data(self.core.extra_data.as_deref())
        });
        match settings.speed {
            AnimationSpeed::MatchLife => {
                self.looping = false;
                self.frame_rate = self.frames.len() as f32 / self.core.max_life;
            }
            AnimationSpeed::Relative(speed) => {
                self.looping = true;
                self.frame_rate = settings.fps * speed;
            }
        }
        self.elapsed = 0.0;
        self.goto_frame(0);
    }

    fn update(&mut self, delta: f32) -> Option<f32> {
        let lerp = self.core.update(delta)?;
        self.advance(delta);
        Some(lerp)
    }

    fn apply_art(&mut self, art: &ParticleArt) {
        // Reuses the buffer, so a single texture does not allocate per spawn.
        self.frames.clear();
        match art {
            ParticleArt::Texture(t) => self.frames.push(*t),
            ParticleArt::Frames(frames) => self.frames.extend_from_slice(frames),
        }
        self.goto_frame(0);
    }

    fn destroy(&mut self) {
        self.frames = Vec::new();
        self.core.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frames(n: u32) -> ParticleArt {
        ParticleArt::Frames((0..n).map(TextureHandle::new).collect())
    }

    fn animated(extra: Value, max_life: f32) -> AnimatedParticle {
        let mut p = AnimatedParticle::new();
        p.particle_mut().max_life = max_life;
        p.particle_mut().extra_data = Some(std::rc::Rc::new(extra));
        p
    }

    #[test]
    fn test_settings_parsing() {
        assert_eq!(AnimationSettings::from_extra_data(None), AnimationSettings::default());
        let s = AnimationSettings::from_extra_data(Some(&json!({ "fps": 10, "animationSpeed": 2 })));
        assert_eq!(s.fps, 10.0);
        assert_eq!(s.speed, AnimationSpeed::Relative(2.0));
        let s = AnimationSettings::from_extra_data(Some(&json!({ "animationSpeed": "matchLife" })));
        assert_eq!(s.speed, AnimationSpeed::MatchLife);
        let s = AnimationSettings::from_extra_data(Some(&json!({ "animationSpeed": "fast" })));
        assert_eq!(s.speed, AnimationSpeed::Relative(1.0));
    }

    #[test]
    fn test_loops_at_fixed_rate() {
        let mut p = animated(json!({ "fps": 4 }), 10.0);
        p.apply_art(&frames(3));
        p.init(&mut SharedExtraData::new());
        assert!(p.is_looping());
        assert_eq!(p.frame_rate(), 4.0);

        p.update(0.5);
        assert_eq!(p.current_frame(), 2);
        p.update(0.25);
        assert_eq!(p.current_frame(), 0);
        assert_eq!(p.particle().texture, Some(TextureHandle::new(0)));
    }

    #[test]
    fn test_match_life_plays_once() {
        let mut p = animated(json!({ "animationSpeed": "matchLife" }), 2.0);
        p.apply_art(&frames(4));
        p.init(&mut SharedExtraData::new());
        assert!(!p.is_looping());
        assert_eq!(p.frame_rate(), 2.0);

        p.update(1.0);
        assert_eq!(p.current_frame(), 2);
        p.update(0.99);
        assert_eq!(p.current_frame(), 3);
    }

    #[test]
    fn test_single_texture_becomes_one_frame() {
        let mut p = AnimatedParticle::new();
        p.apply_art(&frames(3));
        p.apply_art(&ParticleArt::Texture(TextureHandle::new(9)));
        assert_eq!(p.frames(), &[TextureHandle::new(9)]);
        assert_eq!(p.particle().texture, Some(TextureHandle::new(9)));
    }
}
