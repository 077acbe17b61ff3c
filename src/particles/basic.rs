use super::{Particle, ParticleBehavior};

/// Straight-line particle showing a single texture.
///
/// All behaviour is the [`Particle`] default.
#[derive(Debug, Clone, Default)]
pub struct BasicParticle {
    core: Particle,
}

impl BasicParticle {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ParticleBehavior for BasicParticle {
    fn particle(&self) -> &Particle {
        &self.core
    }

    fn particle_mut(&mut self) -> &mut Particle {
        &mut self.core
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::SharedExtraData;
    use crate::textures::{ParticleArt, TextureHandle};

    #[test]
    fn test_basic_lifecycle() {
        let mut p = BasicParticle::new();
        p.apply_art(&ParticleArt::Frames(vec![TextureHandle::new(7), TextureHandle::new(8)]));
        assert_eq!(p.particle().texture, Some(TextureHandle::new(7)));

        let core = p.particle_mut();
        core.max_life = 1.0;
        core.start_speed = 2.0;
        core.end_speed = 2.0;
        p.init(&mut SharedExtraData::new());

        assert!(p.update(0.5).is_some());
        assert!((p.particle().position.x - 1.0).abs() < 1e-6);
        assert!(p.update(0.5).is_none());
        p.destroy();
        assert_eq!(p.particle().texture, None);
    }
}
